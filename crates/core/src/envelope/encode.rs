//! Pure encoders turning an outcome into status, content type and body bytes.

use serde_json::{json, Map, Value};

use super::Reply;
use crate::classify::Classification;
use crate::error::CodedError;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

const OK: u16 = 200;

/// Encoded response ready to be written by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Envelope {
    fn json(status: u16, value: &Value) -> Self {
        // `Value`'s Display is compact JSON without HTML escaping.
        Self {
            status,
            content_type: APPLICATION_JSON,
            body: value.to_string().into_bytes(),
        }
    }

    /// Body parsed back as JSON. Test and log helper.
    pub fn body_json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

/// Wire convention selected per route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoder {
    /// Result as-is (or `{"success": true}`), failures as `{code, message, trace}`
    /// with the classified status.
    #[default]
    Standard,
    /// Byte results written verbatim as `application/octet-stream`.
    Raw,
    /// Always 200; outcome lives in the body's `status` field.
    Mis,
    /// Success writes nothing; failures as in `Standard`.
    Passthrough,
}

impl Encoder {
    /// Encodes a successful result.
    ///
    /// `Ok(None)` means the encoder writes nothing for this result. A raw
    /// encoder given a non-byte result fails with an `unknown` coded error,
    /// which the caller encodes through [`Encoder::failure`].
    pub fn success(self, reply: &Reply) -> Result<Option<Envelope>, CodedError> {
        match self {
            Encoder::Standard => {
                let body = match reply {
                    Reply::Empty => json!({ "success": true }),
                    other => other.to_json_value(),
                };
                Ok(Some(Envelope::json(OK, &body)))
            }
            Encoder::Raw => match reply {
                Reply::Empty => Ok(None),
                Reply::Bytes(data) => Ok(Some(Envelope {
                    status: OK,
                    content_type: APPLICATION_OCTET_STREAM,
                    body: data.to_vec(),
                })),
                Reply::Json(_) => Err(CodedError::unknown(
                    "failed to convert response to a byte sequence",
                )),
            },
            Encoder::Mis => {
                let body = json!({
                    "status": 0,
                    "msg": "ok",
                    "data": reply.to_json_value(),
                });
                Ok(Some(Envelope::json(OK, &body)))
            }
            Encoder::Passthrough => Ok(None),
        }
    }

    /// Encodes a classified failure.
    ///
    /// `trace` is the `(key, value)` pair embedded in standard failure bodies.
    pub fn failure(
        self,
        classification: &Classification,
        message: &str,
        trace: (&str, &str),
    ) -> Envelope {
        match self {
            Encoder::Mis => {
                let body = json!({ "status": 1, "msg": message });
                Envelope::json(OK, &body)
            }
            Encoder::Standard | Encoder::Raw | Encoder::Passthrough => {
                let (trace_key, trace_value) = trace;
                let mut body = Map::new();
                body.insert("code".to_string(), Value::from(classification.code.as_str()));
                body.insert("message".to_string(), Value::from(message));
                body.insert(trace_key.to_string(), Value::from(trace_value));
                Envelope::json(classification.status, &Value::Object(body))
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoder::Standard => "standard",
            Encoder::Raw => "raw",
            Encoder::Mis => "mis",
            Encoder::Passthrough => "passthrough",
        }
    }
}
