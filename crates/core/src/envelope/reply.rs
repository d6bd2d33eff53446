use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use crate::error::HandlerError;

/// A handler's successful result.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Nothing to return.
    Empty,
    /// A structured value, serialized as-is.
    Json(Value),
    /// An opaque byte sequence.
    Bytes(Bytes),
}

impl Reply {
    /// Serialize any value into a [`Reply::Json`].
    pub fn json<T: Serialize>(value: &T) -> Result<Self, HandlerError> {
        serde_json::to_value(value)
            .map(Reply::Json)
            .map_err(|e| HandlerError::Other(e.into()))
    }

    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Reply::Bytes(data.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Empty)
    }

    /// The JSON value used wherever this reply is embedded in a JSON body.
    ///
    /// Bytes become a base64 string, `Empty` becomes `null`.
    pub fn to_json_value(&self) -> Value {
        match self {
            Reply::Empty => Value::Null,
            Reply::Json(v) => v.clone(),
            Reply::Bytes(b) => Value::String(STANDARD.encode(b)),
        }
    }

    /// Compact rendering for debug logs.
    pub fn to_log_string(&self) -> String {
        self.to_json_value().to_string()
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Json(value)
    }
}

impl From<Bytes> for Reply {
    fn from(data: Bytes) -> Self {
        Reply::Bytes(data)
    }
}

impl From<Vec<u8>> for Reply {
    fn from(data: Vec<u8>) -> Self {
        Reply::Bytes(Bytes::from(data))
    }
}

impl From<()> for Reply {
    fn from((): ()) -> Self {
        Reply::Empty
    }
}
