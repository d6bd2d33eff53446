use axum::http::HeaderValue;
use handlerkit_core::envelope::TRACE_KEY;
use uuid::Uuid;

use super::RequestContext;

impl RequestContext {
    /// Assigns the request's trace id.
    ///
    /// Uses the trace header sent by the client, or a fresh UUID v4 when it
    /// is missing or empty. The value is written to the response headers and
    /// back onto the request, so later calls (and [`RequestContext::trace`])
    /// see the same id.
    pub fn set_trace(&mut self) {
        // Echoed byte for byte, even when it is not valid UTF-8.
        let incoming = self
            .parts
            .headers
            .get(&self.trace_header)
            .filter(|v| !v.is_empty())
            .cloned();

        let value = match incoming {
            Some(value) => value,
            None => {
                let generated = Uuid::new_v4().to_string();
                tracing::trace!(trace = %generated, "generated trace id");
                // A hyphenated UUID is always a valid header value.
                HeaderValue::from_str(&generated).unwrap_or(HeaderValue::from_static("unknown"))
            }
        };

        self.parts
            .headers
            .insert(self.trace_header.clone(), value.clone());
        self.response_headers
            .insert(self.trace_header.clone(), value);
    }

    /// The `(body key, trace id)` pair.
    ///
    /// The id is read from the request header each time, so it is empty
    /// until [`RequestContext::set_trace`] ran or the client sent one.
    /// Bytes that are not UTF-8 are replaced with U+FFFD.
    pub fn trace(&self) -> (&'static str, String) {
        let value = self
            .parts
            .headers
            .get(&self.trace_header)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_default();
        (TRACE_KEY, value)
    }
}
