//! Wire envelopes: what a request's outcome looks like on the wire.

mod encode;
mod reply;

pub use encode::{Encoder, Envelope, APPLICATION_JSON, APPLICATION_OCTET_STREAM};
pub use reply::Reply;

/// Body key carrying the trace id in failure envelopes.
///
/// Deliberately not the transport header name, which is configurable.
pub const TRACE_KEY: &str = "trace";
