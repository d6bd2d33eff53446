//! Request-scoped context module.
//!
//! `RequestContext` composes the raw request with typed per-request slots
//! (namespace, identity, name) and the headers pending on the response.

mod body;
mod trace;
mod types;

pub use types::RequestContext;
