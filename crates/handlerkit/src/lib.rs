//! Request-lifecycle wrapper for axum handlers.
//!
//! This crate provides:
//! - `RequestContext`: typed per-request state over the raw request
//! - `Pipeline`: invoke a handler, classify its outcome, encode the response
//! - Panic recovery around every handler invocation
//! - Namespace-scoped lock guarding through an external `Locker`
//!
//! The pure parts (classification, envelopes, validation) live in
//! `handlerkit_core` and are re-exported here.

pub mod app;
pub mod config;
pub mod context;
pub mod handlers;
pub mod lock;
pub mod pipeline;
pub mod recovery;
pub mod state;

pub use handlerkit_core::{
    classify::StatusTable,
    envelope::{Encoder, Reply},
    validation::{Validate, Validator, Violation},
    CodedError, Domain, HandlerError, HandlerResult, Role, User, UserInfo,
};

pub use config::Config;
pub use context::RequestContext;
pub use pipeline::{stage, Handler, Invocation, Pipeline};
pub use state::PipelineState;
