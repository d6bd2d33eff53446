use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use handlerkit_core::envelope::Encoder;

use super::LockLease;
use crate::{
    context::RequestContext,
    pipeline::{failure, respond_envelope, with_headers},
    recovery,
    state::PipelineState,
};

/// Holds the request's namespace lock while the downstream chain runs.
///
/// Mount with `middleware::from_fn_with_state(state, lock::guard)` inside a
/// stage that sets the namespace. A lock failure is written as a standard
/// failure and the downstream never runs. A panic in the lock service or
/// downstream is contained like a handler panic, and a held lock is released
/// either way.
pub async fn guard(State(state): State<PipelineState>, request: Request, next: Next) -> Response {
    let mut ctx = RequestContext::from_request(request, &state).await;
    ctx.set_trace();
    let (_, trace) = ctx.trace();
    let namespace = ctx.namespace().unwrap_or_default().to_string();

    let acquired = recovery::catch(
        LockLease::acquire(Arc::clone(&state.locker), &namespace),
        &trace,
    )
    .await
    .and_then(|acquired| acquired);
    let lease = match acquired {
        Ok(lease) => lease,
        Err(error) => {
            tracing::error!(trace = %trace, lock = %namespace, "failed to acquire lock");
            let envelope = failure(&state.statuses, Encoder::Standard, &error, &trace, true);
            return respond_envelope(envelope, ctx.take_response_headers());
        }
    };

    let headers = ctx.take_response_headers();
    let outcome = recovery::catch(next.run(ctx.into_request()), &trace).await;
    lease.release().await;

    match outcome {
        Ok(response) => with_headers(response, headers),
        Err(error) => {
            let envelope = failure(&state.statuses, Encoder::Standard, &error, &trace, false);
            respond_envelope(envelope, headers)
        }
    }
}
