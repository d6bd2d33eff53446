//! Writing envelopes onto axum responses.

use axum::{
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use handlerkit_core::{
    classify::StatusTable,
    envelope::{Encoder, Envelope, TRACE_KEY},
    HandlerError,
};

/// Classifies `error`, logs it and encodes the failure body.
pub(crate) fn failure(
    statuses: &StatusTable,
    encoder: Encoder,
    error: &HandlerError,
    trace: &str,
    abort: bool,
) -> Envelope {
    let classification = statuses.classify(error);
    let message = error.to_string();

    tracing::error!(
        trace,
        code = %classification.code,
        status = classification.status,
        encoder = encoder.name(),
        abort,
        error = %message,
        "process failed"
    );

    encoder.failure(&classification, &message, (TRACE_KEY, trace))
}

pub(crate) fn envelope(envelope: Envelope, headers: HeaderMap) -> Response {
    let status =
        StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let response = (
        status,
        [(CONTENT_TYPE, envelope.content_type)],
        envelope.body,
    )
        .into_response();
    with_headers(response, headers)
}

/// Empty 200 for endpoints whose encoder wrote nothing.
pub(crate) fn empty(headers: HeaderMap) -> Response {
    with_headers(StatusCode::OK.into_response(), headers)
}

/// Adds the context's pending headers, replacing values already set.
pub(crate) fn with_headers(mut response: Response, headers: HeaderMap) -> Response {
    response.headers_mut().extend(headers);
    response
}
