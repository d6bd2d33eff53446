use handlerkit_core::HandlerResult;

use crate::context::RequestContext;

/// GET /v1/debug/panic - Panics inside a wrapped handler.
///
/// Exercises panic containment: the response is a 500 `unknown` failure and
/// the server keeps serving.
pub async fn panic(_ctx: &mut RequestContext) -> HandlerResult {
    panic!("handler panicked on purpose")
}
