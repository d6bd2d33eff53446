//! The single "invoke, classify, encode" pipeline.
//!
//! A [`Pipeline`] pairs a handler with an [`Invocation`] and serves it either
//! as an endpoint (`Pipeline::get`, `Pipeline::post`, ...) or as a stage in
//! front of other routes ([`stage`], mounted with
//! `axum::middleware::from_fn_with_state`).
//!
//! Per request:
//!
//! 1. build the [`RequestContext`] and assign the trace id
//! 2. with `pre_lock`, acquire the namespace lock (failure aborts with a
//!    standard failure)
//! 3. run the handler inside the panic boundary
//! 4. release the lock
//! 5. encode the result, or classify and encode the failure

mod invocation;
mod respond;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::{on, MethodFilter, MethodRouter},
};
use futures_util::future::BoxFuture;
use handlerkit_core::{
    envelope::{Encoder, Envelope},
    HandlerError, HandlerResult,
};

pub use invocation::Invocation;
pub(crate) use respond::{envelope as respond_envelope, failure, with_headers};

use crate::{context::RequestContext, lock::LockLease, recovery, state::PipelineState};

/// Business logic run by a pipeline.
///
/// Implemented for every `Fn(&mut RequestContext) -> BoxFuture<HandlerResult>`,
/// so handlers are usually closures:
///
/// ```ignore
/// Pipeline::new(state, Invocation::standard(), |ctx| {
///     Box::pin(async move { Ok(Reply::Empty) })
/// });
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, HandlerResult>;
}

impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, HandlerResult> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, HandlerResult> {
        self(ctx)
    }
}

/// What the pipeline decided to write.
#[derive(Debug)]
enum Outcome {
    Written(Envelope),
    /// The encoder wrote nothing.
    Nothing,
    Failed { envelope: Envelope, abort: bool },
}

/// A handler wrapped with one [`Invocation`].
#[derive(Clone)]
pub struct Pipeline {
    state: PipelineState,
    invocation: Invocation,
    handler: Arc<dyn Handler>,
}

impl Pipeline {
    pub fn new<F>(state: PipelineState, invocation: Invocation, handler: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        Self::from_handler(state, invocation, handler)
    }

    /// Wraps a custom [`Handler`] implementation.
    pub fn from_handler(
        state: PipelineState,
        invocation: Invocation,
        handler: impl Handler,
    ) -> Self {
        Self {
            state,
            invocation,
            handler: Arc::new(handler),
        }
    }

    pub fn invocation(&self) -> Invocation {
        self.invocation
    }

    /// Serves the pipeline as an endpoint.
    ///
    /// An encoder that writes nothing leaves an empty 200.
    pub async fn serve(&self, request: Request) -> Response {
        let mut ctx = RequestContext::from_request(request, &self.state).await;
        ctx.set_trace();

        let outcome = self.run(&mut ctx).await;
        let headers = ctx.take_response_headers();

        match outcome {
            Outcome::Written(envelope) | Outcome::Failed { envelope, .. } => {
                respond::envelope(envelope, headers)
            }
            Outcome::Nothing => respond::empty(headers),
        }
    }

    /// Endpoint for the given methods.
    pub fn on<S>(self, filter: MethodFilter) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        on(filter, move |request: Request| async move {
            self.serve(request).await
        })
    }

    pub fn get<S>(self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.on(MethodFilter::GET)
    }

    pub fn post<S>(self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.on(MethodFilter::POST)
    }

    pub fn put<S>(self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.on(MethodFilter::PUT)
    }

    pub fn delete<S>(self) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.on(MethodFilter::DELETE)
    }

    async fn run(&self, ctx: &mut RequestContext) -> Outcome {
        let (_, trace) = ctx.trace();
        let encoder = self.invocation.encoder;
        let abort = self.invocation.abort_on_error;

        let lease = if self.invocation.pre_lock {
            let namespace = ctx.namespace().unwrap_or_default().to_string();
            let acquired = recovery::catch(
                LockLease::acquire(Arc::clone(&self.state.locker), &namespace),
                &trace,
            )
            .await
            .and_then(|acquired| acquired);
            match acquired {
                Ok(lease) => Some(lease),
                Err(error) => {
                    tracing::error!(trace = %trace, lock = %namespace, "failed to acquire lock");
                    // Lock failures are standard failures whatever the route encodes.
                    let envelope =
                        failure(&self.state.statuses, Encoder::Standard, &error, &trace, true);
                    return Outcome::Failed {
                        envelope,
                        abort: true,
                    };
                }
            }
        } else {
            None
        };

        let result = recovery::recover(self.handler.call(ctx), &trace).await;

        if let Some(lease) = lease {
            lease.release().await;
        }

        let reply = match result {
            Ok(reply) => reply,
            Err(error) => return self.fail(&error, &trace, abort),
        };

        match encoder.success(&reply) {
            Ok(written) => {
                tracing::debug!(
                    trace = %trace,
                    encoder = encoder.name(),
                    response = %reply.to_log_string(),
                    "process success"
                );
                written.map_or(Outcome::Nothing, Outcome::Written)
            }
            Err(error) => self.fail(&error.into(), &trace, abort),
        }
    }

    fn fail(&self, error: &HandlerError, trace: &str, abort: bool) -> Outcome {
        let envelope = failure(&self.state.statuses, self.invocation.encoder, error, trace, abort);
        Outcome::Failed { envelope, abort }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("invocation", &self.invocation)
            .finish_non_exhaustive()
    }
}

/// Runs a pipeline in front of the downstream chain.
///
/// Mount with `middleware::from_fn_with_state(pipeline, stage)`.
///
/// - encoder wrote nothing: the downstream response is returned
/// - failure with `abort_on_error`: the failure is returned and the
///   downstream never runs
/// - anything else written: the downstream still runs, but the response
///   written here is the one returned
///
/// Slots set by the handler are visible downstream.
pub async fn stage(State(pipeline): State<Pipeline>, request: Request, next: Next) -> Response {
    let mut ctx = RequestContext::from_request(request, &pipeline.state).await;
    ctx.set_trace();

    let outcome = pipeline.run(&mut ctx).await;
    let headers = ctx.take_response_headers();

    match outcome {
        Outcome::Failed {
            envelope,
            abort: true,
        } => respond::envelope(envelope, headers),
        Outcome::Failed { envelope, .. } | Outcome::Written(envelope) => {
            let _ = next.run(ctx.into_request()).await;
            respond::envelope(envelope, headers)
        }
        Outcome::Nothing => {
            let response = next.run(ctx.into_request()).await;
            with_headers(response, headers)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{Body, Bytes},
        http::StatusCode,
        middleware,
        Router,
    };
    use handlerkit_core::{classify::StatusTable, lock::Locker, CodedError, Reply};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{lock::MemoryLocker, Config};

    /// Counts acquisitions and releases on top of a memory locker.
    #[derive(Default)]
    struct CountingLocker {
        inner: MemoryLocker,
        acquired: AtomicUsize,
        released: AtomicUsize,
    }

    #[async_trait]
    impl Locker for CountingLocker {
        async fn acquire(&self, name: &str, ttl: u64) -> Result<String, HandlerError> {
            let version = self.inner.acquire(name, ttl).await?;
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(version)
        }

        async fn release(&self, name: &str, version: &str) {
            self.released.fetch_add(1, Ordering::SeqCst);
            self.inner.release(name, version).await;
        }
    }

    fn state() -> PipelineState {
        PipelineState::new(Config::default(), Arc::new(MemoryLocker::new()))
    }

    fn request(uri: &str) -> Request {
        Request::builder()
            .uri(uri)
            .header("x-trace-id", "t-1")
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: Router, request: Request) -> (StatusCode, Bytes, Response) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let (parts, body) = response.into_parts();
        let bytes = body.collect().await.unwrap().to_bytes();
        (status, bytes, Response::from_parts(parts, Body::empty()))
    }

    fn endpoint(invocation: Invocation, reply: fn() -> HandlerResult) -> Router {
        let pipeline = Pipeline::new(state(), invocation, move |_ctx| {
            Box::pin(async move { reply() })
        });
        Router::new().route("/", pipeline.get())
    }

    fn json(bytes: &Bytes) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_standard_empty_reply() {
        let app = endpoint(Invocation::standard(), || Ok(Reply::Empty));

        let (status, body, response) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), json!({"success": true}));
        assert_eq!(response.headers()["x-trace-id"], "t-1");
    }

    #[tokio::test]
    async fn test_standard_failure_is_classified() {
        let app = endpoint(Invocation::standard(), || {
            Err(CodedError::new("not_found", "no such app").into())
        });

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json(&body),
            json!({"code": "not_found", "message": "no such app", "trace": "t-1"})
        );
    }

    #[tokio::test]
    async fn test_unknown_code_falls_back_to_500() {
        let app = endpoint(Invocation::standard(), || {
            Err(CodedError::new("E_NOT_IN_TABLE", "odd").into())
        });

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["code"], "unknown");
    }

    #[tokio::test]
    async fn test_uncoded_error_is_unknown() {
        let app = endpoint(Invocation::standard(), || {
            Err(anyhow::anyhow!("database went away").into())
        });

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["code"], "unknown");
        assert_eq!(json(&body)["message"], "database went away");
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let app = endpoint(Invocation::standard(), || panic!("boom"));

        let (status, body, _) = send(app.clone(), request("/")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["code"], "unknown");
        assert_eq!(json(&body)["message"], "boom");

        // The router keeps serving.
        let (status, _, _) = send(app, request("/")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_raw_bytes() {
        let app = endpoint(Invocation::raw(), || Ok(Reply::bytes(vec![0x01, 0x02])));

        let (status, body, response) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/octet-stream");
        assert_eq!(&body[..], &[0x01, 0x02]);
    }

    #[tokio::test]
    async fn test_raw_rejects_json_result() {
        let app = endpoint(Invocation::raw(), || Ok(Reply::Json(json!({"x": 1}))));

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["code"], "unknown");
    }

    #[tokio::test]
    async fn test_raw_empty_writes_nothing() {
        let app = endpoint(Invocation::raw(), || Ok(Reply::Empty));

        let (status, body, response) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(response.headers()["x-trace-id"], "t-1");
    }

    #[tokio::test]
    async fn test_mis_failure_is_200() {
        let app = endpoint(Invocation::mis(), || {
            Err(CodedError::new("forbidden", "no").into())
        });

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), json!({"status": 1, "msg": "no"}));
    }

    #[tokio::test]
    async fn test_mis_success() {
        let app = endpoint(Invocation::mis(), || Ok(Reply::Json(json!([1, 2]))));

        let (_, body, _) = send(app, request("/")).await;

        assert_eq!(json(&body), json!({"status": 0, "msg": "ok", "data": [1, 2]}));
    }

    #[tokio::test]
    async fn test_handler_reads_context() {
        let pipeline = Pipeline::new(state(), Invocation::standard(), |ctx| {
            Box::pin(async move {
                let name = ctx.name_from_path_param().unwrap_or_default().to_string();
                let (_, trace) = ctx.trace();
                Reply::json(&json!({ "name": name, "trace": trace }))
            })
        });
        let app = Router::new().route("/apps/{name}", pipeline.get());

        let (_, body, _) = send(app, request("/apps/web")).await;

        assert_eq!(json(&body), json!({"name": "web", "trace": "t-1"}));
    }

    #[tokio::test]
    async fn test_custom_trace_header_is_echoed() {
        let config = Config::default().with_trace_header("Trace").unwrap();
        let state = PipelineState::new(config, Arc::new(MemoryLocker::new()));
        let pipeline = Pipeline::new(state, Invocation::standard(), |_ctx| {
            Box::pin(async { Ok(Reply::Json(json!({"x": 1}))) })
        });
        let app = Router::new().route("/", pipeline.get());
        let request = Request::builder()
            .uri("/")
            .header("Trace", "abc123")
            .body(Body::empty())
            .unwrap();

        let (status, body, response) = send(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response.headers()["trace"], "abc123");
        assert_eq!(&body[..], br#"{"x":1}"#);
    }

    #[tokio::test]
    async fn test_custom_code_with_generated_trace() {
        let state = state().with_statuses(StatusTable::baseline().with("E404", 404));
        let pipeline = Pipeline::new(state, Invocation::standard(), |_ctx| {
            Box::pin(async { Err(CodedError::new("E404", "nothing here").into()) })
        });
        let app = Router::new().route("/", pipeline.get());

        let (status, body, response) =
            send(app, Request::builder().uri("/").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let trace = response.headers()["x-trace-id"].to_str().unwrap().to_string();
        assert!(uuid::Uuid::parse_str(&trace).is_ok());
        assert_eq!(
            json(&body),
            json!({"code": "E404", "message": "nothing here", "trace": trace})
        );
    }

    fn locked_app(locker: Arc<CountingLocker>, reply: fn() -> HandlerResult) -> Router {
        let state = PipelineState::new(Config::default(), locker);
        let pipeline = Pipeline::new(state, Invocation::standard().with_lock(true), move |_ctx| {
            Box::pin(async move { reply() })
        });
        Router::new().route("/", pipeline.get())
    }

    #[tokio::test]
    async fn test_lock_is_released_once() {
        let locker = Arc::new(CountingLocker::default());
        let app = locked_app(locker.clone(), || Ok(Reply::Empty));

        let (status, _, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(locker.acquired.load(Ordering::SeqCst), 1);
        assert_eq!(locker.released.load(Ordering::SeqCst), 1);
        assert!(!locker.inner.is_held("namespace_").await);
    }

    #[tokio::test]
    async fn test_lock_is_released_after_panic() {
        let locker = Arc::new(CountingLocker::default());
        let app = locked_app(locker.clone(), || panic!("boom"));

        let (status, _, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(locker.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lock_failure_skips_handler() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let locker = Arc::new(CountingLocker::default());
        locker.inner.acquire("namespace_", 0).await.unwrap();
        let app = locked_app(locker.clone(), || {
            CALLS.fetch_add(1, Ordering::SeqCst);
            Ok(Reply::Empty)
        });

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::LOCKED);
        assert_eq!(json(&body)["code"], "locked");
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(locker.released.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mis_lock_failure_is_standard() {
        let locker = Arc::new(CountingLocker::default());
        locker.inner.acquire("namespace_", 0).await.unwrap();
        let state = PipelineState::new(Config::default(), locker.clone());
        let pipeline = Pipeline::new(state, Invocation::mis().with_lock(true), |_ctx| {
            Box::pin(async { Ok(Reply::Empty) })
        });
        let app = Router::new().route("/", pipeline.get());

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::LOCKED);
        assert_eq!(json(&body)["code"], "locked");
        assert_eq!(json(&body)["trace"], "t-1");
    }

    /// Lock service that blows up on acquire.
    struct PanickyLocker;

    #[async_trait]
    impl Locker for PanickyLocker {
        async fn acquire(&self, _name: &str, _ttl: u64) -> Result<String, HandlerError> {
            panic!("lock service exploded")
        }

        async fn release(&self, _name: &str, _version: &str) {}
    }

    #[tokio::test]
    async fn test_acquire_panic_is_contained() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let state = PipelineState::new(Config::default(), Arc::new(PanickyLocker));
        let pipeline = Pipeline::new(state, Invocation::standard().with_lock(true), |_ctx| {
            Box::pin(async {
                CALLS.fetch_add(1, Ordering::SeqCst);
                Ok(Reply::Empty)
            })
        });
        let app = Router::new().route("/", pipeline.get());

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["code"], "unknown");
        assert_eq!(json(&body)["message"], "lock service exploded");
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    /// Memory locker whose release takes a while.
    #[derive(Default)]
    struct SlowReleaseLocker {
        inner: MemoryLocker,
    }

    #[async_trait]
    impl Locker for SlowReleaseLocker {
        async fn acquire(&self, name: &str, ttl: u64) -> Result<String, HandlerError> {
            self.inner.acquire(name, ttl).await
        }

        async fn release(&self, name: &str, version: &str) {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.inner.release(name, version).await;
        }
    }

    #[tokio::test]
    async fn test_request_cancelled_during_release_still_unlocks() {
        let locker = Arc::new(SlowReleaseLocker::default());
        let state = PipelineState::new(Config::default(), locker.clone());
        let pipeline = Pipeline::new(state, Invocation::standard().with_lock(true), |_ctx| {
            Box::pin(async { Ok(Reply::Empty) })
        });
        let app = Router::new().route("/", pipeline.get());

        // Gives up while the release is still in flight.
        let served = tokio::time::timeout(Duration::from_millis(10), app.oneshot(request("/"))).await;
        assert!(served.is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!locker.inner.is_held("namespace_").await);
    }

    #[tokio::test]
    async fn test_mis_panic_is_200() {
        let app = endpoint(Invocation::mis(), || panic!("boom"));

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), json!({"status": 1, "msg": "boom"}));
    }

    fn staged(invocation: Invocation, reply: fn() -> HandlerResult, hits: Arc<AtomicUsize>) -> Router {
        let stage_pipeline = Pipeline::new(state(), invocation, move |ctx| {
            Box::pin(async move {
                ctx.set_namespace("default");
                reply()
            })
        });
        let downstream = Pipeline::new(state(), Invocation::standard(), move |ctx| {
            let hits = Arc::clone(&hits);
            Box::pin(async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Reply::json(&json!({ "namespace": ctx.namespace() }))
            })
        });
        Router::new()
            .route("/", downstream.get())
            .layer(middleware::from_fn_with_state(stage_pipeline, stage))
    }

    #[tokio::test]
    async fn test_stage_passthrough_runs_downstream() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = staged(Invocation::passthrough(), || Ok(Reply::Empty), hits.clone());

        let (status, body, response) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), json!({"namespace": "default"}));
        assert_eq!(response.headers()["x-trace-id"], "t-1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stage_abort_stops_downstream() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = staged(
            Invocation::passthrough().with_abort(true),
            || Err(CodedError::new("unauthorized", "who are you").into()),
            hits.clone(),
        );

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json(&body)["code"], "unauthorized");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stage_without_abort_runs_downstream_but_keeps_failure() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = staged(
            Invocation::passthrough(),
            || Err(CodedError::new("unauthorized", "who are you").into()),
            hits.clone(),
        );

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json(&body)["code"], "unauthorized");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_raw_stage_abort_stops_downstream() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = staged(
            Invocation::raw().with_abort(true),
            || Err(CodedError::new("unauthorized", "who are you").into()),
            hits.clone(),
        );

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json(&body)["code"], "unauthorized");
        assert_eq!(json(&body)["trace"], "t-1");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_raw_stage_json_result_aborts() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = staged(
            Invocation::raw().with_abort(true),
            || Ok(Reply::Json(json!({"x": 1}))),
            hits.clone(),
        );

        let (status, body, _) = send(app, request("/")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json(&body)["code"], "unknown");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
