use std::time::Duration;

use axum::{http::StatusCode, middleware, routing::get, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{
        apps::{self, AppStore},
        debug,
        health::livez,
        namespace,
    },
    lock,
    pipeline::{stage, Invocation, Pipeline},
    state::PipelineState,
};

/// Create the application router with all routes and middleware.
///
/// Every `/v1` route runs behind the namespace stage, which rejects requests
/// without a valid `x-namespace` header before any handler runs.
pub fn create_app(state: PipelineState, store: AppStore) -> Router {
    let namespace = Pipeline::new(
        state.clone(),
        Invocation::passthrough().with_abort(true),
        namespace::identify,
    );

    let create = Pipeline::new(state.clone(), Invocation::standard().with_lock(true), {
        let store = store.clone();
        move |ctx| Box::pin(apps::create(store.clone(), ctx))
    });
    let list = Pipeline::new(state.clone(), Invocation::standard(), {
        let store = store.clone();
        move |ctx| Box::pin(apps::list(store.clone(), ctx))
    });
    let get_app = Pipeline::new(state.clone(), Invocation::standard(), {
        let store = store.clone();
        move |ctx| Box::pin(apps::get(store.clone(), ctx))
    });
    let delete = Pipeline::new(state.clone(), Invocation::standard().with_lock(true), {
        let store = store.clone();
        move |ctx| Box::pin(apps::delete(store.clone(), ctx))
    });
    let manifest = Pipeline::new(state.clone(), Invocation::raw(), {
        let store = store.clone();
        move |ctx| Box::pin(apps::manifest(store.clone(), ctx))
    });
    let mis_get = Pipeline::new(state.clone(), Invocation::mis(), {
        let store = store.clone();
        move |ctx| Box::pin(apps::get(store.clone(), ctx))
    });
    // Locked by the guard layer below, not by the pipeline.
    let scale = Pipeline::new(state.clone(), Invocation::standard(), {
        let store = store.clone();
        move |ctx| Box::pin(apps::scale(store.clone(), ctx))
    });
    let debug_panic = Pipeline::new(state.clone(), Invocation::standard(), |ctx| {
        Box::pin(debug::panic(ctx))
    });

    // Routes holding the namespace lock for their whole downstream chain
    let locked_routes = Router::new()
        .route("/apps/{name}/scale", scale.put())
        .route_layer(middleware::from_fn_with_state(state.clone(), lock::guard));

    let v1_routes = Router::new()
        .route("/apps", create.post().merge(list.get()))
        .route("/apps/{name}", get_app.get().merge(delete.delete()))
        .route("/apps/{name}/manifest", manifest.get())
        .route("/mis/apps/{name}", mis_get.get())
        .route("/debug/panic", debug_panic.get())
        .merge(locked_routes)
        .layer(middleware::from_fn_with_state(namespace, stage));

    Router::new()
        .route("/livez", get(livez))
        .nest("/v1", v1_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
}
