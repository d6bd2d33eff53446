//! Namespace-scoped application records.
//!
//! Every handler reads the namespace set by the `namespace` stage and the
//! app name from the `{name}` path parameter.

use std::collections::HashMap;
use std::sync::Arc;

use handlerkit_core::{
    validation::{rules, Validate, Validator, Violation},
    CodedError, HandlerError, HandlerResult, Reply,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::context::RequestContext;

pub const DEFAULT_IMAGE: &str = "nginx:latest";
pub const DEFAULT_REPLICAS: i64 = 1;
pub const MAX_REPLICAS: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub namespace: String,
    pub name: String,
    pub image: String,
    pub replicas: i64,
    /// Last user that changed the app, if the caller was identified.
    pub updated_by: Option<String>,
}

impl App {
    /// Plain-text manifest served by the raw endpoint.
    pub fn manifest(&self) -> String {
        format!(
            "namespace: {}\nname: {}\nimage: {}\nreplicas: {}\n",
            self.namespace, self.name, self.image, self.replicas
        )
    }
}

/// Body of `POST /v1/apps`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApp {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub replicas: Option<i64>,
}

impl Validate for CreateApp {
    fn validate(&self, v: &Validator) -> Result<(), Violation> {
        v.required("name", &self.name)?;
        v.rule(rules::RESOURCE_NAME, "name", &self.name)?;
        if let Some(image) = &self.image {
            v.max_len("image", image, 255)?;
        }
        if let Some(replicas) = self.replicas {
            v.range("replicas", replicas, 0, MAX_REPLICAS)?;
        }
        Ok(())
    }

    fn apply_defaults(&mut self) {
        self.image.get_or_insert_with(|| DEFAULT_IMAGE.to_string());
        self.replicas.get_or_insert(DEFAULT_REPLICAS);
    }
}

/// Body of `PUT /v1/apps/{name}/scale`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScaleApp {
    pub replicas: i64,
}

impl Validate for ScaleApp {
    fn validate(&self, v: &Validator) -> Result<(), Violation> {
        v.range("replicas", self.replicas, 0, MAX_REPLICAS)
    }
}

/// In-memory app store keyed by `(namespace, name)`.
#[derive(Debug, Clone, Default)]
pub struct AppStore {
    apps: Arc<RwLock<HashMap<(String, String), App>>>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, namespace: &str, name: &str) -> Option<App> {
        let apps = self.apps.read().await;
        apps.get(&(namespace.to_string(), name.to_string())).cloned()
    }

    pub async fn list(&self, namespace: &str) -> Vec<App> {
        let apps = self.apps.read().await;
        let mut found: Vec<App> = apps
            .values()
            .filter(|app| app.namespace == namespace)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    /// Inserts `app`, failing with `conflict` if the name is taken.
    pub async fn insert(&self, app: App) -> Result<(), CodedError> {
        let mut apps = self.apps.write().await;
        let key = (app.namespace.clone(), app.name.clone());
        if apps.contains_key(&key) {
            return Err(CodedError::new(
                "conflict",
                format!("app '{}' already exists", app.name),
            ));
        }
        apps.insert(key, app);
        Ok(())
    }

    pub async fn update<F>(&self, namespace: &str, name: &str, change: F) -> Option<App>
    where
        F: FnOnce(&mut App),
    {
        let mut apps = self.apps.write().await;
        let app = apps.get_mut(&(namespace.to_string(), name.to_string()))?;
        change(app);
        Some(app.clone())
    }

    pub async fn remove(&self, namespace: &str, name: &str) -> Option<App> {
        let mut apps = self.apps.write().await;
        apps.remove(&(namespace.to_string(), name.to_string()))
    }
}

/// Namespace and `{name}` of the current request.
fn target(ctx: &RequestContext) -> Result<(String, String), HandlerError> {
    let namespace = ctx.namespace().unwrap_or_default().to_string();
    let name = ctx
        .name_from_path_param()
        .ok_or_else(|| CodedError::new("bad_request", "missing app name"))?
        .to_string();
    Ok((namespace, name))
}

fn not_found(name: &str) -> HandlerError {
    CodedError::new("not_found", format!("app '{name}' not found")).into()
}

fn caller(ctx: &RequestContext) -> Option<String> {
    ctx.user().map(|user| user.id.clone())
}

/// POST /v1/apps
pub async fn create(store: AppStore, ctx: &mut RequestContext) -> HandlerResult {
    let body: CreateApp = ctx.load_body().await?;
    let namespace = ctx.namespace().unwrap_or_default().to_string();

    let app = App {
        namespace,
        name: body.name,
        image: body.image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
        replicas: body.replicas.unwrap_or(DEFAULT_REPLICAS),
        updated_by: caller(ctx),
    };
    store.insert(app.clone()).await?;
    ctx.set_name(app.name.clone());

    tracing::info!(namespace = %app.namespace, app = %app.name, "created app");
    Reply::json(&app)
}

/// GET /v1/apps
pub async fn list(store: AppStore, ctx: &mut RequestContext) -> HandlerResult {
    let namespace = ctx.namespace().unwrap_or_default().to_string();
    Reply::json(&store.list(&namespace).await)
}

/// GET /v1/apps/{name}
pub async fn get(store: AppStore, ctx: &mut RequestContext) -> HandlerResult {
    let (namespace, name) = target(ctx)?;
    let app = store
        .get(&namespace, &name)
        .await
        .ok_or_else(|| not_found(&name))?;
    Reply::json(&app)
}

/// GET /v1/apps/{name}/manifest
pub async fn manifest(store: AppStore, ctx: &mut RequestContext) -> HandlerResult {
    let (namespace, name) = target(ctx)?;
    let app = store
        .get(&namespace, &name)
        .await
        .ok_or_else(|| not_found(&name))?;
    Ok(Reply::bytes(app.manifest().into_bytes()))
}

/// PUT /v1/apps/{name}/scale
pub async fn scale(store: AppStore, ctx: &mut RequestContext) -> HandlerResult {
    let (namespace, name) = target(ctx)?;
    let body: ScaleApp = ctx.load_body().await?;
    let updated_by = caller(ctx);

    let app = store
        .update(&namespace, &name, |app| {
            app.replicas = body.replicas;
            app.updated_by = updated_by;
        })
        .await
        .ok_or_else(|| not_found(&name))?;

    tracing::info!(namespace = %namespace, app = %name, replicas = app.replicas, "scaled app");
    Reply::json(&app)
}

/// DELETE /v1/apps/{name}
pub async fn delete(store: AppStore, ctx: &mut RequestContext) -> HandlerResult {
    let (namespace, name) = target(ctx)?;
    store
        .remove(&namespace, &name)
        .await
        .ok_or_else(|| not_found(&name))?;

    tracing::info!(namespace = %namespace, app = %name, "deleted app");
    Ok(Reply::Empty)
}
