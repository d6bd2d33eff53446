use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{FromRequestParts, RawPathParams, Request},
    http::{request::Parts, HeaderMap, HeaderName, HeaderValue, Method, Uri},
};
use handlerkit_core::{validation::Validator, User, UserInfo};

use crate::state::PipelineState;

/// Namespace slot; newtype so it cannot collide with other `String` slots.
#[derive(Debug, Clone)]
struct Namespace(String);

/// Resource name slot.
#[derive(Debug, Clone)]
struct Name(String);

/// Per-request context handed to wrapped handlers.
///
/// Owns the request parts, the unread body and the headers that will be
/// added to the response. Typed slots live in the request's extensions, so
/// anything set here is visible to downstream stages once the request is
/// passed on, and every read is typed.
///
/// Never shared between requests.
#[derive(Debug)]
pub struct RequestContext {
    pub(super) parts: Parts,
    /// Unread request body. Taken by the first body load.
    pub(super) body: Option<Body>,
    /// Body bytes cached for repeated loads.
    pub(super) buffered: Option<Bytes>,
    pub(super) path_params: HashMap<String, String>,
    pub(super) response_headers: HeaderMap,
    pub(super) trace_header: HeaderName,
    pub(super) body_limit: usize,
    pub(super) validator: Arc<Validator>,
}

impl RequestContext {
    /// Builds a context from an incoming request.
    ///
    /// Path parameters are captured when the request went through routing;
    /// otherwise there are none.
    pub async fn from_request(request: Request, state: &PipelineState) -> Self {
        let (mut parts, body) = request.into_parts();

        let path_params = RawPathParams::from_request_parts(&mut parts, &())
            .await
            .map(|params| {
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            parts,
            body: Some(body),
            buffered: None,
            path_params,
            response_headers: HeaderMap::new(),
            trace_header: state.config.trace_header.clone(),
            body_limit: state.config.body_limit,
            validator: Arc::clone(&state.validator),
        }
    }

    /// Rebuilds the request for downstream stages.
    ///
    /// A body cached by `load_body_multi` is passed on; a body consumed by
    /// `load_body` is gone.
    pub fn into_request(self) -> Request {
        let body = match (self.buffered, self.body) {
            (Some(bytes), _) => Body::from(bytes),
            (None, Some(body)) => body,
            (None, None) => Body::empty(),
        };
        Request::from_parts(self.parts, body)
    }

    // ------------------------------------------------------------------
    // Typed slots
    // ------------------------------------------------------------------

    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.parts.extensions.insert(Namespace(namespace.into()));
    }

    pub fn namespace(&self) -> Option<&str> {
        self.parts
            .extensions
            .get::<Namespace>()
            .map(|ns| ns.0.as_str())
    }

    pub fn set_user(&mut self, user: User) {
        self.parts.extensions.insert(user);
    }

    pub fn user(&self) -> Option<&User> {
        self.parts.extensions.get::<User>()
    }

    /// Sets the identity snapshot. It can be set once per request; a second
    /// call hands the rejected value back.
    pub fn set_user_info(&mut self, info: UserInfo) -> Result<(), UserInfo> {
        if self.parts.extensions.get::<UserInfo>().is_some() {
            return Err(info);
        }
        self.parts.extensions.insert(info);
        Ok(())
    }

    pub fn user_info(&self) -> Option<&UserInfo> {
        self.parts.extensions.get::<UserInfo>()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.parts.extensions.insert(Name(name.into()));
    }

    pub fn name(&self) -> Option<&str> {
        self.parts.extensions.get::<Name>().map(|n| n.0.as_str())
    }

    /// The `name` path parameter of the matched route.
    pub fn name_from_path_param(&self) -> Option<&str> {
        self.path_param("name")
    }

    // ------------------------------------------------------------------
    // Request accessors
    // ------------------------------------------------------------------

    pub fn path_param(&self, key: &str) -> Option<&str> {
        self.path_params.get(key).map(String::as_str)
    }

    /// A request header as text; non-UTF-8 values read as absent.
    pub fn header(&self, name: impl axum::http::header::AsHeaderName) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    // ------------------------------------------------------------------
    // Response headers
    // ------------------------------------------------------------------

    /// Adds a header to the eventual response, replacing earlier values.
    pub fn insert_response_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.response_headers.insert(name, value);
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    /// Moves the pending response headers out, leaving none behind.
    pub fn take_response_headers(&mut self) -> HeaderMap {
        std::mem::take(&mut self.response_headers)
    }
}
