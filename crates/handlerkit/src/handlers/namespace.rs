//! Stage resolving the caller's namespace and identity from request headers.
//!
//! - `x-namespace` (required) - namespace every `/v1` route operates in
//! - `x-user` (optional) - caller id
//! - `x-roles` (optional) - comma-separated role types of the caller

use futures_util::future::BoxFuture;
use handlerkit_core::{
    validation::rules, CodedError, Domain, HandlerResult, Reply, Role, User, UserInfo,
};

use crate::context::RequestContext;

pub const NAMESPACE_HEADER: &str = "x-namespace";
pub const USER_HEADER: &str = "x-user";
pub const ROLES_HEADER: &str = "x-roles";

/// Sets the namespace, user and user info slots. Writes nothing on success.
pub fn identify(ctx: &mut RequestContext) -> BoxFuture<'_, HandlerResult> {
    Box::pin(async move { resolve(ctx) })
}

fn resolve(ctx: &mut RequestContext) -> HandlerResult {
    let namespace = ctx
        .header(NAMESPACE_HEADER)
        .filter(|ns| !ns.is_empty())
        .ok_or_else(|| CodedError::new("unauthorized", "missing namespace"))?
        .to_string();
    ctx.validator()
        .rule(rules::RESOURCE_NAME, "namespace", &namespace)?;

    if let Some(id) = ctx.header(USER_HEADER).filter(|id| !id.is_empty()) {
        let user = User::new(id, id);
        let roles: Vec<Role> = ctx
            .header(ROLES_HEADER)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|kind| !kind.is_empty())
            .map(|kind| Role::new(format!("{namespace}/{kind}"), kind))
            .collect();

        let info = roles.into_iter().fold(
            UserInfo::new(user.clone(), Domain::new(&namespace, &namespace)),
            UserInfo::with_role,
        );

        ctx.set_user(user);
        if ctx.set_user_info(info).is_err() {
            tracing::warn!(namespace = %namespace, "user info already set");
        }
    }

    ctx.set_namespace(namespace);
    Ok(Reply::Empty)
}
