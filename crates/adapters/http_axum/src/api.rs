//! JSON REST API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod proxies;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, put};

use assethub_app::ports::{IdentityRepository, ProxyRepository};

use crate::auth::{Authenticator, ScopeGuard, require_scope};
use crate::state::AppState;

/// Scope guarding the proxy routes.
pub const PROXIES_SCOPE: &str = "proxies";

/// Build the `/api` sub-router.
///
/// Every route requires the caller to hold the scope for its resource.
pub fn routes<P, I>(auth: Arc<Authenticator>) -> Router<AppState<P, I>>
where
    P: ProxyRepository + Send + Sync + 'static,
    I: IdentityRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/proxies",
            get(proxies::list::<P, I>).post(proxies::create::<P, I>),
        )
        .route("/proxies/", get(proxies::list::<P, I>))
        .route(
            "/proxies/{id}",
            get(proxies::get::<P, I>)
                .put(proxies::update::<P, I>)
                .delete(proxies::delete::<P, I>),
        )
        .route(
            "/proxies/{id}/identity",
            put(proxies::assign_identity::<P, I>),
        )
        .route_layer(from_fn_with_state(
            ScopeGuard::new(auth, PROXIES_SCOPE),
            require_scope,
        ))
}
