//! Shared application state for axum handlers.

use std::sync::Arc;

use assethub_app::ports::{IdentityRepository, ProxyRepository};
use assethub_app::services::proxy_service::ProxyService;

use crate::auth::Authenticator;

/// Application state shared across all axum handlers.
///
/// `Clone` is implemented by hand; only the `Arc` wrappers are cloned.
pub struct AppState<P, I> {
    /// Proxy CRUD service.
    pub proxy_service: Arc<ProxyService<P, I>>,
    /// Resolves callers for the scope check.
    pub auth: Arc<Authenticator>,
}

impl<P, I> Clone for AppState<P, I> {
    fn clone(&self) -> Self {
        Self {
            proxy_service: Arc::clone(&self.proxy_service),
            auth: Arc::clone(&self.auth),
        }
    }
}

impl<P, I> AppState<P, I>
where
    P: ProxyRepository + Send + Sync + 'static,
    I: IdentityRepository + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(proxy_service: ProxyService<P, I>, auth: Authenticator) -> Self {
        Self {
            proxy_service: Arc::new(proxy_service),
            auth: Arc::new(auth),
        }
    }
}
