//! Storage port: repository traits for persistence.

use std::future::Future;

use assethub_domain::error::HubError;
use assethub_domain::id::{IdentityId, ProxyId};
use assethub_domain::identity::Identity;
use assethub_domain::page::Page;
use assethub_domain::proxy::{Proxy, ProxyFilter};
use assethub_domain::time::Timestamp;

/// Repository for persisting and querying [`Proxy`] records.
///
/// Every read returns records with their `identity` association loaded.
pub trait ProxyRepository {
    /// Insert a new proxy. The returned record carries the assigned id.
    fn create(&self, proxy: Proxy) -> impl Future<Output = Result<Proxy, HubError>> + Send;

    /// Get a proxy by its unique identifier.
    fn get_by_id(
        &self,
        id: ProxyId,
    ) -> impl Future<Output = Result<Option<Proxy>, HubError>> + Send;

    /// List proxies matching `filter`, ordered by id, restricted to `page`.
    fn list(
        &self,
        filter: ProxyFilter,
        page: Page,
    ) -> impl Future<Output = Result<Vec<Proxy>, HubError>> + Send;

    /// Replace the scalar columns of proxy `id` with those of `proxy`.
    ///
    /// Writes `enabled`, `kind`, `host`, `port`, the update audit columns,
    /// and `excluded` only when it is `Some`. The identity reference and the
    /// create audit columns are left as stored.
    ///
    /// Resolves to `false` when no row has this id.
    fn update(
        &self,
        id: ProxyId,
        proxy: Proxy,
    ) -> impl Future<Output = Result<bool, HubError>> + Send;

    /// Replace only the identity reference of proxy `id`.
    ///
    /// Resolves to `false` when no row has this id.
    fn set_identity(
        &self,
        id: ProxyId,
        identity_id: Option<IdentityId>,
        update_user: String,
        update_time: Timestamp,
    ) -> impl Future<Output = Result<bool, HubError>> + Send;

    /// Delete a proxy by its unique identifier.
    fn delete(&self, id: ProxyId) -> impl Future<Output = Result<(), HubError>> + Send;
}

/// Read access to the identities proxies refer to.
pub trait IdentityRepository {
    /// Insert a new identity.
    fn create(
        &self,
        kind: String,
        name: String,
    ) -> impl Future<Output = Result<Identity, HubError>> + Send;

    /// Get an identity by its unique identifier.
    fn get_by_id(
        &self,
        id: IdentityId,
    ) -> impl Future<Output = Result<Option<Identity>, HubError>> + Send;
}
