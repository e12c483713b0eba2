//! Proxy service: use-cases for managing proxy configuration.

use assethub_domain::caller::Caller;
use assethub_domain::error::{HubError, NotFoundError, ValidationError};
use assethub_domain::id::{IdentityId, ProxyId};
use assethub_domain::page::Page;
use assethub_domain::proxy::{Proxy, ProxyFilter};
use assethub_domain::time::now;

use crate::ports::{IdentityRepository, ProxyRepository};

fn not_found(id: ProxyId) -> HubError {
    NotFoundError {
        entity: "Proxy",
        id: id.to_string(),
    }
    .into()
}

/// Application service for proxy CRUD operations.
pub struct ProxyService<P, I> {
    proxies: P,
    identities: I,
}

impl<P, I> ProxyService<P, I>
where
    P: ProxyRepository,
    I: IdentityRepository,
{
    /// Create a new service backed by the given repositories.
    pub fn new(proxies: P, identities: I) -> Self {
        Self {
            proxies,
            identities,
        }
    }

    /// List proxies matching `filter` within `page`.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_proxies(
        &self,
        filter: ProxyFilter,
        page: Page,
    ) -> Result<Vec<Proxy>, HubError> {
        self.proxies.list(filter, page).await
    }

    /// Look up a proxy by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no proxy with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_proxy(&self, id: ProxyId) -> Result<Proxy, HubError> {
        self.proxies
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Create a new proxy on behalf of `caller`.
    ///
    /// Any id on `proxy` is discarded; storage assigns one.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] if the referenced identity does not
    /// exist, or a storage error from the repository.
    #[tracing::instrument(
        skip(self, caller, proxy),
        fields(user = caller.user(), host = %proxy.host)
    )]
    pub async fn create_proxy(
        &self,
        caller: &Caller,
        mut proxy: Proxy,
    ) -> Result<Proxy, HubError> {
        if let Some(identity_id) = proxy.identity_id {
            self.ensure_identity(identity_id).await?;
        }

        let ts = now();
        proxy.id = None;
        proxy.identity = None;
        proxy.create_user = caller.user().to_owned();
        proxy.update_user = caller.user().to_owned();
        proxy.create_time = Some(ts);
        proxy.update_time = Some(ts);

        let created = self.proxies.create(proxy).await?;
        tracing::info!(id = ?created.id, "proxy created");
        Ok(created)
    }

    /// Replace the scalar fields of proxy `id` on behalf of `caller`.
    ///
    /// `id` wins over any id carried by `proxy`. The identity reference is
    /// not changed; use [`Self::assign_identity`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no proxy with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self, caller, proxy), fields(user = caller.user()))]
    pub async fn update_proxy(
        &self,
        caller: &Caller,
        id: ProxyId,
        mut proxy: Proxy,
    ) -> Result<(), HubError> {
        proxy.id = Some(id);
        proxy.update_user = caller.user().to_owned();
        proxy.update_time = Some(now());

        if self.proxies.update(id, proxy).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Point proxy `id` at `identity_id`, or clear the reference with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] if the identity does not exist,
    /// [`HubError::NotFound`] when no proxy with `id` exists, or a storage
    /// error from the repository.
    #[tracing::instrument(skip(self, caller), fields(user = caller.user()))]
    pub async fn assign_identity(
        &self,
        caller: &Caller,
        id: ProxyId,
        identity_id: Option<IdentityId>,
    ) -> Result<(), HubError> {
        if let Some(identity_id) = identity_id {
            self.ensure_identity(identity_id).await?;
        }

        let updated = self
            .proxies
            .set_identity(id, identity_id, caller.user().to_owned(), now())
            .await?;
        if updated {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Delete a proxy by id.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::NotFound`] when no proxy with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_proxy(&self, id: ProxyId) -> Result<(), HubError> {
        self.get_proxy(id).await?;
        self.proxies.delete(id).await?;
        tracing::info!(%id, "proxy deleted");
        Ok(())
    }

    async fn ensure_identity(&self, id: IdentityId) -> Result<(), HubError> {
        match self.identities.get_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(ValidationError::UnknownIdentity(id.to_string()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assethub_domain::identity::Identity;
    use assethub_domain::proxy::{ExcludedBlob, ProxyKind};
    use assethub_domain::time::Timestamp;
    use std::collections::BTreeMap;
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct InMemoryStore {
        proxies: Mutex<BTreeMap<ProxyId, Proxy>>,
        identities: Mutex<BTreeMap<IdentityId, Identity>>,
        next_id: Mutex<i64>,
    }

    impl InMemoryStore {
        fn next_id(&self) -> i64 {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        }

        fn resolve(&self, mut proxy: Proxy) -> Proxy {
            let identities = self.identities.lock().unwrap();
            proxy.identity = proxy.identity_id.and_then(|id| identities.get(&id).cloned());
            proxy
        }
    }

    impl ProxyRepository for Arc<InMemoryStore> {
        fn create(&self, mut proxy: Proxy) -> impl Future<Output = Result<Proxy, HubError>> + Send {
            let id = ProxyId::from_raw(self.next_id());
            proxy.id = Some(id);
            self.proxies.lock().unwrap().insert(id, proxy.clone());
            let proxy = self.resolve(proxy);
            async { Ok(proxy) }
        }

        fn get_by_id(
            &self,
            id: ProxyId,
        ) -> impl Future<Output = Result<Option<Proxy>, HubError>> + Send {
            let found = self.proxies.lock().unwrap().get(&id).cloned();
            let result = found.map(|p| self.resolve(p));
            async { Ok(result) }
        }

        fn list(
            &self,
            filter: ProxyFilter,
            page: Page,
        ) -> impl Future<Output = Result<Vec<Proxy>, HubError>> + Send {
            let all: Vec<Proxy> = self.proxies.lock().unwrap().values().cloned().collect();
            let result: Vec<Proxy> = all
                .into_iter()
                .filter(|p| filter.kind.as_deref().is_none_or(|k| p.kind.as_str() == k))
                .skip(page.offset as usize)
                .take(page.limit.map_or(usize::MAX, |l| l as usize))
                .map(|p| self.resolve(p))
                .collect();
            async { Ok(result) }
        }

        fn update(
            &self,
            id: ProxyId,
            proxy: Proxy,
        ) -> impl Future<Output = Result<bool, HubError>> + Send {
            let mut store = self.proxies.lock().unwrap();
            let found = match store.get_mut(&id) {
                Some(current) => {
                    current.enabled = proxy.enabled;
                    current.kind = proxy.kind;
                    current.host = proxy.host;
                    current.port = proxy.port;
                    if proxy.excluded.is_some() {
                        current.excluded = proxy.excluded;
                    }
                    current.update_user = proxy.update_user;
                    current.update_time = proxy.update_time;
                    true
                }
                None => false,
            };
            async move { Ok(found) }
        }

        fn set_identity(
            &self,
            id: ProxyId,
            identity_id: Option<IdentityId>,
            update_user: String,
            update_time: Timestamp,
        ) -> impl Future<Output = Result<bool, HubError>> + Send {
            let mut store = self.proxies.lock().unwrap();
            let found = match store.get_mut(&id) {
                Some(current) => {
                    current.identity_id = identity_id;
                    current.update_user = update_user;
                    current.update_time = Some(update_time);
                    true
                }
                None => false,
            };
            async move { Ok(found) }
        }

        fn delete(&self, id: ProxyId) -> impl Future<Output = Result<(), HubError>> + Send {
            self.proxies.lock().unwrap().remove(&id);
            async { Ok(()) }
        }
    }

    impl IdentityRepository for Arc<InMemoryStore> {
        fn create(
            &self,
            kind: String,
            name: String,
        ) -> impl Future<Output = Result<Identity, HubError>> + Send {
            let identity = Identity {
                id: IdentityId::from_raw(self.next_id()),
                kind,
                name,
            };
            self.identities
                .lock()
                .unwrap()
                .insert(identity.id, identity.clone());
            async { Ok(identity) }
        }

        fn get_by_id(
            &self,
            id: IdentityId,
        ) -> impl Future<Output = Result<Option<Identity>, HubError>> + Send {
            let result = self.identities.lock().unwrap().get(&id).cloned();
            async { Ok(result) }
        }
    }

    type Service = ProxyService<Arc<InMemoryStore>, Arc<InMemoryStore>>;

    fn make_service() -> (Service, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        (
            ProxyService::new(Arc::clone(&store), Arc::clone(&store)),
            store,
        )
    }

    fn valid_proxy() -> Proxy {
        Proxy::builder()
            .enabled(true)
            .kind(ProxyKind::Http)
            .host("proxy.corp")
            .port(3128)
            .excluded(["localhost", "*.internal"])
            .build()
    }

    fn alice() -> Caller {
        Caller::new("alice", Vec::new())
    }

    #[tokio::test]
    async fn should_create_proxy_and_stamp_audit_fields() {
        let (svc, _) = make_service();

        let created = svc.create_proxy(&alice(), valid_proxy()).await.unwrap();
        let id = created.id.unwrap();
        assert_eq!(created.create_user, "alice");
        assert_eq!(created.update_user, "alice");
        assert!(created.create_time.is_some());

        let fetched = svc.get_proxy(id).await.unwrap();
        assert_eq!(fetched.host, "proxy.corp");
        assert_eq!(fetched.excluded_hosts(), vec!["localhost", "*.internal"]);
    }

    #[tokio::test]
    async fn should_ignore_client_supplied_id_on_create() {
        let (svc, _) = make_service();
        let mut proxy = valid_proxy();
        proxy.id = Some(ProxyId::from_raw(99));
        proxy.create_user = "mallory".to_string();

        let created = svc.create_proxy(&alice(), proxy).await.unwrap();
        assert_eq!(created.id, Some(ProxyId::from_raw(1)));
        assert_eq!(created.create_user, "alice");
    }

    #[tokio::test]
    async fn should_resolve_identity_on_create() {
        let (svc, store) = make_service();
        let identity = IdentityRepository::create(&store, "proxy".into(), "corp-creds".into())
            .await
            .unwrap();
        let mut proxy = valid_proxy();
        proxy.identity_id = Some(identity.id);

        let created = svc.create_proxy(&alice(), proxy).await.unwrap();
        assert_eq!(created.identity, Some(identity));
    }

    #[tokio::test]
    async fn should_reject_create_when_identity_unknown() {
        let (svc, store) = make_service();
        let mut proxy = valid_proxy();
        proxy.identity_id = Some(IdentityId::from_raw(404));

        let result = svc.create_proxy(&alice(), proxy).await;
        assert!(matches!(
            result,
            Err(HubError::Validation(ValidationError::UnknownIdentity(_)))
        ));
        assert!(store.proxies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_return_not_found_when_proxy_missing() {
        let (svc, _) = make_service();
        let result = svc.get_proxy(ProxyId::from_raw(7)).await;
        assert!(matches!(result, Err(HubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_filter_list_by_kind() {
        let (svc, _) = make_service();
        svc.create_proxy(&alice(), valid_proxy()).await.unwrap();
        let mut https = valid_proxy();
        https.kind = ProxyKind::Https;
        svc.create_proxy(&alice(), https).await.unwrap();

        let filter = ProxyFilter {
            kind: Some("https".to_string()),
        };
        let found = svc.list_proxies(filter, Page::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ProxyKind::Https);

        let all = svc
            .list_proxies(ProxyFilter::default(), Page::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn should_update_scalars_and_keep_identity() {
        let (svc, store) = make_service();
        let identity = IdentityRepository::create(&store, "proxy".into(), "creds".into())
            .await
            .unwrap();
        let mut proxy = valid_proxy();
        proxy.identity_id = Some(identity.id);
        let id = svc
            .create_proxy(&alice(), proxy)
            .await
            .unwrap()
            .id
            .unwrap();

        let replacement = Proxy::builder()
            .enabled(false)
            .kind(ProxyKind::Https)
            .host("h")
            .port(443)
            .excluded(["x"])
            .build();
        let bob = Caller::new("bob", Vec::new());
        svc.update_proxy(&bob, id, replacement).await.unwrap();

        let fetched = svc.get_proxy(id).await.unwrap();
        assert!(!fetched.enabled);
        assert_eq!(fetched.kind, ProxyKind::Https);
        assert_eq!(fetched.host, "h");
        assert_eq!(fetched.port, 443);
        assert_eq!(fetched.excluded_hosts(), vec!["x"]);
        assert_eq!(fetched.identity_id, Some(identity.id));
        assert_eq!(fetched.create_user, "alice");
        assert_eq!(fetched.update_user, "bob");
    }

    #[tokio::test]
    async fn should_keep_excluded_when_update_omits_it() {
        let (svc, _) = make_service();
        let id = svc
            .create_proxy(&alice(), valid_proxy())
            .await
            .unwrap()
            .id
            .unwrap();

        let mut replacement = valid_proxy();
        replacement.excluded = None;
        svc.update_proxy(&alice(), id, replacement).await.unwrap();

        let fetched = svc.get_proxy(id).await.unwrap();
        assert_eq!(fetched.excluded_hosts(), vec!["localhost", "*.internal"]);
    }

    #[tokio::test]
    async fn should_clear_excluded_when_update_sends_empty_list() {
        let (svc, _) = make_service();
        let id = svc
            .create_proxy(&alice(), valid_proxy())
            .await
            .unwrap()
            .id
            .unwrap();

        let mut replacement = valid_proxy();
        replacement.excluded = Some(ExcludedBlob::encode(&[]));
        svc.update_proxy(&alice(), id, replacement).await.unwrap();

        let fetched = svc.get_proxy(id).await.unwrap();
        assert!(fetched.excluded_hosts().is_empty());
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_proxy() {
        let (svc, _) = make_service();
        let result = svc
            .update_proxy(&alice(), ProxyId::from_raw(7), valid_proxy())
            .await;
        assert!(matches!(result, Err(HubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_assign_and_clear_identity() {
        let (svc, store) = make_service();
        let identity = IdentityRepository::create(&store, "proxy".into(), "creds".into())
            .await
            .unwrap();
        let id = svc
            .create_proxy(&alice(), valid_proxy())
            .await
            .unwrap()
            .id
            .unwrap();

        svc.assign_identity(&alice(), id, Some(identity.id))
            .await
            .unwrap();
        assert_eq!(
            svc.get_proxy(id).await.unwrap().identity_id,
            Some(identity.id)
        );

        svc.assign_identity(&alice(), id, None).await.unwrap();
        assert!(svc.get_proxy(id).await.unwrap().identity_id.is_none());
    }

    #[tokio::test]
    async fn should_reject_assigning_unknown_identity() {
        let (svc, _) = make_service();
        let id = svc
            .create_proxy(&alice(), valid_proxy())
            .await
            .unwrap()
            .id
            .unwrap();

        let result = svc
            .assign_identity(&alice(), id, Some(IdentityId::from_raw(404)))
            .await;
        assert!(matches!(result, Err(HubError::Validation(_))));
    }

    #[tokio::test]
    async fn should_delete_proxy() {
        let (svc, _) = make_service();
        let id = svc
            .create_proxy(&alice(), valid_proxy())
            .await
            .unwrap()
            .id
            .unwrap();

        svc.delete_proxy(id).await.unwrap();

        let result = svc.get_proxy(id).await;
        assert!(matches!(result, Err(HubError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_proxy() {
        let (svc, _) = make_service();
        let result = svc.delete_proxy(ProxyId::from_raw(3)).await;
        assert!(matches!(result, Err(HubError::NotFound(_))));
    }
}
