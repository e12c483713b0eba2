//! Wire resources and their mapping to storage records.
//!
//! [`ProxyResource`] is the JSON shape exchanged over HTTP. `From<Proxy>`
//! renders a stored record; [`ProxyResource::into_record`] builds the record
//! to persist from a request body. Both directions are pure.

use serde::{Deserialize, Serialize};

use assethub_domain::id::{IdentityId, ProxyId};
use assethub_domain::identity::Identity;
use assethub_domain::proxy::{ExcludedBlob, Proxy, ProxyKind};
use assethub_domain::time::Timestamp;

/// Lightweight `{id, name}` projection of a referenced record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    pub id: IdentityId,
    #[serde(default)]
    pub name: String,
}

/// Proxy REST resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResource {
    /// Ignored on input; storage and the path decide.
    #[serde(default)]
    pub id: Option<ProxyId>,
    #[serde(default, skip_deserializing)]
    pub create_user: String,
    #[serde(default, skip_deserializing)]
    pub update_user: String,
    #[serde(default, skip_deserializing)]
    pub create_time: Option<Timestamp>,
    #[serde(default, skip_deserializing)]
    pub update_time: Option<Timestamp>,
    #[serde(default)]
    pub enabled: bool,
    pub kind: ProxyKind,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    /// Absent or `null` on input means "not supplied". Always an array on
    /// output.
    #[serde(default)]
    pub excluded: Option<Vec<String>>,
    #[serde(default)]
    pub identity: Option<Ref>,
}

impl ProxyResource {
    /// Build the storage record for this resource.
    ///
    /// The exclusion list is encoded only when present; audit fields are
    /// left for the service to stamp.
    #[must_use]
    pub fn into_record(self) -> Proxy {
        Proxy {
            id: self.id,
            enabled: self.enabled,
            kind: self.kind,
            host: self.host,
            port: self.port,
            excluded: self.excluded.as_deref().map(ExcludedBlob::encode),
            identity_id: self.identity.map(|r| r.id),
            identity: None,
            create_user: String::new(),
            update_user: String::new(),
            create_time: None,
            update_time: None,
        }
    }
}

impl From<Proxy> for ProxyResource {
    fn from(proxy: Proxy) -> Self {
        let excluded = proxy.excluded_hosts();
        let identity = reference(proxy.identity_id, proxy.identity);
        Self {
            id: proxy.id,
            create_user: proxy.create_user,
            update_user: proxy.update_user,
            create_time: proxy.create_time,
            update_time: proxy.update_time,
            enabled: proxy.enabled,
            kind: proxy.kind,
            host: proxy.host,
            port: proxy.port,
            excluded: Some(excluded),
            identity,
        }
    }
}

/// Project a foreign key and its loaded record into a [`Ref`].
fn reference(id: Option<IdentityId>, loaded: Option<Identity>) -> Option<Ref> {
    id.map(|id| Ref {
        id,
        name: loaded.map(|i| i.name).unwrap_or_default(),
    })
}

/// Body of `PUT /api/proxies/{id}/identity`.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityAssignment {
    /// `null` (or absent) clears the reference.
    #[serde(default)]
    pub identity: Option<Ref>,
}
