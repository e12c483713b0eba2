//! Proxy: a stored description of how outbound traffic should be routed.
//!
//! This is a configuration record only; nothing in the hub opens a
//! connection through it here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{IdentityId, ProxyId};
use crate::identity::Identity;
use crate::time::Timestamp;

/// Protocol a proxy is used for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyKind {
    #[default]
    Http,
    Https,
}

impl ProxyKind {
    /// Lowercase name, as stored and as exchanged on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProxyKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(ValidationError::InvalidKind(other.to_owned())),
        }
    }
}

/// Encoded exclusion list, as held in the `excluded` blob column.
///
/// The encoding is a UTF-8 JSON array of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludedBlob(Vec<u8>);

impl ExcludedBlob {
    /// Encode an ordered list of host patterns.
    #[must_use]
    pub fn encode(hosts: &[String]) -> Self {
        Self(serde_json::Value::from(hosts.to_vec()).to_string().into_bytes())
    }

    /// Wrap raw bytes read from storage.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode the list. Bytes that are not a JSON array of strings decode to
    /// an empty list.
    #[must_use]
    pub fn decode(&self) -> Vec<String> {
        serde_json::from_slice(&self.0).unwrap_or_default()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Storage record for a proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    /// Assigned by storage on creation; `None` until then.
    pub id: Option<ProxyId>,
    pub enabled: bool,
    pub kind: ProxyKind,
    pub host: String,
    pub port: u16,
    /// `None` means "not supplied": creation stores nothing, updates keep
    /// the current value.
    pub excluded: Option<ExcludedBlob>,
    pub identity_id: Option<IdentityId>,
    /// Association loaded with the record. Never written through.
    pub identity: Option<Identity>,
    pub create_user: String,
    pub update_user: String,
    pub create_time: Option<Timestamp>,
    pub update_time: Option<Timestamp>,
}

impl Proxy {
    /// Create a builder for constructing a [`Proxy`].
    #[must_use]
    pub fn builder() -> ProxyBuilder {
        ProxyBuilder::default()
    }

    /// Decoded exclusion list, empty when nothing is stored.
    #[must_use]
    pub fn excluded_hosts(&self) -> Vec<String> {
        self.excluded
            .as_ref()
            .map(ExcludedBlob::decode)
            .unwrap_or_default()
    }
}

/// Step-by-step builder for [`Proxy`].
#[derive(Debug, Default)]
pub struct ProxyBuilder {
    enabled: bool,
    kind: ProxyKind,
    host: String,
    port: u16,
    excluded: Option<Vec<String>>,
    identity_id: Option<IdentityId>,
}

impl ProxyBuilder {
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: ProxyKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn excluded<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded = Some(hosts.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn identity_id(mut self, identity_id: IdentityId) -> Self {
        self.identity_id = Some(identity_id);
        self
    }

    /// Consume the builder and return an unsaved [`Proxy`].
    #[must_use]
    pub fn build(self) -> Proxy {
        Proxy {
            id: None,
            enabled: self.enabled,
            kind: self.kind,
            host: self.host,
            port: self.port,
            excluded: self.excluded.as_deref().map(ExcludedBlob::encode),
            identity_id: self.identity_id,
            identity: None,
            create_user: String::new(),
            update_user: String::new(),
            create_time: None,
            update_time: None,
        }
    }
}

/// Criteria for listing proxies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyFilter {
    /// Exact match on the stored `kind` column.
    pub kind: Option<String>,
}
