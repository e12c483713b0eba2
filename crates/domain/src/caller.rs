//! Caller: the authenticated principal a request runs as.
//!
//! Passed explicitly into every use-case that needs to know who is acting,
//! rather than read from ambient state.

use serde::{Deserialize, Serialize};

/// A named capability such as `proxies` or `proxies:get`.
///
/// A scope grants access to a resource when it is the wildcard `*`, the bare
/// resource name (every verb), or `resource:verb`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    /// Grants every resource and verb.
    pub const WILDCARD: &'static str = "*";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Whether this scope grants `verb` on `resource`.
    #[must_use]
    pub fn grants(&self, resource: &str, verb: &str) -> bool {
        if self.0 == Self::WILDCARD || self.0 == resource {
            return true;
        }
        match self.0.split_once(':') {
            Some((res, v)) => res == resource && (v == verb || v == Self::WILDCARD),
            None => false,
        }
    }
}

/// The principal on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    user: String,
    scopes: Vec<Scope>,
}

impl Caller {
    /// Name used when authentication is disabled.
    pub const ADMIN: &'static str = "admin";

    pub fn new(user: impl Into<String>, scopes: Vec<Scope>) -> Self {
        Self {
            user: user.into(),
            scopes,
        }
    }

    /// Built-in caller holding every scope.
    #[must_use]
    pub fn admin() -> Self {
        Self::new(Self::ADMIN, vec![Scope::new(Scope::WILDCARD)])
    }

    /// User name recorded in audit columns.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Whether any held scope grants `verb` on `resource`.
    #[must_use]
    pub fn can(&self, resource: &str, verb: &str) -> bool {
        self.scopes.iter().any(|s| s.grants(resource, verb))
    }
}
