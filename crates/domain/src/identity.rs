//! Identity: a credential record owned by another part of the hub.
//!
//! Proxies only point at identities; they never own them. The full record is
//! loaded alongside a proxy but only its `{id, name}` projection is exposed.

use serde::{Deserialize, Serialize};

use crate::id::IdentityId;

/// A stored credential (source control, proxy, maven, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub kind: String,
    pub name: String,
}
