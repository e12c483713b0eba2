//! Typed identifier newtypes backed by storage-assigned integers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a textual identifier is not a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a positive integer, got {0:?}")]
pub struct ParseIdError(String);

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw key as returned by the store.
            #[must_use]
            pub fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            /// Access the raw key.
            #[must_use]
            pub fn as_raw(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.parse::<i64>() {
                    Ok(raw) if raw > 0 => Ok(Self(raw)),
                    _ => Err(ParseIdError(s.to_owned())),
                }
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Proxy`](crate::proxy::Proxy).
    ProxyId
);

define_id!(
    /// Unique identifier for an [`Identity`](crate::identity::Identity).
    IdentityId
);
