//! # assethub-domain
//!
//! Pure domain model for the assethub proxy configuration resource.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **Proxy** storage record and its exclusion-list blob codec
//! - Define the **Identity** record that proxies reference
//! - Define the **Caller** context and scope matching
//! - Define **Page** (offset/limit pagination)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod caller;
pub mod error;
pub mod id;
pub mod identity;
pub mod page;
pub mod proxy;
pub mod time;
