//! # assethub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `ProxyRepository`: CRUD plus relationship replacement for proxies
//!   - `IdentityRepository`: lookup of the identities proxies point at
//! - Define **driving/inbound ports** as use-case structs:
//!   - `ProxyService`: list, get, create, update, assign identity, delete
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `assethub-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
