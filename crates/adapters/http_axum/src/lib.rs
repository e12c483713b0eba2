//! # assethub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **proxies JSON API** (`/api/proxies`, `/api/proxies/{id}`, …)
//! - Resolve the calling principal from the `Authorization` header and gate
//!   every route on the `proxies` scope before any handler runs
//! - Translate between the wire resource and the storage record
//!   ([`resource`])
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `assethub-app` (for port traits and services) and
//! `assethub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod auth;
pub mod error;
pub mod resource;
pub mod router;
pub mod state;
