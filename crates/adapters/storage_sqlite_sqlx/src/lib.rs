//! # assethub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `assethub-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain records and database rows
//!
//! ## Dependency rule
//! Depends on `assethub-app` (for port traits) and `assethub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod identity_repo;
pub mod pool;
pub mod proxy_repo;

pub use identity_repo::SqliteIdentityRepository;
pub use pool::{Config, Database};
pub use proxy_repo::SqliteProxyRepository;
