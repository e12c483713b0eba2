//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`HubError`]
//! via `#[from]` (or an explicit `From` impl for adapter errors).

/// Top-level error returned by application services and repositories.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// Input rejected before it reached storage.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The requested record does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons an input can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// `kind` is not one of the supported proxy kinds.
    #[error("invalid proxy kind {0:?}, expected one of: http, https")]
    InvalidKind(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier {0:?}")]
    InvalidId(String),

    /// A referenced identity does not exist.
    #[error("identity {0} does not exist")]
    UnknownIdentity(String),

    /// Pagination parameters could not be parsed.
    #[error("invalid pagination parameter {name}={value:?}")]
    InvalidPage { name: &'static str, value: String },

    /// The query string could not be bound.
    #[error("malformed query string: {0}")]
    MalformedQuery(String),

    /// The request body could not be bound to the resource.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

/// A lookup by id matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of record that was looked up.
    pub entity: &'static str,
    /// Identifier that was looked up.
    pub id: String,
}
