//! Bearer-token authentication and per-resource scope checks.
//!
//! [`require_scope`] runs as a route layer: it resolves the [`Caller`],
//! rejects it when it lacks the scope for the route's resource and verb,
//! and otherwise stores it in the request extensions for handlers to
//! extract with `Extension<Caller>`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use assethub_domain::caller::Caller;

use crate::error::ErrorBody;

/// Reasons a request is turned away before reaching a handler.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token was presented.
    MissingCredentials,
    /// The token is not known.
    InvalidCredentials,
    /// The caller is known but lacks the scope.
    Forbidden { scope: String },
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "missing bearer token".to_string())
            }
            Self::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid bearer token".to_string())
            }
            Self::Forbidden { scope } => {
                (StatusCode::FORBIDDEN, format!("scope {scope} required"))
            }
        };

        let mut response = (status, Json(ErrorBody { error: message })).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Resolves request credentials to a [`Caller`].
#[derive(Debug, Default)]
pub struct Authenticator {
    required: bool,
    tokens: HashMap<String, Caller>,
}

impl Authenticator {
    /// Every request runs as [`Caller::admin`].
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Only requests bearing one of `tokens` are accepted.
    pub fn with_tokens(tokens: impl IntoIterator<Item = (String, Caller)>) -> Self {
        Self {
            required: true,
            tokens: tokens.into_iter().collect(),
        }
    }

    /// Resolve the caller for a request.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when authentication is required and the
    /// `Authorization` header is missing, malformed, or unknown.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Caller, AuthError> {
        if !self.required {
            return Ok(Caller::admin());
        }
        let token = extract_bearer(headers)?;
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)
    }
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidCredentials)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidCredentials)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    Ok(token)
}

/// Verb half of a `resource:verb` scope for an HTTP method.
fn verb(method: &Method) -> String {
    if method == Method::HEAD {
        return "get".to_string();
    }
    method.as_str().to_ascii_lowercase()
}

/// Middleware state: who authenticates, and which resource is protected.
#[derive(Clone)]
pub struct ScopeGuard {
    auth: Arc<Authenticator>,
    resource: &'static str,
}

impl ScopeGuard {
    pub fn new(auth: Arc<Authenticator>, resource: &'static str) -> Self {
        Self { auth, resource }
    }
}

/// Route layer enforcing [`ScopeGuard`].
///
/// # Errors
///
/// Returns [`AuthError`] when the caller cannot be authenticated or lacks
/// the scope; the inner handler is not run.
pub async fn require_scope(
    State(guard): State<ScopeGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let caller = guard.auth.authenticate(req.headers())?;
    let verb = verb(req.method());
    if !caller.can(guard.resource, &verb) {
        tracing::warn!(user = caller.user(), resource = guard.resource, %verb, "scope denied");
        return Err(AuthError::Forbidden {
            scope: format!("{}:{verb}", guard.resource),
        });
    }

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
