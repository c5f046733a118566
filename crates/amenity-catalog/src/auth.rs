//! Caller authentication for the amenity routes.
//!
//! A middleware resolves the bearer token through an [`Authenticator`] and
//! stores the resulting [`Caller`] in the request extensions; handlers pull it
//! back out with the [`Caller`] extractor.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::debug;

use crate::catalog::UserId;
use crate::config::AuthConfig;

/// Resolves an opaque credential to a caller identity.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, token: &str) -> Option<UserId>;
}

/// Fixed token table loaded from configuration.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, UserId>,
}

impl StaticTokenAuthenticator {
    pub fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (String, UserId)>,
    {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config
                .api_tokens
                .iter()
                .map(|(token, user)| (token.clone(), UserId(user.clone()))),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).cloned()
    }
}

/// Authenticated caller of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub UserId);

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authentication credentials were not provided or are invalid")]
    Unauthenticated,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Middleware rejecting requests without a valid bearer token.
pub async fn require_caller(
    State(authenticator): State<Arc<dyn Authenticator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let caller =
        bearer_token(request.headers()).and_then(|token| authenticator.authenticate(token));

    match caller {
        Some(user) => {
            request.extensions_mut().insert(Caller(user));
            next.run(request).await
        }
        None => {
            debug!(path = request.uri().path(), "rejecting unauthenticated request");
            AuthError::Unauthenticated.into_response()
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
