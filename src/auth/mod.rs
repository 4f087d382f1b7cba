//! Bearer-token authentication.
//!
//! Identity is resolved once per request by [`identity_layer`]. A missing or invalid token is not
//! an error at that point: the request simply carries no identity, and only handlers taking a
//! [`CurrentUser`] reject it.

pub mod token;

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::errors::AppError;
use crate::models::UserRecord;
use crate::AppState;

pub use token::{Claims, TokenError, TokenSigner};

/// The user resolved from the request's bearer token, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Identity(pub Option<i64>);

/// Extract the token from an `Authorization: Bearer <token>` header. The scheme is matched
/// case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|s| !s.is_empty())
}

/// Identity resolution layer function that takes the token signer as a parameter.
pub async fn identity_layer(signer: Arc<TokenSigner>, mut request: Request, next: Next) -> Response {
    // Preflight requests are never authenticated.
    let identity = if request.method() == Method::OPTIONS {
        Identity(None)
    } else {
        match bearer_token(request.headers()).map(|token| signer.verify(token)) {
            Some(Ok(claims)) => Identity(Some(claims.subject())),
            Some(Err(e)) => {
                tracing::debug!("Ignoring bearer token: {}", e);
                Identity(None)
            }
            None => Identity(None),
        }
    };

    request.extensions_mut().insert(identity);
    next.run(request).await
}

/// An authenticated user; rejects the request with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Identity(Some(user_id)) = parts
            .extensions
            .get::<Identity>()
            .copied()
            .unwrap_or_default()
        else {
            return Err(AppError::Unauthorized("Authentication required".to_string()));
        };

        state
            .repo
            .get_user(user_id)
            .await?
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Bearerabc")), None);
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&headers("bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("BEARER abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
