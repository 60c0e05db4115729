//! Session token extractor - Reads the token from the cookie or bearer header.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;

use crate::config::{BEARER_TOKEN_PREFIX, SESSION_COOKIE_NAME};

/// Token presented with the request, if any.
///
/// Never rejects; handlers decide whether a missing token is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for PresentedToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PresentedToken(token_from_headers(&parts.headers)))
    }
}

/// Find the session token in request headers.
///
/// The `token` cookie wins over `Authorization: Bearer`. Empty values count as absent.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE_NAME) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
