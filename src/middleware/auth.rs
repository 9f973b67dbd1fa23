use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::auth::TokenService;
use crate::error::ApiError;

/// Header the mobile clients send the access token in
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Caller identity taken from a validated access token. Handlers that take this
/// extractor reject the request before running when the token is missing or bad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_idx: i64,
}

impl AuthUser {
    /// Fail with `InvalidUserJwt` unless the token was issued to `user_idx`
    pub fn ensure_owner(&self, user_idx: i64) -> Result<(), ApiError> {
        if self.user_idx != user_idx {
            tracing::warn!(token_user = self.user_idx, requested = user_idx, "Token used for another user");
            return Err(ApiError::InvalidUserJwt);
        }
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_from_headers(&parts.headers).ok_or(ApiError::EmptyJwt)?;
        let user_idx = TokenService::from_ref(state).validate(&token)?;

        Ok(AuthUser { user_idx })
    }
}

/// `X-ACCESS-TOKEN` wins; otherwise `Authorization: Bearer <jwt>`
fn extract_jwt_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(token) = raw {
        return Some(token.to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
