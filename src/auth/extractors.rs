use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::auth::token::JwtKeys;
use crate::error::ApiError;

/// Auth gate. Extracts and validates the bearer token, handing the wrapped
/// handler an already-verified identity; handlers never touch raw token
/// material. Every failure mode answers with the same unauthenticated
/// response, the specific reason goes to the log only.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                warn!("missing authorization header");
                ApiError::Unauthenticated
            })?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| {
                warn!("authorization header is not a bearer token");
                ApiError::Unauthenticated
            })?;

        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            ApiError::Unauthenticated
        })?;

        Ok(AuthUser(claims.sub))
    }
}
