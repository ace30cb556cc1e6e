use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::{error::ApiError, state::AppState};

/// The authenticated caller: extracts and validates the bearer JWT, returning the account ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Read Authorization header
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                ApiError::unauthenticated("must be authenticated to perform this action")
            })?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::unauthenticated("invalid auth scheme"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify_access(token.trim()).map_err(|e| {
            warn!(error = %e, "rejected bearer token");
            ApiError::unauthenticated("Given token not valid for any token type")
        })?;

        // Tokens outlive accounts; a deleted account must not keep access.
        match state.accounts.get(claims.sub, claims.sub).await? {
            Some(_) => Ok(AuthUser(claims.sub)),
            None => {
                warn!(account_id = %claims.sub, "token for unknown account");
                Err(ApiError::unauthenticated("User not found"))
            }
        }
    }
}
