use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AccessToken, RefreshRequest, TokenPair, TokenRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{verify_against_dummy, verify_password},
    },
    error::ApiError,
    extract::ApiJson,
    state::AppState,
    users::dto::PublicAccount,
};

const BAD_CREDENTIALS: &str = "No active account found with the given credentials";

pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/token/", post(obtain_token))
        .route("/token/refresh/", post(refresh_token))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me/", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn obtain_token(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TokenRequest>,
) -> Result<Json<TokenPair>, ApiError> {
    let account = match state.accounts.find_by_username(&payload.username).await? {
        Some(a) => a,
        None => {
            verify_against_dummy(&payload.password);
            warn!(username = %payload.username, "login unknown username");
            return Err(ApiError::unauthenticated(BAD_CREDENTIALS));
        }
    };

    if !verify_password(&payload.password, &account.password_hash)? {
        warn!(account_id = %account.id, "login invalid password");
        return Err(ApiError::unauthenticated(BAD_CREDENTIALS));
    }

    let keys = JwtKeys::from_ref(&state);
    let access = keys.sign_access(account.id)?;
    let refresh = keys.sign_refresh(account.id)?;

    info!(account_id = %account.id, "token pair issued");
    Ok(Json(TokenPair { access, refresh }))
}

#[instrument(skip(state, payload))]
pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> Result<Json<AccessToken>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh).map_err(|e| {
        warn!(error = %e, "rejected refresh token");
        ApiError::unauthenticated("Token is invalid or expired")
    })?;

    if state.accounts.get(claims.sub, claims.sub).await?.is_none() {
        warn!(account_id = %claims.sub, "refresh for unknown account");
        return Err(ApiError::unauthenticated("User not found"));
    }

    let access = keys.sign_access(claims.sub)?;
    Ok(Json(AccessToken { access }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
) -> Result<Json<PublicAccount>, ApiError> {
    let account = state
        .accounts
        .get(account_id, account_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(account.into()))
}
