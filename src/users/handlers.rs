use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::{extractors::AuthUser, password::hash_password},
    error::ApiError,
    extract::{ApiJson, ResourceId},
    state::AppState,
    users::{
        dto::{AccountPatch, AccountRequest, PublicAccount},
        repo_types::{AccountChanges, NewAccount},
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/", get(list_accounts).post(create_account))
        .route(
            "/users/:id/",
            get(get_account)
                .put(replace_account)
                .patch(patch_account)
                .delete(delete_account),
        )
}

/// Signup. Open to anonymous callers.
#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AccountRequest>,
) -> Result<(StatusCode, Json<PublicAccount>), ApiError> {
    payload.validate()?;
    let password_hash = hash_password(&payload.password)?;

    let account = state
        .accounts
        .create(NewAccount {
            username: payload.username,
            email: payload.email,
            password_hash,
        })
        .await?;

    info!(account_id = %account.id, username = %account.username, "account created");
    Ok((StatusCode::CREATED, Json(account.into())))
}

#[instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<PublicAccount>>, ApiError> {
    let accounts = state.accounts.list_visible(caller).await?;
    Ok(Json(accounts.into_iter().map(PublicAccount::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
) -> Result<Json<PublicAccount>, ApiError> {
    let account = state
        .accounts
        .get(caller, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(account.into()))
}

#[instrument(skip(state, payload))]
pub async fn replace_account(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
    ApiJson(payload): ApiJson<AccountRequest>,
) -> Result<Json<PublicAccount>, ApiError> {
    payload.validate()?;
    apply_changes(&state, caller, id, payload.into()).await
}

#[instrument(skip(state, payload))]
pub async fn patch_account(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
    ApiJson(payload): ApiJson<AccountPatch>,
) -> Result<Json<PublicAccount>, ApiError> {
    payload.validate()?;
    apply_changes(&state, caller, id, payload).await
}

async fn apply_changes(
    state: &AppState,
    caller: uuid::Uuid,
    id: uuid::Uuid,
    patch: AccountPatch,
) -> Result<Json<PublicAccount>, ApiError> {
    let password_hash = patch.password.as_deref().map(hash_password).transpose()?;
    let changes = AccountChanges {
        username: patch.username,
        email: patch.email,
        password_hash,
    };

    let account = state
        .accounts
        .update(caller, id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!(account_id = %account.id, "account updated");
    Ok(Json(account.into()))
}

#[instrument(skip(state))]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    if !state.accounts.delete(caller, id).await? {
        return Err(ApiError::NotFound);
    }
    info!(account_id = %id, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::testing::{call, login, signup, test_app};

    #[tokio::test]
    async fn signup_hides_password() {
        let (app, _) = test_app();
        let (status, body) = call(
            &app,
            Method::POST,
            "/users/",
            None,
            Some(json!({ "username": "al", "email": "a@x.com", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_string());
        assert_eq!(body["username"], "al");
        assert_eq!(body["email"], "a@x.com");
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn signup_rejects_duplicates_and_missing_fields() {
        let (app, _) = test_app();
        signup(&app, "al").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/users/",
            None,
            Some(json!({ "username": "al", "email": "other@x.com", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("username"));

        let (status, body) = call(
            &app,
            Method::POST,
            "/users/",
            None,
            Some(json!({ "username": "bo", "email": "al@example.com", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("email"));

        let (status, _) = call(
            &app,
            Method::POST,
            "/users/",
            None,
            Some(json!({ "username": "cy", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_shows_only_the_caller() {
        let (app, _) = test_app();
        let al = signup(&app, "al").await;
        signup(&app, "bo").await;
        let token = login(&app, "al").await;

        let (status, body) = call(&app, Method::GET, "/users/", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], json!(al.to_string()));

        let (status, _) = call(&app, Method::GET, "/users/", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn other_accounts_are_not_found() {
        let (app, _) = test_app();
        signup(&app, "al").await;
        let bo = signup(&app, "bo").await;
        let token = login(&app, "al").await;
        let uri = format!("/users/{bo}/");

        let (status, _) = call(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(
            &app,
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "email": "hijack@x.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(&app, Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(&app, Method::GET, "/users/not-a-uuid/", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn patch_rehashes_password() {
        let (app, _) = test_app();
        let al = signup(&app, "al").await;
        let token = login(&app, "al").await;

        let (status, body) = call(
            &app,
            Method::PATCH,
            &format!("/users/{al}/"),
            Some(&token),
            Some(json!({ "password": "fresh" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("password").is_none());

        let (status, _) = call(
            &app,
            Method::POST,
            "/token/",
            None,
            Some(json!({ "username": "al", "password": "fresh" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn put_requires_every_field() {
        let (app, _) = test_app();
        let al = signup(&app, "al").await;
        let token = login(&app, "al").await;
        let uri = format!("/users/{al}/");

        let (status, _) = call(&app, Method::PUT, &uri, Some(&token), Some(json!({ "username": "al2" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(
            &app,
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "username": "al2", "email": "al2@x.com", "password": "pw2" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "al2");
        assert_eq!(body["email"], "al2@x.com");
    }

    #[tokio::test]
    async fn delete_self_cascades_entries_and_revokes_access() {
        let (app, state) = test_app();
        let al = signup(&app, "al").await;
        let token = login(&app, "al").await;
        let (status, _) = call(
            &app,
            Method::POST,
            "/movies/",
            Some(&token),
            Some(crate::testing::entry_body("Heat")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = call(&app, Method::DELETE, &format!("/users/{al}/"), Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        assert!(state.catalog.list(al).await.unwrap().is_empty());
        let (status, _) = call(&app, Method::GET, "/me/", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn padded_username_collides_with_existing() {
        let (app, _) = test_app();
        signup(&app, "al").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/users/",
            None,
            Some(json!({ "username": "  al  ", "email": "x@y.com", "password": "p" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("username"));

        let (status, body) = call(
            &app,
            Method::POST,
            "/users/",
            None,
            Some(json!({ "username": " bo ", "email": " bo@x.com ", "password": "p" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["username"], "bo");
        assert_eq!(body["email"], "bo@x.com");
    }

    #[tokio::test]
    async fn patch_with_null_is_rejected() {
        let (app, _) = test_app();
        let al = signup(&app, "al").await;
        let token = login(&app, "al").await;

        let (status, _) = call(
            &app,
            Method::PATCH,
            &format!("/users/{al}/"),
            Some(&token),
            Some(json!({ "email": null })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, me) = call(&app, Method::GET, "/me/", Some(&token), None).await;
        assert_eq!(me["email"], "al@example.com");
    }
}
