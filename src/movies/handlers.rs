use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::ApiError,
    extract::{ApiJson, ResourceId},
    movies::{
        dto::{EntryPatch, EntryRequest, EntryResponse},
        repo_types::{EntryChanges, EntryFields},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movies/", get(list_entries).post(create_entry))
        .route(
            "/movies/:id/",
            get(get_entry)
                .put(replace_entry)
                .patch(patch_entry)
                .delete(delete_entry),
        )
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<EntryResponse>>, ApiError> {
    let entries = state.catalog.list(caller).await?;
    Ok(Json(entries.into_iter().map(EntryResponse::from).collect()))
}

/// The owner is always the caller; any `user` in the body was dropped during parsing.
#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(payload): ApiJson<EntryRequest>,
) -> Result<(StatusCode, Json<EntryResponse>), ApiError> {
    payload.validate()?;
    let entry = state.catalog.create(caller, payload.into()).await?;
    info!(entry_id = %entry.id, owner = %caller, "catalog entry created");
    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state
        .catalog
        .get(caller, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(entry.into()))
}

#[instrument(skip(state, payload))]
pub async fn replace_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
    ApiJson(payload): ApiJson<EntryRequest>,
) -> Result<Json<EntryResponse>, ApiError> {
    payload.validate()?;
    apply_changes(&state, caller, id, EntryFields::from(payload).into()).await
}

#[instrument(skip(state, payload))]
pub async fn patch_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
    ApiJson(payload): ApiJson<EntryPatch>,
) -> Result<Json<EntryResponse>, ApiError> {
    payload.validate()?;
    apply_changes(&state, caller, id, payload.into()).await
}

async fn apply_changes(
    state: &AppState,
    caller: Uuid,
    id: Uuid,
    changes: EntryChanges,
) -> Result<Json<EntryResponse>, ApiError> {
    let entry = state
        .catalog
        .update(caller, id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(entry_id = %entry.id, "catalog entry updated");
    Ok(Json(entry.into()))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ApiError> {
    if !state.catalog.delete(caller, id).await? {
        return Err(ApiError::NotFound);
    }
    info!(entry_id = %id, "catalog entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
