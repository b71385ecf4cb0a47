use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::profile::{CandidateProfile, Profile};
use crate::profile::service;
use crate::state::AppState;
use crate::store::ProfileStore;

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RecordSourceRequest {
    pub source_id: String,
}

/// POST /api/v1/profiles/merge
///
/// Accepts an already-extracted candidate record and merges it into the
/// canonical profile for its email.
pub async fn handle_merge_profile(
    State(state): State<AppState>,
    Json(candidate): Json<CandidateProfile>,
) -> Result<Json<Profile>, AppError> {
    let profile = service::merge_profile(state.store.as_ref(), &candidate).await?;
    Ok(Json(profile))
}

/// GET /api/v1/profiles/:email
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let profile = service::get_profile(state.store.as_ref(), &email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no profile for '{}'", email.trim())))?;
    Ok(Json(profile))
}

/// GET /api/v1/profiles?limit=
pub async fn handle_list_profiles(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Profile>>, AppError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let profiles = state.store.list(limit).await.map_err(|e| {
        AppError::StoreUnavailable(e.to_string())
    })?;
    Ok(Json(profiles))
}

/// POST /api/v1/profiles/:email/sources
pub async fn handle_record_source(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<RecordSourceRequest>,
) -> Result<Json<Profile>, AppError> {
    if req.source_id.trim().is_empty() {
        return Err(AppError::Validation("source_id must not be empty".into()));
    }
    let profile = service::record_source(state.store.as_ref(), &email, &req.source_id).await?;
    Ok(Json(profile))
}
