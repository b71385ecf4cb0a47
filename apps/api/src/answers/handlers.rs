use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::answers;
use crate::errors::AppError;
use crate::models::answer::AnswerEntry;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpsertAnswerRequest {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// POST /api/v1/profiles/:email/answers
pub async fn handle_upsert_answer(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(req): Json<UpsertAnswerRequest>,
) -> Result<Json<AnswerEntry>, AppError> {
    if req.question.trim().is_empty() {
        return Err(AppError::Validation("question must not be empty".into()));
    }
    if req.answer.trim().is_empty() {
        return Err(AppError::Validation("answer must not be empty".into()));
    }

    let entry = answers::upsert_answer(
        state.store.as_ref(),
        state.store.as_ref(),
        &email,
        &req.question,
        &req.answer,
        req.category.as_deref(),
    )
    .await?;
    Ok(Json(entry))
}

/// GET /api/v1/profiles/:email/answers?category=
pub async fn handle_list_answers(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(params): Query<CategoryQuery>,
) -> Result<Json<Vec<AnswerEntry>>, AppError> {
    let entries = answers::list_answers(
        state.store.as_ref(),
        state.store.as_ref(),
        &email,
        params.category.as_deref(),
    )
    .await?;
    Ok(Json(entries))
}
