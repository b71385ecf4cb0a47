//! Answer store: category-tagged question/answer pairs per identity, one
//! current answer per exact question text. Resubmitting a question overwrites
//! the answer in place; `created_at` and listing order are set once at first
//! insertion. Answers for identities with no profile are rejected rather than
//! stored orphaned.

pub mod handlers;

use chrono::Utc;
use tracing::{debug, info};

use crate::errors::EngineError;
use crate::models::answer::{AnswerEntry, DEFAULT_CATEGORY, SUGGESTED_CATEGORIES};
use crate::profile::identity;
use crate::store::{AnswerStore, ProfileStore};

/// Inserts or overwrites the answer for `(identity, question)`. The question
/// is matched exactly after whitespace trimming; a rephrased question is a
/// distinct entry by design.
pub async fn upsert_answer(
    profiles: &dyn ProfileStore,
    answers: &dyn AnswerStore,
    raw_identity: &str,
    question: &str,
    answer: &str,
    category: Option<&str>,
) -> Result<AnswerEntry, EngineError> {
    let key = identity::normalize(raw_identity)?;
    if profiles.find_by_identity(&key).await?.is_none() {
        return Err(EngineError::UnknownIdentity(key));
    }

    let category = match category.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => DEFAULT_CATEGORY,
    };
    if !SUGGESTED_CATEGORIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category))
    {
        // Free-form categories are allowed; this is only for log visibility.
        debug!("Category '{category}' is not one of the suggested labels");
    }

    let entry = answers
        .upsert(&key, question.trim(), answer.trim(), category, Utc::now())
        .await?;
    info!("Stored answer for '{key}' in category '{category}'");
    Ok(entry)
}

/// Lists an identity's answers in first-creation order, optionally filtered by
/// category (case-insensitive).
pub async fn list_answers(
    profiles: &dyn ProfileStore,
    answers: &dyn AnswerStore,
    raw_identity: &str,
    category: Option<&str>,
) -> Result<Vec<AnswerEntry>, EngineError> {
    let key = identity::normalize(raw_identity)?;
    if profiles.find_by_identity(&key).await?.is_none() {
        return Err(EngineError::UnknownIdentity(key));
    }
    Ok(answers.list(&key, category).await?)
}
