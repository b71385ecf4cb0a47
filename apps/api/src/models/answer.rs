use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored question/answer pair, unique per `(identity_key, question)`.
/// Question equality is exact-string; a rephrased question is a new entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AnswerEntry {
    pub identity_key: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DEFAULT_CATEGORY: &str = "general";

/// Recommended category labels. Free-form values are accepted as well; these
/// exist so API clients have a shared vocabulary to filter on.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
    "work_authorization",
    "relocation",
    "salary",
    "diversity",
    "preferences",
    "background",
    "references",
    "availability",
    "certifications",
    DEFAULT_CATEGORY,
];
