pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::answer::AnswerEntry;
use crate::models::profile::Profile;

/// Errors surfaced by store implementations. `Conflict` is only ever seen by
/// the engine's upsert loop, which retries it against a fresh read; callers
/// outside the engine see `Unavailable`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("concurrent modification of '{0}'")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// A profile together with the store version backing compare-and-swap writes.
#[derive(Debug, Clone)]
pub struct StoredProfile {
    pub profile: Profile,
    pub version: i64,
}

/// The persistence contract the merge engine needs. Writes are
/// compare-and-swap: `put` with `expected_version: None` inserts and conflicts
/// if the key already exists; `Some(v)` updates and conflicts unless the
/// stored version is still `v`. This is what makes merges for the same
/// identity linearizable without any in-process lock.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_by_identity(&self, key: &str) -> Result<Option<StoredProfile>, StoreError>;

    async fn put(&self, profile: &Profile, expected_version: Option<i64>)
        -> Result<(), StoreError>;

    /// Profiles ordered by most recent update first.
    async fn list(&self, limit: i64) -> Result<Vec<Profile>, StoreError>;
}

/// Persistence contract for the answer store. `upsert` must preserve
/// `created_at` (and listing order) across overwrites of the same question.
#[async_trait]
pub trait AnswerStore: Send + Sync {
    async fn upsert(
        &self,
        identity_key: &str,
        question: &str,
        answer: &str,
        category: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerEntry, StoreError>;

    /// Entries for an identity in first-creation order, optionally filtered by
    /// category (case-insensitive).
    async fn list(
        &self,
        identity_key: &str,
        category: Option<&str>,
    ) -> Result<Vec<AnswerEntry>, StoreError>;
}
