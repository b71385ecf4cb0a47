use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

use crate::models::answer::AnswerEntry;
use crate::models::profile::Profile;
use crate::store::{AnswerStore, ProfileStore, StoreError, StoredProfile};

/// PostgreSQL-backed store. Each profile is a single JSONB document guarded by
/// a `version` column; answers are relational rows keyed by
/// `(identity_key, question)`.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_by_identity(&self, key: &str) -> Result<Option<StoredProfile>, StoreError> {
        let row: Option<(Json<Profile>, i64)> =
            sqlx::query_as("SELECT doc, version FROM profiles WHERE identity_key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(doc, version)| StoredProfile {
            profile: doc.0,
            version,
        }))
    }

    async fn put(
        &self,
        profile: &Profile,
        expected_version: Option<i64>,
    ) -> Result<(), StoreError> {
        let result = match expected_version {
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO profiles (identity_key, doc, version, created_at, updated_at)
                    VALUES ($1, $2, 1, $3, $4)
                    ON CONFLICT (identity_key) DO NOTHING
                    "#,
                )
                .bind(&profile.identity_key)
                .bind(Json(profile))
                .bind(profile.created_at)
                .bind(profile.updated_at)
                .execute(&self.pool)
                .await?
            }
            Some(version) => {
                sqlx::query(
                    r#"
                    UPDATE profiles
                    SET doc = $2, version = version + 1, updated_at = $3
                    WHERE identity_key = $1 AND version = $4
                    "#,
                )
                .bind(&profile.identity_key)
                .bind(Json(profile))
                .bind(profile.updated_at)
                .bind(version)
                .execute(&self.pool)
                .await?
            }
        };

        if result.rows_affected() == 0 {
            debug!(
                "CAS write lost for '{}' (expected version {:?})",
                profile.identity_key, expected_version
            );
            return Err(StoreError::Conflict(profile.identity_key.clone()));
        }
        Ok(())
    }

    async fn list(&self, limit: i64) -> Result<Vec<Profile>, StoreError> {
        let rows: Vec<(Json<Profile>,)> =
            sqlx::query_as("SELECT doc FROM profiles ORDER BY updated_at DESC LIMIT $1")
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(|(doc,)| doc.0).collect())
    }
}

#[async_trait]
impl AnswerStore for PgStore {
    async fn upsert(
        &self,
        identity_key: &str,
        question: &str,
        answer: &str,
        category: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerEntry, StoreError> {
        // ON CONFLICT leaves `id` and `created_at` untouched, so first-creation
        // order survives overwrites.
        let entry: AnswerEntry = sqlx::query_as(
            r#"
            INSERT INTO answers (identity_key, question, answer, category, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (identity_key, question)
            DO UPDATE SET answer = EXCLUDED.answer,
                          category = EXCLUDED.category,
                          updated_at = EXCLUDED.updated_at
            RETURNING identity_key, question, answer, category, created_at, updated_at
            "#,
        )
        .bind(identity_key)
        .bind(question)
        .bind(answer)
        .bind(category)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn list(
        &self,
        identity_key: &str,
        category: Option<&str>,
    ) -> Result<Vec<AnswerEntry>, StoreError> {
        let entries = match category {
            Some(category) => {
                sqlx::query_as(
                    r#"
                    SELECT identity_key, question, answer, category, created_at, updated_at
                    FROM answers
                    WHERE identity_key = $1 AND LOWER(category) = LOWER($2)
                    ORDER BY id ASC
                    "#,
                )
                .bind(identity_key)
                .bind(category)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT identity_key, question, answer, category, created_at, updated_at
                    FROM answers
                    WHERE identity_key = $1
                    ORDER BY id ASC
                    "#,
                )
                .bind(identity_key)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(entries)
    }
}
