//! In-memory store used by engine tests. Implements the same compare-and-swap
//! contract as the PostgreSQL store, so the upsert retry loop can be exercised
//! under real task interleavings.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::answer::AnswerEntry;
use crate::models::profile::Profile;
use crate::store::{AnswerStore, ProfileStore, StoreError, StoredProfile};

#[derive(Default)]
pub struct MemoryStore {
    profiles: Mutex<HashMap<String, (Profile, i64)>>,
    answers: Mutex<Vec<AnswerEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_by_identity(&self, key: &str) -> Result<Option<StoredProfile>, StoreError> {
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.get(key).map(|(profile, version)| StoredProfile {
            profile: profile.clone(),
            version: *version,
        }))
    }

    async fn put(
        &self,
        profile: &Profile,
        expected_version: Option<i64>,
    ) -> Result<(), StoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        match (profiles.get(&profile.identity_key), expected_version) {
            (None, None) => {
                profiles.insert(profile.identity_key.clone(), (profile.clone(), 1));
                Ok(())
            }
            (Some((_, current)), Some(expected)) if *current == expected => {
                profiles.insert(
                    profile.identity_key.clone(),
                    (profile.clone(), expected + 1),
                );
                Ok(())
            }
            _ => Err(StoreError::Conflict(profile.identity_key.clone())),
        }
    }

    async fn list(&self, limit: i64) -> Result<Vec<Profile>, StoreError> {
        let profiles = self.profiles.lock().unwrap();
        let mut all: Vec<Profile> = profiles.values().map(|(p, _)| p.clone()).collect();
        all.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        all.truncate(limit.max(0) as usize);
        Ok(all)
    }
}

#[async_trait]
impl AnswerStore for MemoryStore {
    async fn upsert(
        &self,
        identity_key: &str,
        question: &str,
        answer: &str,
        category: &str,
        now: DateTime<Utc>,
    ) -> Result<AnswerEntry, StoreError> {
        let mut answers = self.answers.lock().unwrap();
        if let Some(entry) = answers
            .iter_mut()
            .find(|e| e.identity_key == identity_key && e.question == question)
        {
            entry.answer = answer.to_string();
            entry.category = category.to_string();
            entry.updated_at = now;
            return Ok(entry.clone());
        }

        let entry = AnswerEntry {
            identity_key: identity_key.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            category: category.to_string(),
            created_at: now,
            updated_at: now,
        };
        answers.push(entry.clone());
        Ok(entry)
    }

    async fn list(
        &self,
        identity_key: &str,
        category: Option<&str>,
    ) -> Result<Vec<AnswerEntry>, StoreError> {
        let answers = self.answers.lock().unwrap();
        Ok(answers
            .iter()
            .filter(|e| e.identity_key == identity_key)
            .filter(|e| match category {
                Some(c) => e.category.eq_ignore_ascii_case(c),
                None => true,
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_conflicts_on_existing_key() {
        let store = MemoryStore::new();
        let profile = Profile::new("a@b.com".into(), Utc::now());
        store.put(&profile, None).await.unwrap();
        assert!(matches!(
            store.put(&profile, None).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_update_conflicts_on_stale_version() {
        let store = MemoryStore::new();
        let profile = Profile::new("a@b.com".into(), Utc::now());
        store.put(&profile, None).await.unwrap();
        store.put(&profile, Some(1)).await.unwrap();
        // A writer still holding version 1 must lose.
        assert!(matches!(
            store.put(&profile, Some(1)).await,
            Err(StoreError::Conflict(_))
        ));
        store.put(&profile, Some(2)).await.unwrap();
    }
}
