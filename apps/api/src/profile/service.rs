//! The engine's write path. `merge_profile` and `record_source` are the only
//! places a profile is ever written, and both go through a bounded
//! optimistic-retry loop over the store's compare-and-swap `put`: read, merge
//! against the snapshot, attempt the conditional write, and on conflict start
//! over from a fresh read. Merge-logic failures are deterministic and never
//! retried; only lost CAS races are.

use chrono::Utc;
use tracing::{debug, info};

use crate::errors::EngineError;
use crate::models::profile::{CandidateProfile, Profile};
use crate::profile::identity;
use crate::profile::merge;
use crate::store::{ProfileStore, StoreError};

/// How many conflicting writes to absorb before giving up. Each lost race
/// means another writer for the same identity committed, so under finite
/// contention this bound is only hit when the store itself is misbehaving.
const MAX_UPSERT_ATTEMPTS: usize = 8;

/// Resolves the candidate to its canonical profile and merges it in,
/// creating the profile on first sight of the identity.
pub async fn merge_profile(
    store: &dyn ProfileStore,
    candidate: &CandidateProfile,
) -> Result<Profile, EngineError> {
    let key = identity::normalize(candidate.email.as_deref().unwrap_or_default())?;

    for attempt in 1..=MAX_UPSERT_ATTEMPTS {
        match store.find_by_identity(&key).await? {
            Some(stored) => {
                let mut profile = stored.profile;
                if !merge::merge_candidate(&mut profile, candidate) {
                    // Identical record: no write, updated_at stays put.
                    debug!("Merge for '{key}' is a no-op");
                    return Ok(profile);
                }
                profile.updated_at = Utc::now();
                match store.put(&profile, Some(stored.version)).await {
                    Ok(()) => {
                        info!("Merged candidate into profile '{key}'");
                        return Ok(profile);
                    }
                    Err(StoreError::Conflict(_)) => {
                        debug!("Merge for '{key}' lost attempt {attempt}, re-reading");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            None => {
                let mut profile = Profile::new(key.clone(), Utc::now());
                merge::merge_candidate(&mut profile, candidate);
                match store.put(&profile, None).await {
                    Ok(()) => {
                        info!("Created profile '{key}'");
                        return Ok(profile);
                    }
                    Err(StoreError::Conflict(_)) => {
                        // Another writer created the profile first; merge into
                        // theirs instead.
                        debug!("Lost create race for '{key}', re-reading");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    }

    Err(EngineError::Store(StoreError::Unavailable(format!(
        "gave up on '{key}' after {MAX_UPSERT_ATTEMPTS} conflicting writes"
    ))))
}

/// Looks up the profile for a raw identity, normalizing it first.
pub async fn get_profile(
    store: &dyn ProfileStore,
    raw_identity: &str,
) -> Result<Option<Profile>, EngineError> {
    let key = identity::normalize(raw_identity)?;
    Ok(store.find_by_identity(&key).await?.map(|s| s.profile))
}

/// Records that a source document contributed to a profile. Idempotent: an
/// already-present source id leaves the profile untouched, including under
/// concurrent duplicate submissions (both writers see the same set-add).
pub async fn record_source(
    store: &dyn ProfileStore,
    raw_identity: &str,
    source_id: &str,
) -> Result<Profile, EngineError> {
    let key = identity::normalize(raw_identity)?;

    for attempt in 1..=MAX_UPSERT_ATTEMPTS {
        let stored = store
            .find_by_identity(&key)
            .await?
            .ok_or_else(|| EngineError::UnknownIdentity(key.clone()))?;

        let mut profile = stored.profile;
        if !merge::add_source(&mut profile, source_id) {
            return Ok(profile);
        }
        profile.updated_at = Utc::now();
        match store.put(&profile, Some(stored.version)).await {
            Ok(()) => {
                info!("Recorded source '{source_id}' for '{key}'");
                return Ok(profile);
            }
            Err(StoreError::Conflict(_)) => {
                debug!("Source record for '{key}' lost attempt {attempt}, re-reading");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(EngineError::Store(StoreError::Unavailable(format!(
        "gave up on '{key}' after {MAX_UPSERT_ATTEMPTS} conflicting writes"
    ))))
}
