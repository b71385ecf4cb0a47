//! Document ingest pipeline: PDF upload → text extraction → AI extraction →
//! candidate coercion → profile merge.
//!
//! The blob is stored first and kept even when extraction or the merge fails;
//! in that case the response carries a warning instead of a profile. The S3
//! key of the stored document doubles as the profile's provenance source id.

pub mod handlers;

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, EngineError};
use crate::extractor::prompts::{RESUME_EXTRACT_PROMPT, RESUME_EXTRACT_SYSTEM};
use crate::models::profile::{CandidateProfile, Profile};
use crate::profile::service;
use crate::state::AppState;

/// Extraction input is capped; anything past this is boilerplate in practice.
const MAX_EXTRACT_CHARS: usize = 20_000;

#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub document_id: Uuid,
    pub s3_key: String,
    pub identity_key: Option<String>,
    pub profile: Option<Profile>,
    pub warning: Option<String>,
}

pub async fn ingest_document(
    state: &AppState,
    filename: &str,
    data: Bytes,
) -> Result<IngestResponse, AppError> {
    let document_id = Uuid::new_v4();
    let s3_key = format!("documents/{}/{}", document_id, sanitize_filename(filename));

    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(data.clone()))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of '{s3_key}' failed: {e}")))?;
    info!("Stored document {document_id} at s3://{}/{s3_key}", state.config.s3_bucket);

    // pdf-extract is CPU-bound; keep it off the async workers.
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task panicked: {e}")))?
        .map_err(|e| AppError::Validation(format!("could not read PDF text: {e}")))?;

    if text.trim().is_empty() {
        return Ok(IngestResponse {
            document_id,
            s3_key,
            identity_key: None,
            profile: None,
            warning: Some("document contains no extractable text".to_string()),
        });
    }

    let prompt = RESUME_EXTRACT_PROMPT.replace("{resume_text}", truncated(&text));
    let extracted: serde_json::Value = state
        .extractor
        .call_json(&prompt, RESUME_EXTRACT_SYSTEM)
        .await
        .map_err(|e| AppError::Extraction(format!("resume extraction failed: {e}")))?;

    let candidate = candidate_from_extraction(extracted, &s3_key)?;

    match service::merge_profile(state.store.as_ref(), &candidate).await {
        Ok(profile) => Ok(IngestResponse {
            document_id,
            s3_key,
            identity_key: Some(profile.identity_key.clone()),
            profile: Some(profile),
            warning: None,
        }),
        // The document stays stored; only the merge is skipped.
        Err(EngineError::InvalidIdentity(msg)) => {
            warn!("Document {document_id} has no usable identity: {msg}");
            Ok(IngestResponse {
                document_id,
                s3_key,
                identity_key: None,
                profile: None,
                warning: Some(format!("extracted record has no usable email: {msg}")),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Coerces the extractor's loose JSON into a typed candidate and attaches the
/// stored document as its provenance source.
pub fn candidate_from_extraction(
    value: serde_json::Value,
    source_id: &str,
) -> Result<CandidateProfile, AppError> {
    let mut candidate: CandidateProfile = serde_json::from_value(value)
        .map_err(|e| AppError::Extraction(format!("unusable extraction output: {e}")))?;
    candidate.source_id = Some(source_id.to_string());
    Ok(candidate)
}

fn truncated(text: &str) -> &str {
    match text.char_indices().nth(MAX_EXTRACT_CHARS) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "document.pdf".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coercion_attaches_source_id() {
        let value = json!({"email": "a@b.com", "skills": ["Rust"]});
        let candidate = candidate_from_extraction(value, "documents/1/cv.pdf").unwrap();
        assert_eq!(candidate.source_id.as_deref(), Some("documents/1/cv.pdf"));
        assert_eq!(candidate.skills, vec!["Rust"]);
    }

    #[test]
    fn test_coercion_tolerates_nulls_and_extras() {
        let value = json!({
            "email": null,
            "skills": null,
            "languages": ["French (B2)"],
            "publications": [{"title": "ignored"}]
        });
        let candidate = candidate_from_extraction(value, "k").unwrap();
        assert_eq!(candidate.email, None);
        assert!(candidate.skills.is_empty());
        assert_eq!(candidate.languages[0].name, "French");
    }

    #[test]
    fn test_coercion_rejects_non_object_output() {
        let result = candidate_from_extraction(json!("not an object"), "k");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("My Résumé (v2).pdf"), "My_R_sum___v2_.pdf");
        assert_eq!(sanitize_filename("  "), "document.pdf");
        assert_eq!(sanitize_filename("cv.pdf"), "cv.pdf");
    }

    #[test]
    fn test_truncated_respects_char_boundaries() {
        let text = "é".repeat(MAX_EXTRACT_CHARS + 10);
        let cut = truncated(&text);
        assert_eq!(cut.chars().count(), MAX_EXTRACT_CHARS);
    }
}
