use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use crate::config::Config;
use crate::extractor::ExtractionClient;
use crate::store::postgres::PgStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The profile/answer store. All profile writes go through its
    /// compare-and-swap contract; handlers never touch the pool directly.
    pub store: Arc<PgStore>,
    pub s3: S3Client,
    pub extractor: ExtractionClient,
    pub config: Config,
}
