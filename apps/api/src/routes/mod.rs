pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::answers::handlers as answer_handlers;
use crate::ingest::handlers as ingest_handlers;
use crate::profile::handlers as profile_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Document ingest (upload → extraction → merge)
        .route(
            "/api/v1/documents",
            post(ingest_handlers::handle_upload_document),
        )
        // Profile API
        .route(
            "/api/v1/profiles",
            get(profile_handlers::handle_list_profiles),
        )
        .route(
            "/api/v1/profiles/merge",
            post(profile_handlers::handle_merge_profile),
        )
        .route(
            "/api/v1/profiles/:email",
            get(profile_handlers::handle_get_profile),
        )
        .route(
            "/api/v1/profiles/:email/sources",
            post(profile_handlers::handle_record_source),
        )
        // Answer API
        .route(
            "/api/v1/profiles/:email/answers",
            post(answer_handlers::handle_upsert_answer)
                .get(answer_handlers::handle_list_answers),
        )
        .with_state(state)
}
