pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::handlers as analysis;
use crate::recruiter::handlers as recruiter;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Resume uploads larger than this are rejected.
const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Request headers the browser client library sends with every call.
const ALLOWED_REQUEST_HEADERS: [&str; 8] = [
    "authorization",
    "x-client-info",
    "apikey",
    "content-type",
    "x-supabase-client-platform",
    "x-supabase-client-platform-version",
    "x-supabase-client-runtime",
    "x-supabase-client-runtime-version",
];

/// Any origin, explicit header allow-list. Preflights get an empty 200.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_REQUEST_HEADERS.map(HeaderName::from_static))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring endpoint
        .route(
            "/api/v1/analyze-resume",
            post(analysis::handle_analyze_resume).options(analysis::handle_preflight),
        )
        // Resume upload
        .route(
            "/api/v1/resumes/extract",
            post(resumes::handle_extract).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // Recruiter API
        .route("/api/v1/recruiter/score", post(recruiter::handle_score_batch))
        .route("/api/v1/recruiter/rank", post(recruiter::handle_rank))
        .route("/api/v1/recruiter/export", post(recruiter::handle_export))
        .layer(cors_layer())
        .with_state(state)
}
