//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::application::SymptomChecker;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the API router over a shared checker.
pub fn api_router(checker: Arc<SymptomChecker>) -> Router {
    Router::new()
        .route("/", get(endpoints::status::root))
        .route("/predict", post(endpoints::predict::predict))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(checker)
}
