//! HTTP API: JSON prediction endpoint.
//!
//! `POST /predict` runs the symptom checker, `GET /` reports liveness.
//! All shared state is immutable, so handlers run the pipeline directly.

pub mod endpoints;
pub mod error;
pub mod router;

pub use error::ApiError;
pub use router::{api_router, MAX_BODY_BYTES};
