//! Endpoint handlers.

pub mod predict;
pub mod status;
