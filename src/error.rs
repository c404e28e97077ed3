//! Error types
//!
//! Nothing in the simulation is fatal. These errors surface at the edges
//! (silhouette measurement, tuning input) where callers pick a fallback.

use thiserror::Error;

/// Failure to measure the silhouette bounding box
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    #[error("viewbox must be positive and finite, got {width}x{height}")]
    InvalidViewbox { width: f32, height: f32 },

    #[error("silhouette path is empty")]
    EmptyPath,

    #[error("silhouette svg rejected: {0}")]
    Svg(String),

    #[error("silhouette has zero area ({width}x{height})")]
    Degenerate { width: f32, height: f32 },
}

/// Rejected tuning input
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tuning value `{field}` rejected: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
