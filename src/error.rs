//! Error type shared by every planner stage.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors raised while planning.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("invalid coordinate ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("no locations left after filtering")]
    NoLocationsAfterFilter,

    #[error("clustering unavailable: {0}")]
    ClusteringUnavailable(String),

    #[error("requested {requested} home bases but only {available} are available")]
    InsufficientCandidateBases { requested: usize, available: usize },

    #[error("unknown home base: {0}")]
    BaseNotFound(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no team count produced a feasible configuration")]
    NoFeasibleCandidate,

    #[error("fleet-size search was cancelled")]
    Cancelled,

    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}
