//! Error types for the ranking pipeline.
//!
//! Every variant is fatal to a pipeline run. Players missing from the
//! metadata table are not an error: they are dropped with a warning.

/// Failures raised while loading inputs or computing a ranking.
#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("empty input: {what}")]
    EmptyInput { what: String },

    #[error("degenerate prior fit: {reason}")]
    DegeneratePriorFit { reason: String },

    #[error("player {nfl_id} has no value for {column}")]
    MissingFlag { nfl_id: u64, column: &'static str },

    #[error("invalid value {value:?} in column {column}")]
    InvalidFlag { column: &'static str, value: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RankingError {
    pub(crate) fn empty(what: impl Into<String>) -> Self {
        RankingError::EmptyInput { what: what.into() }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        RankingError::DegeneratePriorFit {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RankingError>;
