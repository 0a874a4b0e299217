//! Error taxonomy for the scoring pipeline.
//!
//! All errors are raised synchronously at the boundary of the stage
//! that detects them; the core never retries or suppresses.

/// Anomaly pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum AnomalyError {
    /// A configured field name is absent from a record.
    #[error("missing field '{field}' on record for entity '{entity_id}' (row {row})")]
    MissingField {
        field: String,
        entity_id: String,
        row: usize,
    },

    /// A parameter is outside its valid range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// A pipeline stage was invoked before its prerequisite stage ran.
    #[error("precondition violated in stage '{stage}': {missing} has not run")]
    PreconditionViolation { stage: String, missing: String },

    /// Zero input records; downstream statistics are undefined.
    #[error("empty dataset: at least one record is required")]
    EmptyDataset,
}

impl AnomalyError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn precondition(stage: impl Into<String>, missing: impl Into<String>) -> Self {
        Self::PreconditionViolation {
            stage: stage.into(),
            missing: missing.into(),
        }
    }
}

/// Result alias used across the fraudscope crates.
pub type AnomalyResult<T> = Result<T, AnomalyError>;
