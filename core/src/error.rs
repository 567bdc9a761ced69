use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Required field '{role}' is not mapped to any column")]
    MissingMapping { role: String },

    // Named source_label, not source, so thiserror does not treat the
    // field as a wrapped error cause.
    #[error("Column '{column}' (mapped as {role}) not found in {source_label}")]
    ColumnNotFound {
        column: String,
        role: String,
        source_label: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
