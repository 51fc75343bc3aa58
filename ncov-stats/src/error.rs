use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("api returns invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("api does not report success")]
    ApiReportedFailure,
    #[error("api returns empty results")]
    EmptyResults,
    #[error("field `{field}` not found")]
    MissingField { field: String },
    #[error("field `{field}` holds an unusable value: {value}")]
    InvalidField {
        field: String,
        value: serde_json::Value,
    },
}

impl RecordError {
    /// Name of the offending field, if the error concerns one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingField { field } | Self::InvalidField { field, .. } => Some(field),
            _ => None,
        }
    }
}
