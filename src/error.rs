use std::{io, path::PathBuf};

use ncov_stats::{RecordError, TimezoneError};
use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    NetworkError,
    BadStatus,
    InvalidJson,
    ApiReportedFailure,
    EmptyResults,
    MissingField,
    InvalidField,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("fetch data error with wrong status code = {0}")]
    BadStatus(StatusCode),
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Network(_) => FetchErrorKind::NetworkError,
            Self::BadStatus(_) => FetchErrorKind::BadStatus,
            Self::Record(err) => match err {
                RecordError::InvalidJson(_) => FetchErrorKind::InvalidJson,
                RecordError::ApiReportedFailure => FetchErrorKind::ApiReportedFailure,
                RecordError::EmptyResults => FetchErrorKind::EmptyResults,
                RecordError::MissingField { .. } => FetchErrorKind::MissingField,
                RecordError::InvalidField { .. } => FetchErrorKind::InvalidField,
            },
        }
    }

    /// Name of the offending response field, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Record(err) => err.field(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Timezone(#[from] TimezoneError),
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_errors_map_to_kinds() {
        let missing = FetchError::from(RecordError::MissingField {
            field: "deadCount".into(),
        });
        assert_eq!(missing.kind(), FetchErrorKind::MissingField);
        assert_eq!(missing.field(), Some("deadCount"));
        assert_eq!(missing.to_string(), "field `deadCount` not found");

        let empty = FetchError::from(RecordError::EmptyResults);
        assert_eq!(empty.kind(), FetchErrorKind::EmptyResults);
        assert_eq!(empty.field(), None);
    }

    #[test]
    fn bad_status_display() {
        let err = FetchError::BadStatus(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.kind(), FetchErrorKind::BadStatus);
        assert_eq!(
            err.to_string(),
            "fetch data error with wrong status code = 503 Service Unavailable"
        );
    }

    #[test]
    fn io_error_names_path() {
        let err = Error::Io {
            path: "public/2019-n-Cov-ical.ics".into(),
            source: io::Error::other("disk full"),
        };
        assert_eq!(
            err.to_string(),
            "failed to write public/2019-n-Cov-ical.ics: disk full"
        );
    }
}
