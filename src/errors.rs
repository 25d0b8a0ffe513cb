use axum::http::StatusCode;
use thiserror::Error;

/// Validation failures when decoding records from the stats API wire format.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("tier {0} is outside 1..=7")]
    InvalidTier(u8),
    #[error("map {map}: {names} mapper names but {ids} mapper ids")]
    MapperMismatch { map: String, names: usize, ids: usize },
    #[error("unknown run type {0:?}, expected \"pro\" or \"tp\"")]
    UnknownRunType(String),
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
