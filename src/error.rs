use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the sync API.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Errors from the backing key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors talking to the sync API from the client side.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("communication failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("bad response from server: {0}")]
    BadResponse(String),

    #[error("{0}")]
    NotFound(String),

    #[error("invalid server url {0}")]
    InvalidUrl(String),

    #[error("server returned {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// Errors on the device side: cache files, imports and user input.
#[derive(Debug, Error)]
pub enum LocalError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("not a timetable: {0}")]
    NotATimetable(String),

    #[error("{0}")]
    InvalidCourse(String),

    #[error("{0}")]
    InvalidCoordinate(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Store(e) => {
                error!("store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", e))
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message,
        });

        (status, body).into_response()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}
