//! Error taxonomy for link operations
//!
//! Every failure a caller can see is one of these variants. User-input
//! problems map to 4xx responses; only `Persistence` signals that the
//! durable write itself failed.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

pub type Result<T> = std::result::Result<T, LinkError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    InvalidTarget(String),
    InvalidCode(String),
    CodeConflict(String),
    NotFound(String),
    /// Random allocation gave up after this many colliding attempts
    CodeSpaceExhausted(usize),
    Persistence(String),
}

impl LinkError {
    pub fn missing_target() -> Self {
        LinkError::InvalidTarget("Missing target URL".to_string())
    }

    pub fn invalid_target() -> Self {
        LinkError::InvalidTarget("Invalid URL (must include http/https)".to_string())
    }

    /// Request body that could not be read as a create payload
    pub fn invalid_body<T: Into<String>>(detail: T) -> Self {
        LinkError::InvalidTarget(format!("Invalid request body: {}", detail.into()))
    }

    pub fn invalid_code() -> Self {
        LinkError::InvalidCode("Custom code invalid. Must match [A-Za-z0-9]{6,8}".to_string())
    }

    pub fn reserved_code(code: &str) -> Self {
        LinkError::InvalidCode(format!("Code '{}' is reserved", code))
    }

    pub fn conflict() -> Self {
        LinkError::CodeConflict("Code already exists".to_string())
    }

    pub fn not_found() -> Self {
        LinkError::NotFound("Not found".to_string())
    }

    pub fn persistence<T: Into<String>>(msg: T) -> Self {
        LinkError::Persistence(msg.into())
    }

    /// HTTP status used when this error reaches a client
    pub fn status(&self) -> StatusCode {
        match self {
            LinkError::InvalidTarget(_) | LinkError::InvalidCode(_) => StatusCode::BAD_REQUEST,
            LinkError::CodeConflict(_) => StatusCode::CONFLICT,
            LinkError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkError::CodeSpaceExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            LinkError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::InvalidTarget(msg)
            | LinkError::InvalidCode(msg)
            | LinkError::CodeConflict(msg)
            | LinkError::NotFound(msg) => write!(f, "{}", msg),
            LinkError::CodeSpaceExhausted(attempts) => write!(
                f,
                "Could not allocate a unique code after {} attempts",
                attempts
            ),
            LinkError::Persistence(msg) => write!(f, "Failed to persist links: {}", msg),
        }
    }
}

impl std::error::Error for LinkError {}

impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        LinkError::Persistence(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for LinkError {
    fn from(err: serde_json::Error) -> Self {
        LinkError::Persistence(format!("serialization error: {}", err))
    }
}

impl From<redb::Error> for LinkError {
    fn from(err: redb::Error) -> Self {
        LinkError::Persistence(format!("database error: {}", err))
    }
}

impl IntoResponse for LinkError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(json!({
                "ok": false,
                "error": self.to_string()
            })),
        )
            .into_response()
    }
}
