//! Error types for litgraph services
//!
//! Provides a comprehensive error handling system with:
//! - Distinct error types for different failure modes
//! - HTTP status code mapping
//! - Error codes for machine-readable identification
//! - HTML error responses (the service serves pages, not a JSON API)

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,

    // External service errors (8xxx)
    UpstreamError,
    ServiceFault,
    MalformedResponse,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ValidationError => 1001,

            ErrorCode::UpstreamError => 8001,
            ErrorCode::ServiceFault => 8002,
            ErrorCode::MalformedResponse => 8003,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    // External service errors
    #[error("Upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The upstream answered successfully but the body carries an
    /// explicit error field.
    #[error("Upstream service fault: {message}")]
    ServiceFault { message: String },

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::Transport(_) => ErrorCode::UpstreamError,
            AppError::Upstream { .. } => ErrorCode::UpstreamError,
            AppError::ServiceFault { .. } => ErrorCode::ServiceFault,
            AppError::MalformedResponse(_) => ErrorCode::MalformedResponse,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,

            // 502 Bad Gateway
            AppError::Transport(_)
            | AppError::Upstream { .. }
            | AppError::ServiceFault { .. }
            | AppError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %message,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = error_page(status, code, &message);
        (status, Html(body)).into_response()
    }
}

/// Minimal HTML error page shared by all failure responses
fn error_page(status: StatusCode, code: ErrorCode, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>litgraph error</title></head>\n\
         <body style=\"font-family: Helvetica, sans-serif;\">\n\
         <h1>Something went south</h1>\n\
         <p>{status} (code {code})</p>\n\
         <p>{message}</p>\n\
         <p><a href=\"/\">Back to search</a></p>\n\
         </body>\n</html>\n",
        status = status.as_u16(),
        code = code.as_code(),
        message = escape_html(message),
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}
