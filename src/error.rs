use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A configuration error (missing or malformed encryption key).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An encrypted token that does not parse into `iv:ciphertext:tag`.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// A decryption failure: the authentication tag did not verify
    /// (wrong key, corrupted ciphertext, or tampering).
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// An encryption error.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// An I/O error from the envelope store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request carries no valid session.
    #[error("Authentication required")]
    Unauthorized,

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Configuration(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::MalformedToken(ref msg) => {
                tracing::error!("Malformed token: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve sensitive data".to_string())
            }

            AppError::DecryptionFailed(ref msg) => {
                tracing::error!("Decryption failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve sensitive data".to_string())
            }

            AppError::Encryption(ref msg) => {
                tracing::error!("Encryption error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Encryption error".to_string())
            }

            AppError::Io(ref e) => {
                tracing::error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }

            AppError::Json(ref e) => {
                tracing::error!("JSON error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Unauthorized => {
                tracing::warn!("Request without valid session");
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "success": false,
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"success":false,"error":"Internal server error"}"#.to_string());

        (status, body).into_response()
    }
}
