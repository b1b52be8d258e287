use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;

use crate::{
    error::Result,
    models::session::Session,
    services::sensitive_data as vault_service,
    state::AppState,
    validation::sensitive_data::{parse_partial, parse_record},
};

/// The success half of the response envelope; error responses are shaped
/// by [`crate::error::AppError`].
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse<()> {
    /// A success envelope carrying only a confirmation message.
    fn message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// A success envelope carrying data.
    fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }
}

/// Handles `GET /api/sensitive-data`: load and decrypt the caller's record.
///
/// A user with nothing stored gets an empty object, not an error.
#[axum::debug_handler]
pub async fn get_sensitive_data(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    tracing::debug!("📖 Loading sensitive data for user: {}", session.user_id);

    let record = vault_service::load_record(&*state.store, &state.cipher, &session.user_id)?;

    let response = ApiResponse::data(record.unwrap_or_default());
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles `POST /api/sensitive-data`: validate and store a full record.
#[axum::debug_handler]
pub async fn save_sensitive_data(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    tracing::info!("💾 Saving sensitive data for user: {}", session.user_id);

    let record = parse_record(body)?;
    vault_service::save_record(&*state.store, &state.cipher, &session, &record)?;

    tracing::info!("✅ Sensitive data saved for user: {}", session.user_id);

    let response = ApiResponse::message("Sensitive data saved successfully");
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Handles `PATCH /api/sensitive-data`: shallow-merge a partial update
/// over the stored record.
#[axum::debug_handler]
pub async fn update_sensitive_data(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response> {
    tracing::info!("📝 Updating sensitive data for user: {}", session.user_id);

    let partial = parse_partial(body)?;
    vault_service::update_record(&*state.store, &state.cipher, &session, partial)?;

    tracing::info!("✅ Sensitive data updated for user: {}", session.user_id);

    let response = ApiResponse::message("Sensitive data updated successfully");
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles `DELETE /api/sensitive-data`: clear the encrypted payload while
/// keeping the profile envelope.
#[axum::debug_handler]
pub async fn delete_sensitive_data(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    tracing::info!("🗑️ Deleting sensitive data for user: {}", session.user_id);

    vault_service::delete_record(&*state.store, &session.user_id)?;

    tracing::info!("✅ Sensitive data deleted for user: {}", session.user_id);

    let response = ApiResponse::message("Sensitive data deleted successfully");
    Ok((StatusCode::OK, Json(response)).into_response())
}
