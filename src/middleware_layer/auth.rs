use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::{
    error::AppError,
    state::AppState,
};

/// Extracts the session token from the request cookies.
///
/// # Arguments
///
/// * `cookies` - The request cookies.
///
/// # Returns
///
/// An `Option` containing the session ID if found.
fn extract_session_token(cookies: &Cookies) -> Option<Uuid> {
    cookies
        .get("session_id")
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

/// A middleware that requires a valid session to be present.
///
/// The resolved [`crate::models::session::Session`] is attached to the
/// request as an extension; unauthenticated requests get a 401.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let session_id = extract_session_token(&cookies).ok_or_else(|| {
        tracing::warn!("❌ No session_id cookie found");
        AppError::Unauthorized
    })?;

    tracing::debug!("🔑 Found session_id: {}", session_id);

    let session = state.sessions.resolve(&session_id).ok_or_else(|| {
        tracing::warn!("❌ Unknown session: {}", session_id);
        AppError::Unauthorized
    })?;

    if session.is_expired() {
        tracing::warn!("❌ Session expired for user: {}", session.user_id);
        state.sessions.revoke(&session_id);
        return Err(AppError::Unauthorized);
    }

    tracing::debug!("✅ User authenticated: {}", session.user_id);

    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
