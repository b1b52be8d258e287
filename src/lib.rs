//! Encrypted personal-data vault.
//!
//! Authenticated users store, read, partially update, and delete a bundle
//! of sensitive personal information. Payloads are AES-256-GCM encrypted
//! under a process-wide key and persisted one envelope per user.

use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use http::{header, Method};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod error;
pub mod state;

pub mod crypto {
    pub mod cipher;
    pub mod password;
}

pub mod models {
    pub mod envelope;
    pub mod record;
    pub mod session;
}

pub mod repositories {
    pub mod envelope;
}

pub mod services {
    pub mod sensitive_data;
}

pub mod handlers {
    pub mod sensitive_data;
}

pub mod middleware_layer {
    pub mod auth;
}

pub mod validation {
    pub mod sensitive_data;
}

use state::AppState;

/// Builds the application router.
///
/// All four verbs live on one route behind the session middleware.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse().unwrap(),
            "http://127.0.0.1:3000".parse().unwrap(),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let sensitive_data_routes = Router::new()
        .route(
            "/api/sensitive-data",
            get(handlers::sensitive_data::get_sensitive_data)
                .post(handlers::sensitive_data::save_sensitive_data)
                .patch(handlers::sensitive_data::update_sensitive_data)
                .delete(handlers::sensitive_data::delete_sensitive_data),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware_layer::auth::require_auth,
        ))
        .with_state(state);

    Router::new()
        .merge(sensitive_data_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
}
