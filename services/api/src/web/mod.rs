pub mod auth;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

pub use middleware::require_auth;
pub use rest::ApiDoc;
pub use state::AppState;

use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use mood_journal_core::ports::PortError;
use std::sync::Arc;

/// Maps a port failure to the HTTP status reported to the client.
pub fn status_for(e: &PortError) -> StatusCode {
    match e {
        PortError::Validation(_) => StatusCode::BAD_REQUEST,
        PortError::Unauthorized => StatusCode::UNAUTHORIZED,
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::Conflict(_) => StatusCode::CONFLICT,
        PortError::Classification(_) => StatusCode::BAD_GATEWAY,
        PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Builds the API routes. CORS and Swagger UI are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/content", get(rest::content_handler))
        .route("/fact", get(rest::fact_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/entries",
            post(rest::submit_entry_handler)
                .get(rest::list_entries_handler)
                .delete(rest::reset_entries_handler),
        )
        .route("/entries/export", get(rest::export_entries_handler))
        .route("/dashboard", get(rest::dashboard_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
