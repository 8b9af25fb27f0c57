//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, and logout.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use mood_journal_core::accounts::{self, RegistrationRequest};
use mood_journal_core::ports::PortError;
use std::sync::Arc;
use tracing::{error, info};

use crate::web::middleware::session_token;
use crate::web::protocol::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::web::state::AppState;
use crate::web::status_for;

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created successfully", body = RegisterResponse),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "Username or email already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let request = RegistrationRequest {
        username: req.username,
        email: req.email,
        name: req.name,
        password: req.password,
    };

    let user_id = accounts::register(state.db.as_ref(), state.credentials.as_ref(), request)
        .await
        .map_err(|e| {
            error!("Registration failed: {}", e);
            (status_for(&e), format!("Registration failed: {}", e))
        })?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Verify credentials and open a session
    let session = state
        .credentials
        .verify_credentials(req.username.trim(), &req.password)
        .await
        .map_err(|e| {
            error!("Login failed: {:?}", e);
            if matches!(e, PortError::Unauthorized) {
                (StatusCode::UNAUTHORIZED, "Username/password is incorrect".to_string())
            } else {
                (status_for(&e), "Failed to create session".to_string())
            }
        })?;
    info!(username = %session.username, "User logged in");

    // 2. Create session cookie
    let max_age = (session.expires_at - chrono::Utc::now()).num_seconds().max(0);
    let cookie = format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        session.token, max_age
    );

    // 3. Return response with cookie
    let response = LoginResponse {
        username: session.username,
        expires_at: session.expires_at,
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful; the session cookie is cleared"),
        (status = 500, description = "Failed to delete the session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Delete the auth session, if the request carries one
    if let Some(token) = session_token(&headers) {
        state.credentials.end_session(token).await.map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout".to_string())
        })?;
    }

    // 2. Clear cookie
    let cookie = "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0";

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie.to_string())]))
}
