//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use mood_journal_core::ports::PortError;
use std::sync::Arc;
use tracing::{error, warn};

use crate::web::state::AppState;
use crate::web::status_for;

/// The username of the logged-in caller, inserted into request extensions.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub String);

/// Reads the `session` cookie value from the request headers.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
        .filter(|token| !token.is_empty())
}

/// Middleware that validates the auth session cookie and extracts the username.
///
/// If valid, inserts a `CurrentUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized. A store failure is a 500.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract the session token from the cookie
    let token = session_token(req.headers()).ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Validate auth session in database, get the username
    let username = state
        .db
        .validate_auth_session(token)
        .await
        .map_err(|e| match e {
            PortError::Unexpected(_) => {
                error!("Failed to validate auth session: {:?}", e);
                status_for(&e)
            }
            _ => {
                warn!("Rejected auth session: {:?}", e);
                StatusCode::UNAUTHORIZED
            }
        })?;

    // 3. Insert the user into request extensions
    req.extensions_mut().insert(CurrentUser(username));

    // 4. Continue to the handler
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        h
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let h = headers("theme=dark; session=abc-123; lang=en");
        assert_eq!(session_token(&h), Some("abc-123"));
    }

    #[test]
    fn missing_or_empty_session_is_none() {
        assert_eq!(session_token(&HeaderMap::new()), None);
        assert_eq!(session_token(&headers("theme=dark")), None);
        assert_eq!(session_token(&headers("session=")), None);
    }
}
