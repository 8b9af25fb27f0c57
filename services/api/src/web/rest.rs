//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the journal REST endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::middleware::CurrentUser;
use crate::web::protocol::*;
use crate::web::state::AppState;
use crate::web::{auth, status_for};
use axum::{
    extract::{Extension, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Local;
use mood_journal_core::content;
use mood_journal_core::export::export_filename;
use mood_journal_core::ports::PortError;
use mood_journal_core::EntrySubmission;
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        submit_entry_handler,
        list_entries_handler,
        reset_entries_handler,
        export_entries_handler,
        dashboard_handler,
        content_handler,
        fact_handler,
    ),
    components(
        schemas(
            RegisterRequest, RegisterResponse, LoginRequest, LoginResponse,
            SubmitEntryRequest, SubmissionResponse, JournalEntryResponse, HistoryResponse,
            ResetResponse, DashboardResponse, InsightsResponse, CycleDayScoreResponse,
            TrendPointResponse, EmotionContentResponse, FactResponse
        )
    ),
    tags(
        (name = "Mood Journal API", description = "Cycle-aware mood journaling with emotion analysis.")
    )
)]
pub struct ApiDoc;

type HandlerError = (StatusCode, String);

fn failure(context: &str, e: PortError) -> HandlerError {
    error!("{}: {}", context, e);
    (status_for(&e), format!("{}: {}", context, e))
}

//=========================================================================================
// Journal Handlers
//=========================================================================================

/// Classify and save a new journal entry.
///
/// The entry is only stored if classification succeeds. The response carries the
/// saved entry, guidance for its emotion and cycle day, and the reloaded history.
#[utoipa::path(
    post,
    path = "/entries",
    request_body = SubmitEntryRequest,
    responses(
        (status = 201, description = "Entry classified and saved", body = SubmissionResponse),
        (status = 400, description = "Invalid summary or cycle day"),
        (status = 401, description = "Not logged in"),
        (status = 502, description = "Emotion classifier failed; nothing was saved"),
        (status = 500, description = "Failed to save entry")
    )
)]
pub async fn submit_entry_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
    Json(req): Json<SubmitEntryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let submission = EntrySubmission {
        timestamp: req.timestamp.unwrap_or_else(|| Local::now().naive_local()),
        cycle_day: req.cycle_day,
        summary: req.summary,
    };

    let outcome = state
        .journal
        .submit_entry(&username, submission)
        .await
        .map_err(|e| failure("Failed to save entry", e))?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(outcome))))
}

/// List the caller's journal history, newest first.
#[utoipa::path(
    get,
    path = "/entries",
    responses(
        (status = 200, description = "Journal history", body = HistoryResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_entries_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
) -> Result<Json<HistoryResponse>, HandlerError> {
    let snapshot = state
        .journal
        .load_history(&username)
        .await
        .map_err(|e| failure("Failed to load history", e))?;
    Ok(Json(HistoryResponse::from(&snapshot)))
}

/// Permanently delete all of the caller's journal entries.
#[utoipa::path(
    delete,
    path = "/entries",
    responses(
        (status = 200, description = "Entries deleted", body = ResetResponse),
        (status = 401, description = "Not logged in"),
        (status = 500, description = "Failed to delete entries")
    )
)]
pub async fn reset_entries_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
) -> Result<Json<ResetResponse>, HandlerError> {
    let (deleted, snapshot) = state
        .journal
        .reset_history(&username)
        .await
        .map_err(|e| failure("Error deleting entries", e))?;
    Ok(Json(ResetResponse {
        deleted,
        history: HistoryResponse::from(&snapshot).entries,
    }))
}

/// Download the caller's history as CSV.
#[utoipa::path(
    get,
    path = "/entries/export",
    responses(
        (status = 200, description = "CSV export", content_type = "text/csv", body = String),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn export_entries_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let csv = state
        .journal
        .export_csv(&username)
        .await
        .map_err(|e| failure("Failed to export history", e))?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(Local::now().date_naive())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// Streak, insights, cycle-day patterns, trend data and the fact of the day.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(username)): Extension<CurrentUser>,
) -> Result<Json<DashboardResponse>, HandlerError> {
    let dashboard = state
        .journal
        .dashboard(&username, Local::now().date_naive())
        .await
        .map_err(|e| failure("Failed to build dashboard", e))?;
    Ok(Json(DashboardResponse::from(dashboard)))
}

//=========================================================================================
// Public Content Handlers
//=========================================================================================

/// Guidance for an emotion label and cycle day.
#[utoipa::path(
    get,
    path = "/content",
    params(ContentQuery),
    responses(
        (status = 200, description = "Quote, tip, colour and cycle advice", body = EmotionContentResponse)
    )
)]
pub async fn content_handler(Query(q): Query<ContentQuery>) -> Json<EmotionContentResponse> {
    Json(content::content_for(&q.emotion, q.cycle_day).into())
}

/// Today's rotating fact.
#[utoipa::path(
    get,
    path = "/fact",
    responses(
        (status = 200, description = "Fact of the day", body = FactResponse)
    )
)]
pub async fn fact_handler() -> Json<FactResponse> {
    Json(FactResponse::from(content::fact_of_day(Local::now().date_naive())))
}
