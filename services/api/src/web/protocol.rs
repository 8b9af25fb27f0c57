//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.
//! Each response type is a flat, serializable view of a core domain value.

use chrono::NaiveDateTime;
use mood_journal_core::analytics::{CycleDayScore, Insights};
use mood_journal_core::content::{DailyFact, EmotionContent};
use mood_journal_core::service::{Dashboard, SubmissionOutcome, TrendPoint};
use mood_journal_core::{HistorySnapshot, JournalEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Requests FROM the Client
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// A new journal entry. `timestamp` defaults to the server's local time.
#[derive(Deserialize, ToSchema)]
pub struct SubmitEntryRequest {
    pub timestamp: Option<NaiveDateTime>,
    pub cycle_day: i64,
    pub summary: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContentQuery {
    /// Emotion label, matched case-insensitively.
    pub emotion: String,
    pub cycle_day: i64,
}

//=========================================================================================
// Responses TO the Client
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub user_id: i32,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub username: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct JournalEntryResponse {
    pub id: i32,
    pub timestamp: NaiveDateTime,
    pub cycle_day: Option<u8>,
    pub summary: String,
    pub dominant_emotion: String,
    pub dominant_confidence: f64,
    pub scores: BTreeMap<String, f64>,
}

impl From<&JournalEntry> for JournalEntryResponse {
    fn from(e: &JournalEntry) -> Self {
        Self {
            id: e.id,
            timestamp: e.timestamp,
            cycle_day: e.cycle_day.map(|d| d.get()),
            summary: e.summary_text.clone(),
            dominant_emotion: e.dominant_emotion.to_string(),
            dominant_confidence: e.dominant_confidence,
            scores: e
                .per_emotion_scores
                .iter()
                .map(|(emotion, score)| (emotion.to_string(), score))
                .collect(),
        }
    }
}

fn history(snapshot: &HistorySnapshot) -> Vec<JournalEntryResponse> {
    snapshot.entries().iter().map(JournalEntryResponse::from).collect()
}

#[derive(Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Newest first.
    pub entries: Vec<JournalEntryResponse>,
}

impl From<&HistorySnapshot> for HistoryResponse {
    fn from(snapshot: &HistorySnapshot) -> Self {
        Self {
            entries: history(snapshot),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct EmotionContentResponse {
    pub quote: String,
    pub tip: String,
    pub color: String,
    pub emoji: String,
    pub cycle_advice: String,
}

impl From<EmotionContent> for EmotionContentResponse {
    fn from(c: EmotionContent) -> Self {
        Self {
            quote: c.quote.to_string(),
            tip: c.tip.to_string(),
            color: c.color.to_string(),
            emoji: c.emoji.to_string(),
            cycle_advice: c.cycle_advice.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct FactResponse {
    pub fact: String,
    pub icon: String,
    pub tip: String,
}

impl From<&DailyFact> for FactResponse {
    fn from(f: &DailyFact) -> Self {
        Self {
            fact: f.fact.to_string(),
            icon: f.icon.to_string(),
            tip: f.tip.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct SubmissionResponse {
    pub entry: JournalEntryResponse,
    pub content: EmotionContentResponse,
    pub history: Vec<JournalEntryResponse>,
}

impl From<SubmissionOutcome> for SubmissionResponse {
    fn from(o: SubmissionOutcome) -> Self {
        Self {
            entry: JournalEntryResponse::from(&o.entry),
            content: o.content.into(),
            history: history(&o.snapshot),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ResetResponse {
    pub deleted: u64,
    pub history: Vec<JournalEntryResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct InsightsResponse {
    pub most_common_emotion: String,
    pub best_cycle_day: Option<u8>,
    pub total_entries: usize,
}

impl From<&Insights> for InsightsResponse {
    fn from(i: &Insights) -> Self {
        Self {
            most_common_emotion: i.most_common_emotion.to_string(),
            best_cycle_day: i.best_cycle_day.map(|d| d.get()),
            total_entries: i.total_entries,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct CycleDayScoreResponse {
    pub cycle_day: u8,
    pub emotion: String,
    pub mean_score: f64,
}

impl From<&CycleDayScore> for CycleDayScoreResponse {
    fn from(s: &CycleDayScore) -> Self {
        Self {
            cycle_day: s.cycle_day.get(),
            emotion: s.emotion.to_string(),
            mean_score: s.mean_score,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TrendPointResponse {
    pub timestamp: NaiveDateTime,
    pub emotion: String,
    pub confidence: f64,
}

impl From<&TrendPoint> for TrendPointResponse {
    fn from(p: &TrendPoint) -> Self {
        Self {
            timestamp: p.timestamp,
            emotion: p.emotion.to_string(),
            confidence: p.confidence,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub streak: u32,
    pub insights: Option<InsightsResponse>,
    pub most_common_emotion_content: Option<EmotionContentResponse>,
    /// Null until at least two scored entries exist.
    pub cycle_day_patterns: Option<Vec<CycleDayScoreResponse>>,
    pub fact_of_day: FactResponse,
    /// Oldest first.
    pub trend: Vec<TrendPointResponse>,
    pub entries: Vec<JournalEntryResponse>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(d: Dashboard) -> Self {
        Self {
            streak: d.streak,
            insights: d.insights.as_ref().map(InsightsResponse::from),
            most_common_emotion_content: d.most_common_emotion_content.map(Into::into),
            cycle_day_patterns: d
                .cycle_day_patterns
                .map(|t| t.rows.iter().map(CycleDayScoreResponse::from).collect()),
            fact_of_day: FactResponse::from(d.fact_of_day),
            trend: d.trend.iter().map(TrendPointResponse::from).collect(),
            entries: history(&d.history),
        }
    }
}
