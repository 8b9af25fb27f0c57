//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use mood_journal_core::domain::{
    CycleDay, Emotion, EmotionScores, JournalEntry, NewJournalEntry, NewUserAccount, UserAccount,
};
use mood_journal_core::ports::{DatabaseService, PortError, PortResult, RegistrationConflict};
use sqlx::{FromRow, PgPool};
use tracing::warn;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the tables if they are absent. Safe to run on every startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

const ENTRY_COLUMNS: &str = "id, user_id, entry_date, period_day, summary, emotion_label, \
     confidence_score, joy_score, sadness_score, anger_score, fear_score, surprise_score, \
     disgust_score, neutral_score";

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Names the field behind one of the `users` unique constraints.
fn conflict_for_constraint(constraint: &str) -> Option<RegistrationConflict> {
    match constraint {
        "users_username_key" => Some(RegistrationConflict::Username),
        "users_email_key" => Some(RegistrationConflict::Email),
        _ => None,
    }
}

/// Maps a unique-constraint violation on `users` to the field that collided.
fn registration_error(e: sqlx::Error) -> PortError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(conflict) = db_err.constraint().and_then(conflict_for_constraint) {
                return PortError::Conflict(conflict);
            }
        }
    }
    unexpected(e)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i32,
    username: String,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> UserAccount {
        UserAccount {
            id: self.id,
            username: self.username,
            email: self.email,
            display_name: self.name,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct JournalEntryRecord {
    id: i32,
    user_id: String,
    entry_date: NaiveDateTime,
    period_day: Option<i32>,
    summary: Option<String>,
    emotion_label: Option<String>,
    confidence_score: Option<f64>,
    joy_score: Option<f64>,
    sadness_score: Option<f64>,
    anger_score: Option<f64>,
    fear_score: Option<f64>,
    surprise_score: Option<f64>,
    disgust_score: Option<f64>,
    neutral_score: Option<f64>,
}
impl JournalEntryRecord {
    fn to_domain(self) -> JournalEntry {
        let dominant_emotion = match self.emotion_label.as_deref().and_then(Emotion::parse) {
            Some(emotion) => emotion,
            None => {
                warn!(entry_id = self.id, label = ?self.emotion_label, "Unrecognised emotion label, treating as neutral");
                Emotion::Neutral
            }
        };

        let per_emotion_scores: EmotionScores = [
            (Emotion::Joy, self.joy_score),
            (Emotion::Sadness, self.sadness_score),
            (Emotion::Anger, self.anger_score),
            (Emotion::Fear, self.fear_score),
            (Emotion::Surprise, self.surprise_score),
            (Emotion::Disgust, self.disgust_score),
            (Emotion::Neutral, self.neutral_score),
        ]
        .into_iter()
        .filter_map(|(emotion, score)| score.map(|s| (emotion, s)))
        .collect();

        JournalEntry {
            id: self.id,
            user_id: self.user_id,
            timestamp: self.entry_date,
            cycle_day: self.period_day.and_then(|d| CycleDay::new(d as i64)),
            summary_text: self.summary.unwrap_or_default(),
            dominant_emotion,
            dominant_confidence: self.confidence_score.unwrap_or_default(),
            per_emotion_scores,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn register_user(&self, user: NewUserAccount) -> PortResult<i32> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO users (username, email, name, password_hash) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(registration_error)?;
        tx.commit().await.map_err(unexpected)?;
        Ok(id)
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<UserAccount> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, email, name, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", username)),
            _ => unexpected(e),
        })?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        token: &str,
        username: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, username, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(username)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, token: &str) -> PortResult<String> {
        sqlx::query_scalar::<_, String>(
            "SELECT username FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::Unauthorized,
            _ => unexpected(e),
        })
    }

    async fn delete_auth_session(&self, token: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn insert_entry(&self, entry: NewJournalEntry) -> PortResult<JournalEntry> {
        let scores = &entry.per_emotion_scores;
        let sql = format!(
            "INSERT INTO journal_entries \
             (user_id, entry_date, period_day, summary, emotion_label, confidence_score, \
              joy_score, sadness_score, anger_score, fear_score, surprise_score, disgust_score, neutral_score) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {}",
            ENTRY_COLUMNS
        );

        // Dropping the transaction on error rolls it back.
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let record = sqlx::query_as::<_, JournalEntryRecord>(&sql)
            .bind(&entry.user_id)
            .bind(entry.timestamp)
            .bind(entry.cycle_day.get() as i32)
            .bind(&entry.summary_text)
            .bind(entry.dominant_emotion.as_str())
            .bind(entry.dominant_confidence)
            .bind(scores.get(Emotion::Joy))
            .bind(scores.get(Emotion::Sadness))
            .bind(scores.get(Emotion::Anger))
            .bind(scores.get(Emotion::Fear))
            .bind(scores.get(Emotion::Surprise))
            .bind(scores.get(Emotion::Disgust))
            .bind(scores.get(Emotion::Neutral))
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        Ok(record.to_domain())
    }

    async fn load_entries(&self, user_id: &str) -> PortResult<Vec<JournalEntry>> {
        let sql = format!(
            "SELECT {} FROM journal_entries WHERE user_id = $1 ORDER BY entry_date DESC",
            ENTRY_COLUMNS
        );
        let records = sqlx::query_as::<_, JournalEntryRecord>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        let entries = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(entries)
    }

    async fn delete_all_entries(&self, user_id: &str) -> PortResult<u64> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        let result = sqlx::query("DELETE FROM journal_entries WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_constraints_name_the_colliding_field() {
        assert_eq!(
            conflict_for_constraint("users_username_key"),
            Some(RegistrationConflict::Username)
        );
        assert_eq!(
            conflict_for_constraint("users_email_key"),
            Some(RegistrationConflict::Email)
        );
    }

    #[test]
    fn other_constraints_are_not_registration_conflicts() {
        assert_eq!(conflict_for_constraint("auth_sessions_pkey"), None);
        assert_eq!(conflict_for_constraint(""), None);
    }

    #[test]
    fn non_database_errors_are_unexpected() {
        assert!(matches!(
            registration_error(sqlx::Error::RowNotFound),
            PortError::Unexpected(_)
        ));
    }
}
