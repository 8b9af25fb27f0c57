//! crates/mood_journal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the database, the emotion model and the credential store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::domain::{AuthSession, JournalEntry, NewJournalEntry, NewUserAccount, UserAccount};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// Which unique field a registration collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationConflict {
    Username,
    Email,
}

impl std::fmt::Display for RegistrationConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationConflict::Username => f.write_str("Username already exists"),
            RegistrationConflict::Email => f.write_str("Email already exists"),
        }
    }
}

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("{0}")]
    Conflict(RegistrationConflict),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Emotion classification failed: {0}")]
    Classification(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    /// Inserts a new user and returns the new row id.
    async fn register_user(&self, user: NewUserAccount) -> PortResult<i32>;

    async fn get_user_by_username(&self, username: &str) -> PortResult<UserAccount>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        token: &str,
        username: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the username owning a live session.
    async fn validate_auth_session(&self, token: &str) -> PortResult<String>;

    async fn delete_auth_session(&self, token: &str) -> PortResult<()>;

    // --- Journal Entries ---
    async fn insert_entry(&self, entry: NewJournalEntry) -> PortResult<JournalEntry>;

    /// Loads every entry for a user, newest first. An unknown user yields an empty list.
    async fn load_entries(&self, user_id: &str) -> PortResult<Vec<JournalEntry>>;

    /// Deletes every entry for a user and returns how many rows went away.
    async fn delete_all_entries(&self, user_id: &str) -> PortResult<u64>;
}

/// One `{label, score}` pair as returned by the external text classifier.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Scores a piece of text against the emotion taxonomy.
    async fn classify(&self, text: &str) -> PortResult<Vec<LabelScore>>;
}

#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Produces a salted password hash suitable for storage.
    fn hash_password(&self, password: &str) -> PortResult<String>;

    /// Checks a username/password pair and opens a new login session.
    async fn verify_credentials(&self, username: &str, password: &str)
        -> PortResult<AuthSession>;

    async fn end_session(&self, token: &str) -> PortResult<()>;
}
