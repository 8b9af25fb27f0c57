//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use mood_journal_core::ports::{CredentialService, DatabaseService, EmotionClassifier};
use mood_journal_core::JournalService;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub credentials: Arc<dyn CredentialService>,
    pub journal: JournalService,
}

impl AppState {
    /// Wires the journal service from the injected store and classifier.
    pub fn new(
        config: Arc<Config>,
        db: Arc<dyn DatabaseService>,
        classifier: Arc<dyn EmotionClassifier>,
        credentials: Arc<dyn CredentialService>,
    ) -> Self {
        Self {
            journal: JournalService::new(db.clone(), classifier),
            db,
            config,
            credentials,
        }
    }
}
