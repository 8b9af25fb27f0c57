pub mod accounts;
pub mod analytics;
pub mod classification;
pub mod content;
pub mod domain;
pub mod export;
pub mod ports;
pub mod service;

pub use domain::{
    AuthSession, CycleDay, Emotion, EmotionScores, HistorySnapshot, JournalEntry,
    NewJournalEntry, NewUserAccount, UserAccount,
};
pub use ports::{
    CredentialService, DatabaseService, EmotionClassifier, LabelScore, PortError, PortResult,
    RegistrationConflict,
};
pub use service::{Dashboard, EntrySubmission, JournalService, SubmissionOutcome};
