//! crates/mood_journal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Emotion Taxonomy
//=========================================================================================

/// The fixed set of emotion labels produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Neutral,
}

impl Emotion {
    /// All labels, in the column order used by the store and the CSV export.
    pub const ALL: [Emotion; 7] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Disgust,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Disgust => "disgust",
            Emotion::Neutral => "neutral",
        }
    }

    /// Case-insensitive lookup. Returns `None` for anything outside the taxonomy.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown emotion label '{}'", s))
    }
}

//=========================================================================================
// Cycle Day
//=========================================================================================

/// A user-reported day (1 through 7) within their menstrual cycle window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CycleDay(u8);

impl CycleDay {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(day: i64) -> Option<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&day) {
            Some(Self(day as u8))
        } else {
            None
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for CycleDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//=========================================================================================
// Scores
//=========================================================================================

/// Per-emotion probabilities for a single entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmotionScores(BTreeMap<Emotion, f64>);

impl EmotionScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the score for `emotion`, returning the score it replaced.
    pub fn insert(&mut self, emotion: Emotion, score: f64) -> Option<f64> {
        self.0.insert(emotion, score)
    }

    pub fn get(&self, emotion: Emotion) -> Option<f64> {
        self.0.get(&emotion).copied()
    }

    /// True when every label in the taxonomy has a score.
    pub fn is_complete(&self) -> bool {
        Emotion::ALL.iter().all(|e| self.0.contains_key(e))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        self.0.iter().map(|(e, s)| (*e, *s))
    }
}

impl FromIterator<(Emotion, f64)> for EmotionScores {
    fn from_iter<I: IntoIterator<Item = (Emotion, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

//=========================================================================================
// Journal Entries
//=========================================================================================

/// Maximum number of characters accepted in an entry summary.
pub const MAX_SUMMARY_CHARS: usize = 300;

/// A stored, classified journal entry. Immutable once persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    pub id: i32,
    pub user_id: String,
    pub timestamp: NaiveDateTime,
    // Legacy rows may lack a cycle day; new entries always carry one.
    pub cycle_day: Option<CycleDay>,
    pub summary_text: String,
    pub dominant_emotion: Emotion,
    pub dominant_confidence: f64,
    pub per_emotion_scores: EmotionScores,
}

impl JournalEntry {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// The insert payload for a new entry, after classification.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJournalEntry {
    pub user_id: String,
    pub timestamp: NaiveDateTime,
    pub cycle_day: CycleDay,
    pub summary_text: String,
    pub dominant_emotion: Emotion,
    pub dominant_confidence: f64,
    pub per_emotion_scores: EmotionScores,
}

/// A user's full entry history, newest first, as loaded from the store.
///
/// Snapshots are replaced wholesale after every write and never patched in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySnapshot {
    entries: Vec<JournalEntry>,
}

impl HistorySnapshot {
    /// Builds a snapshot, ordering the entries newest first.
    pub fn new(mut entries: Vec<JournalEntry>) -> Self {
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Entries oldest first, for trend charts.
    pub fn chronological(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//=========================================================================================
// Users
//=========================================================================================

// Represents a registered user - never mutated after registration
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Registration payload with the password already hashed.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(ts: &str) -> JournalEntry {
        JournalEntry {
            id: 0,
            user_id: "ana".to_string(),
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap(),
            cycle_day: CycleDay::new(1),
            summary_text: String::new(),
            dominant_emotion: Emotion::Neutral,
            dominant_confidence: 0.5,
            per_emotion_scores: EmotionScores::new(),
        }
    }

    #[test]
    fn emotion_parse_is_case_insensitive() {
        assert_eq!(Emotion::parse("JOY"), Some(Emotion::Joy));
        assert_eq!(Emotion::parse(" Sadness "), Some(Emotion::Sadness));
        assert_eq!(Emotion::parse("bliss"), None);
    }

    #[test]
    fn cycle_day_rejects_out_of_range() {
        assert!(CycleDay::new(0).is_none());
        assert!(CycleDay::new(8).is_none());
        assert_eq!(CycleDay::new(7).map(|d| d.get()), Some(7));
    }

    #[test]
    fn scores_complete_only_with_all_labels() {
        let mut scores: EmotionScores =
            Emotion::ALL.iter().take(6).map(|e| (*e, 0.1)).collect();
        assert!(!scores.is_complete());
        scores.insert(Emotion::Neutral, 0.4);
        assert!(scores.is_complete());
    }

    #[test]
    fn snapshot_orders_newest_first() {
        let snapshot = HistorySnapshot::new(vec![
            entry_at("2024-03-01 08:00"),
            entry_at("2024-03-03 08:00"),
            entry_at("2024-03-02 08:00"),
        ]);
        let days: Vec<u32> = snapshot
            .entries()
            .iter()
            .map(|e| chrono::Datelike::day(&e.date()))
            .collect();
        assert_eq!(days, vec![3, 2, 1]);

        let oldest = snapshot.chronological().next().unwrap();
        assert_eq!(chrono::Datelike::day(&oldest.date()), 1);
    }
}
