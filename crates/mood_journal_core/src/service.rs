//! crates/mood_journal_core/src/service.rs
//!
//! The application service behind every journal interaction. Each call runs one
//! synchronous cycle against the injected ports (validate, classify, persist,
//! reload) and hands back a freshly loaded `HistorySnapshot`.

use crate::analytics::{self, CycleDayTable, Insights};
use crate::classification::classify_text;
use crate::content::{self, DailyFact, EmotionContent};
use crate::domain::{
    CycleDay, Emotion, HistorySnapshot, JournalEntry, NewJournalEntry, MAX_SUMMARY_CHARS,
};
use crate::export;
use crate::ports::{DatabaseService, EmotionClassifier, PortError, PortResult};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use tracing::{debug, error, info};

/// A user's raw form submission, before classification.
#[derive(Debug, Clone)]
pub struct EntrySubmission {
    pub timestamp: NaiveDateTime,
    pub cycle_day: i64,
    pub summary: String,
}

/// Everything produced by a successful submission.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub entry: JournalEntry,
    pub content: EmotionContent,
    pub snapshot: HistorySnapshot,
}

/// One point on the confidence-over-time chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub timestamp: NaiveDateTime,
    pub emotion: Emotion,
    pub confidence: f64,
}

/// Chart-ready statistics for the dashboard view.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub streak: u32,
    pub insights: Option<Insights>,
    pub most_common_emotion_content: Option<EmotionContent>,
    /// `None` until the history holds enough scored entries to compare cycle days.
    pub cycle_day_patterns: Option<CycleDayTable>,
    pub fact_of_day: &'static DailyFact,
    /// Oldest first.
    pub trend: Vec<TrendPoint>,
    pub history: HistorySnapshot,
}

#[derive(Clone)]
pub struct JournalService {
    db: Arc<dyn DatabaseService>,
    classifier: Arc<dyn EmotionClassifier>,
}

impl JournalService {
    pub fn new(db: Arc<dyn DatabaseService>, classifier: Arc<dyn EmotionClassifier>) -> Self {
        Self { db, classifier }
    }

    /// Loads the full history for a user. No entries is an empty snapshot, not an error.
    pub async fn load_history(&self, user_id: &str) -> PortResult<HistorySnapshot> {
        let entries = self.db.load_entries(user_id).await?;
        debug!(user_id, count = entries.len(), "Loaded history snapshot");
        Ok(HistorySnapshot::new(entries))
    }

    pub async fn submit_entry(
        &self,
        user_id: &str,
        submission: EntrySubmission,
    ) -> PortResult<SubmissionOutcome> {
        let summary = submission.summary.trim();
        if summary.is_empty() {
            return Err(PortError::Validation("Summary must not be empty".to_string()));
        }
        if summary.chars().count() > MAX_SUMMARY_CHARS {
            return Err(PortError::Validation(format!(
                "Summary must be at most {} characters",
                MAX_SUMMARY_CHARS
            )));
        }
        let cycle_day = CycleDay::new(submission.cycle_day).ok_or_else(|| {
            PortError::Validation(format!(
                "Cycle day must be between {} and {}",
                CycleDay::MIN,
                CycleDay::MAX
            ))
        })?;

        let classification = classify_text(self.classifier.as_ref(), summary)
            .await
            .map_err(|e| {
                error!(user_id, "Classification failed, entry not saved: {}", e);
                e
            })?;

        let entry = self
            .db
            .insert_entry(NewJournalEntry {
                user_id: user_id.to_string(),
                timestamp: submission.timestamp,
                cycle_day,
                summary_text: summary.to_string(),
                dominant_emotion: classification.dominant,
                dominant_confidence: classification.confidence,
                per_emotion_scores: classification.scores,
            })
            .await?;
        info!(
            user_id,
            entry_id = entry.id,
            emotion = %entry.dominant_emotion,
            "Saved journal entry"
        );

        let snapshot = self.load_history(user_id).await?;
        let content = content::content_for_emotion(entry.dominant_emotion, cycle_day.get() as i64);
        Ok(SubmissionOutcome {
            entry,
            content,
            snapshot,
        })
    }

    /// Deletes every entry of the user and returns the count with the reloaded snapshot.
    pub async fn reset_history(&self, user_id: &str) -> PortResult<(u64, HistorySnapshot)> {
        let deleted = self.db.delete_all_entries(user_id).await?;
        info!(user_id, deleted, "Deleted all journal entries");
        let snapshot = self.load_history(user_id).await?;
        Ok((deleted, snapshot))
    }

    pub async fn dashboard(&self, user_id: &str, today: NaiveDate) -> PortResult<Dashboard> {
        let history = self.load_history(user_id).await?;
        Ok(build_dashboard(history, today))
    }

    pub async fn export_csv(&self, user_id: &str) -> PortResult<String> {
        let history = self.load_history(user_id).await?;
        export::to_csv(&history).map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

/// Derives every dashboard statistic from one snapshot.
pub fn build_dashboard(history: HistorySnapshot, today: NaiveDate) -> Dashboard {
    let insights = analytics::extract_insights(&history);
    let most_common_emotion_content = insights
        .as_ref()
        .map(|i| content::content_for_emotion(i.most_common_emotion, 1));
    let cycle_day_patterns = analytics::aggregate_by_cycle_day(&history).ok();
    let trend = history
        .chronological()
        .map(|e| TrendPoint {
            timestamp: e.timestamp,
            emotion: e.dominant_emotion,
            confidence: e.dominant_confidence,
        })
        .collect();

    Dashboard {
        streak: analytics::calculate_streak(&history, today),
        insights,
        most_common_emotion_content,
        cycle_day_patterns,
        fact_of_day: content::fact_of_day(today),
        trend,
        history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewUserAccount, UserAccount};
    use crate::ports::LabelScore;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    //-------------------------------------------------------------------------------------
    // Mock ports
    //-------------------------------------------------------------------------------------

    #[derive(Default)]
    struct MockDatabase {
        entries: Mutex<Vec<JournalEntry>>,
        fail_insert: bool,
        fail_delete: bool,
        loads: AtomicUsize,
    }

    impl MockDatabase {
        fn failing_inserts() -> Self {
            Self {
                fail_insert: true,
                ..Self::default()
            }
        }

        fn failing_deletes() -> Self {
            Self {
                fail_delete: true,
                ..Self::default()
            }
        }

        fn stored(&self) -> usize {
            self.entries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DatabaseService for MockDatabase {
        async fn register_user(&self, _user: NewUserAccount) -> PortResult<i32> {
            unimplemented!()
        }

        async fn get_user_by_username(&self, _username: &str) -> PortResult<UserAccount> {
            unimplemented!()
        }

        async fn create_auth_session(
            &self,
            _token: &str,
            _username: &str,
            _expires_at: DateTime<Utc>,
        ) -> PortResult<()> {
            unimplemented!()
        }

        async fn validate_auth_session(&self, _token: &str) -> PortResult<String> {
            unimplemented!()
        }

        async fn delete_auth_session(&self, _token: &str) -> PortResult<()> {
            unimplemented!()
        }

        async fn insert_entry(&self, entry: NewJournalEntry) -> PortResult<JournalEntry> {
            if self.fail_insert {
                return Err(PortError::Unexpected("connection reset".to_string()));
            }
            let mut entries = self.entries.lock().unwrap();
            let stored = JournalEntry {
                id: entries.len() as i32 + 1,
                user_id: entry.user_id,
                timestamp: entry.timestamp,
                cycle_day: Some(entry.cycle_day),
                summary_text: entry.summary_text,
                dominant_emotion: entry.dominant_emotion,
                dominant_confidence: entry.dominant_confidence,
                per_emotion_scores: entry.per_emotion_scores,
            };
            entries.push(stored.clone());
            Ok(stored)
        }

        async fn load_entries(&self, user_id: &str) -> PortResult<Vec<JournalEntry>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn delete_all_entries(&self, user_id: &str) -> PortResult<u64> {
            if self.fail_delete {
                return Err(PortError::Unexpected("connection reset".to_string()));
            }
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|e| e.user_id != user_id);
            Ok((before - entries.len()) as u64)
        }
    }

    /// Returns a fixed score list, favouring one label.
    struct FixedClassifier {
        dominant: &'static str,
    }

    #[async_trait]
    impl EmotionClassifier for FixedClassifier {
        async fn classify(&self, _text: &str) -> PortResult<Vec<LabelScore>> {
            Ok(Emotion::ALL
                .iter()
                .map(|e| LabelScore {
                    label: e.to_string(),
                    score: if e.as_str() == self.dominant { 0.7 } else { 0.05 },
                })
                .collect())
        }
    }

    struct BrokenClassifier {
        output: Option<Vec<LabelScore>>,
    }

    #[async_trait]
    impl EmotionClassifier for BrokenClassifier {
        async fn classify(&self, _text: &str) -> PortResult<Vec<LabelScore>> {
            self.output
                .clone()
                .ok_or_else(|| PortError::Classification("model unavailable".to_string()))
        }
    }

    fn service(db: Arc<MockDatabase>, dominant: &'static str) -> JournalService {
        JournalService::new(db, Arc::new(FixedClassifier { dominant }))
    }

    fn submission(ts: &str, cycle_day: i64, summary: &str) -> EntrySubmission {
        EntrySubmission {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap(),
            cycle_day,
            summary: summary.to_string(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    //-------------------------------------------------------------------------------------
    // Tests
    //-------------------------------------------------------------------------------------

    #[tokio::test]
    async fn submit_classifies_persists_and_reloads() {
        let db = Arc::new(MockDatabase::default());
        let svc = service(db.clone(), "sadness");

        let outcome = svc
            .submit_entry("ana", submission("2024-05-10 09:00", 2, "  Feeling low today  "))
            .await
            .unwrap();

        assert_eq!(outcome.entry.dominant_emotion, Emotion::Sadness);
        assert_eq!(outcome.entry.dominant_confidence, 0.7);
        assert_eq!(outcome.entry.summary_text, "Feeling low today");
        assert!(outcome.entry.per_emotion_scores.is_complete());
        assert_eq!(outcome.snapshot.len(), 1);
        assert_eq!(outcome.content, content::content_for("sadness", 2));
        assert_eq!(db.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn classifier_failure_persists_nothing() {
        let db = Arc::new(MockDatabase::default());
        let svc = JournalService::new(db.clone(), Arc::new(BrokenClassifier { output: None }));

        let err = svc
            .submit_entry("ana", submission("2024-05-10 09:00", 1, "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::Classification(_)));
        assert_eq!(db.stored(), 0);
    }

    #[tokio::test]
    async fn malformed_classifier_output_persists_nothing() {
        let db = Arc::new(MockDatabase::default());
        let svc = JournalService::new(
            db.clone(),
            Arc::new(BrokenClassifier {
                output: Some(Vec::new()),
            }),
        );

        let err = svc
            .submit_entry("ana", submission("2024-05-10 09:00", 1, "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::Classification(_)));
        assert_eq!(db.stored(), 0);
    }

    #[tokio::test]
    async fn failed_insert_skips_reload() {
        let db = Arc::new(MockDatabase::failing_inserts());
        let svc = service(db.clone(), "joy");

        let err = svc
            .submit_entry("ana", submission("2024-05-10 09:00", 1, "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::Unexpected(_)));
        assert_eq!(db.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submit_validates_input() {
        let db = Arc::new(MockDatabase::default());
        let svc = service(db.clone(), "joy");

        for bad in [
            submission("2024-05-10 09:00", 1, "   "),
            submission("2024-05-10 09:00", 0, "fine"),
            submission("2024-05-10 09:00", 8, "fine"),
            submission("2024-05-10 09:00", 1, &"a".repeat(MAX_SUMMARY_CHARS + 1)),
        ] {
            let err = svc.submit_entry("ana", bad).await.unwrap_err();
            assert!(matches!(err, PortError::Validation(_)));
        }
        assert_eq!(db.stored(), 0);
    }

    #[tokio::test]
    async fn reset_deletes_only_own_entries() {
        let db = Arc::new(MockDatabase::default());
        let svc = service(db.clone(), "joy");
        svc.submit_entry("ana", submission("2024-05-10 09:00", 1, "one")).await.unwrap();
        svc.submit_entry("ana", submission("2024-05-11 09:00", 2, "two")).await.unwrap();
        svc.submit_entry("bea", submission("2024-05-11 09:00", 2, "other")).await.unwrap();

        let (deleted, snapshot) = svc.reset_history("ana").await.unwrap();

        assert_eq!(deleted, 2);
        assert!(snapshot.is_empty());
        assert_eq!(svc.load_history("bea").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_reset_skips_reload() {
        let db = Arc::new(MockDatabase::failing_deletes());
        let svc = service(db.clone(), "joy");

        let err = svc.reset_history("ana").await.unwrap_err();

        assert!(matches!(err, PortError::Unexpected(_)));
        assert_eq!(db.loads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dashboard_for_empty_history() {
        let svc = service(Arc::new(MockDatabase::default()), "joy");

        let dash = svc.dashboard("ana", day("2024-05-10")).await.unwrap();

        assert_eq!(dash.streak, 0);
        assert!(dash.insights.is_none());
        assert!(dash.most_common_emotion_content.is_none());
        assert!(dash.cycle_day_patterns.is_none());
        assert!(dash.trend.is_empty());
        assert_eq!(dash.fact_of_day, content::fact_of_day(day("2024-05-10")));
    }

    #[tokio::test]
    async fn dashboard_combines_statistics() {
        let db = Arc::new(MockDatabase::default());
        let svc = service(db, "joy");
        svc.submit_entry("ana", submission("2024-05-08 09:00", 1, "a")).await.unwrap();
        svc.submit_entry("ana", submission("2024-05-09 09:00", 2, "b")).await.unwrap();
        svc.submit_entry("ana", submission("2024-05-10 09:00", 3, "c")).await.unwrap();

        let dash = svc.dashboard("ana", day("2024-05-10")).await.unwrap();

        assert_eq!(dash.streak, 3);
        let insights = dash.insights.unwrap();
        assert_eq!(insights.most_common_emotion, Emotion::Joy);
        assert_eq!(insights.total_entries, 3);
        assert_eq!(dash.most_common_emotion_content.unwrap().emoji, "😊");
        assert_eq!(dash.cycle_day_patterns.unwrap().cycle_days().len(), 3);
        assert_eq!(dash.trend.len(), 3);
        assert!(dash.trend[0].timestamp < dash.trend[2].timestamp);
    }

    #[tokio::test]
    async fn export_contains_one_row_per_entry() {
        let svc = service(Arc::new(MockDatabase::default()), "fear");
        svc.submit_entry("ana", submission("2024-05-09 09:00", 2, "b")).await.unwrap();
        svc.submit_entry("ana", submission("2024-05-10 09:00", 3, "c")).await.unwrap();

        let csv_text = svc.export_csv("ana").await.unwrap();
        let rows = export::parse_csv(&csv_text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date_time, "2024-05-10 09:00");
        assert_eq!(rows[0].emotion_label, "fear");
    }
}
