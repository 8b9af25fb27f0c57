//! crates/mood_journal_core/src/export.rs
//!
//! Flat CSV rendering of a history snapshot for download, plus the matching reader.

use crate::domain::{Emotion, HistorySnapshot, JournalEntry};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp format used in the `Date & Time` column.
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output was not valid UTF-8: {0}")]
    Encoding(String),
    #[error("Invalid timestamp '{0}' in export")]
    Timestamp(String),
}

/// One exported row. Field order is the column order of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedRow {
    #[serde(rename = "Date & Time")]
    pub date_time: String,
    #[serde(rename = "Period Day")]
    pub period_day: Option<u8>,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Emotion Label")]
    pub emotion_label: String,
    #[serde(rename = "Confidence Score")]
    pub confidence_score: f64,
    #[serde(rename = "Joy_Score")]
    pub joy_score: Option<f64>,
    #[serde(rename = "Sadness_Score")]
    pub sadness_score: Option<f64>,
    #[serde(rename = "Anger_Score")]
    pub anger_score: Option<f64>,
    #[serde(rename = "Fear_Score")]
    pub fear_score: Option<f64>,
    #[serde(rename = "Surprise_Score")]
    pub surprise_score: Option<f64>,
    #[serde(rename = "Disgust_Score")]
    pub disgust_score: Option<f64>,
    #[serde(rename = "Neutral_Score")]
    pub neutral_score: Option<f64>,
}

impl ExportedRow {
    pub fn timestamp(&self) -> Result<NaiveDateTime, ExportError> {
        NaiveDateTime::parse_from_str(&self.date_time, EXPORT_DATE_FORMAT)
            .map_err(|_| ExportError::Timestamp(self.date_time.clone()))
    }
}

impl From<&JournalEntry> for ExportedRow {
    fn from(entry: &JournalEntry) -> Self {
        let s = &entry.per_emotion_scores;
        Self {
            date_time: entry.timestamp.format(EXPORT_DATE_FORMAT).to_string(),
            period_day: entry.cycle_day.map(|d| d.get()),
            summary: entry.summary_text.clone(),
            emotion_label: entry.dominant_emotion.to_string(),
            confidence_score: entry.dominant_confidence,
            joy_score: s.get(Emotion::Joy),
            sadness_score: s.get(Emotion::Sadness),
            anger_score: s.get(Emotion::Anger),
            fear_score: s.get(Emotion::Fear),
            surprise_score: s.get(Emotion::Surprise),
            disgust_score: s.get(Emotion::Disgust),
            neutral_score: s.get(Emotion::Neutral),
        }
    }
}

/// Renders the snapshot, one row per entry in snapshot order, with a header row.
pub fn to_csv(snapshot: &HistorySnapshot) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in snapshot.entries() {
        writer.serialize(ExportedRow::from(entry))?;
    }
    if snapshot.is_empty() {
        writer.write_record(HEADERS)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))
}

/// Reads back a file produced by [`to_csv`].
pub fn parse_csv(text: &str) -> Result<Vec<ExportedRow>, ExportError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let rows = reader.deserialize().collect::<Result<Vec<ExportedRow>, _>>()?;
    Ok(rows)
}

/// Download name for an export taken on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("mood_journal_{}.csv", date.format("%Y%m%d"))
}

// Serde only emits the header alongside the first record.
const HEADERS: [&str; 12] = [
    "Date & Time",
    "Period Day",
    "Summary",
    "Emotion Label",
    "Confidence Score",
    "Joy_Score",
    "Sadness_Score",
    "Anger_Score",
    "Fear_Score",
    "Surprise_Score",
    "Disgust_Score",
    "Neutral_Score",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CycleDay, EmotionScores};

    fn entry(ts: &str, day: Option<i64>, emotion: Emotion, confidence: f64, summary: &str) -> JournalEntry {
        JournalEntry {
            id: 1,
            user_id: "ana".to_string(),
            timestamp: NaiveDateTime::parse_from_str(ts, EXPORT_DATE_FORMAT).unwrap(),
            cycle_day: day.and_then(CycleDay::new),
            summary_text: summary.to_string(),
            dominant_emotion: emotion,
            dominant_confidence: confidence,
            per_emotion_scores: Emotion::ALL.iter().map(|e| (*e, 1.0 / 7.0)).collect(),
        }
    }

    #[test]
    fn round_trip_preserves_rows_in_order() {
        let snapshot = HistorySnapshot::new(vec![
            entry("2024-05-10 21:15", Some(3), Emotion::Sadness, 0.6734, "tired, \"heavy\" day"),
            entry("2024-05-09 08:00", Some(2), Emotion::Joy, 0.91, "good\nmorning"),
            entry("2024-05-07 12:30", None, Emotion::Neutral, 0.5, ""),
        ]);

        let csv_text = to_csv(&snapshot).unwrap();
        let rows = parse_csv(&csv_text).unwrap();

        let expected: Vec<_> = snapshot
            .entries()
            .iter()
            .map(|e| (e.date(), e.cycle_day.map(|d| d.get()), e.dominant_emotion.to_string(), e.dominant_confidence))
            .collect();
        let actual: Vec<_> = rows
            .iter()
            .map(|r| (r.timestamp().unwrap().date(), r.period_day, r.emotion_label.clone(), r.confidence_score))
            .collect();
        assert_eq!(actual, expected);
        assert_eq!(rows[0].summary, "tired, \"heavy\" day");
        assert_eq!(rows[1].summary, "good\nmorning");
    }

    #[test]
    fn header_uses_fixed_column_order() {
        let snapshot = HistorySnapshot::new(vec![entry("2024-05-10 21:15", Some(3), Emotion::Joy, 0.7, "x")]);
        let csv_text = to_csv(&snapshot).unwrap();
        let header = csv_text.lines().next().unwrap();
        assert_eq!(header, HEADERS.join(","));
        assert!(csv_text.lines().nth(1).unwrap().starts_with("2024-05-10 21:15,3,x,joy,0.7,"));
    }

    #[test]
    fn empty_history_exports_header_only() {
        let csv_text = to_csv(&HistorySnapshot::empty()).unwrap();
        assert_eq!(csv_text.trim_end(), HEADERS.join(","));
        assert!(parse_csv(&csv_text).unwrap().is_empty());
    }

    #[test]
    fn missing_scores_become_empty_cells() {
        let mut e = entry("2024-05-10 21:15", Some(1), Emotion::Joy, 0.7, "x");
        e.per_emotion_scores = EmotionScores::new();
        let csv_text = to_csv(&HistorySnapshot::new(vec![e])).unwrap();
        let row = &parse_csv(&csv_text).unwrap()[0];
        assert_eq!(row.joy_score, None);
        assert_eq!(row.neutral_score, None);
    }

    #[test]
    fn filename_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        assert_eq!(export_filename(date), "mood_journal_20240209.csv");
    }
}
