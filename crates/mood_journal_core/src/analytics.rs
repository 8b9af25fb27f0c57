//! crates/mood_journal_core/src/analytics.rs
//!
//! Derived statistics over a user's `HistorySnapshot`: logging streaks, headline
//! insights and per-cycle-day emotion averages. Everything here is a pure function
//! of its inputs; "today" is always passed in by the caller.

use crate::domain::{CycleDay, Emotion, HistorySnapshot};
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// Minimum number of entries before insights are reported.
pub const MIN_ENTRIES_FOR_INSIGHTS: usize = 3;

/// Minimum number of fully scored entries before cycle-day patterns are reported.
pub const MIN_ENTRIES_FOR_PATTERNS: usize = 2;

//=========================================================================================
// Streaks
//=========================================================================================

/// Counts consecutive logged calendar days ending at the most recent entry.
///
/// The streak only counts while the most recent entry falls on `today` or the day
/// before; otherwise it is broken and the result is zero.
pub fn calculate_streak(snapshot: &HistorySnapshot, today: NaiveDate) -> u32 {
    let dates: BTreeSet<NaiveDate> = snapshot.entries().iter().map(|e| e.date()).collect();
    let mut descending = dates.into_iter().rev();

    let Some(latest) = descending.next() else {
        return 0;
    };
    if latest != today && latest != today - Duration::days(1) {
        return 0;
    }

    let mut streak = 1;
    let mut previous = latest;
    for date in descending {
        if previous - date != Duration::days(1) {
            break;
        }
        streak += 1;
        previous = date;
    }
    streak
}

//=========================================================================================
// Insights
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Insights {
    pub most_common_emotion: Emotion,
    /// Cycle day with the highest mean dominant confidence, if any entry has a cycle day.
    pub best_cycle_day: Option<CycleDay>,
    pub total_entries: usize,
}

/// Summarises a history, or returns `None` when there are too few entries to say anything.
pub fn extract_insights(snapshot: &HistorySnapshot) -> Option<Insights> {
    if snapshot.len() < MIN_ENTRIES_FOR_INSIGHTS {
        return None;
    }

    let mut counts: BTreeMap<Emotion, usize> = BTreeMap::new();
    for entry in snapshot.entries() {
        *counts.entry(entry.dominant_emotion).or_default() += 1;
    }
    // Ties resolve to the lexically smallest label.
    let most_common_emotion = counts
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| {
            a_count.cmp(b_count).then_with(|| b.as_str().cmp(a.as_str()))
        })
        .map(|(emotion, _)| emotion)?;

    Some(Insights {
        most_common_emotion,
        best_cycle_day: best_cycle_day(snapshot),
        total_entries: snapshot.len(),
    })
}

fn best_cycle_day(snapshot: &HistorySnapshot) -> Option<CycleDay> {
    let mut by_day: BTreeMap<CycleDay, (f64, usize)> = BTreeMap::new();
    for entry in snapshot.entries() {
        if let Some(day) = entry.cycle_day {
            let slot = by_day.entry(day).or_insert((0.0, 0));
            slot.0 += entry.dominant_confidence;
            slot.1 += 1;
        }
    }

    let mut best: Option<(CycleDay, f64)> = None;
    for (day, (sum, count)) in by_day {
        let mean = sum / count as f64;
        match best {
            Some((_, best_mean)) if mean <= best_mean => {}
            _ => best = Some((day, mean)),
        }
    }
    best.map(|(day, _)| day)
}

//=========================================================================================
// Cycle-Day Aggregation
//=========================================================================================

/// Returned when the history cannot support a cycle-day comparison yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Insufficient data: at least {required} scored entries are needed, found {found}")]
pub struct InsufficientData {
    pub required: usize,
    pub found: usize,
}

/// One cell of the cycle-day by emotion table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleDayScore {
    pub cycle_day: CycleDay,
    pub emotion: Emotion,
    pub mean_score: f64,
}

/// Sparse table of mean scores, ordered by cycle day and then by `Emotion::ALL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleDayTable {
    pub rows: Vec<CycleDayScore>,
}

impl CycleDayTable {
    pub fn get(&self, cycle_day: CycleDay, emotion: Emotion) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.cycle_day == cycle_day && r.emotion == emotion)
            .map(|r| r.mean_score)
    }

    pub fn cycle_days(&self) -> Vec<CycleDay> {
        let days: BTreeSet<CycleDay> = self.rows.iter().map(|r| r.cycle_day).collect();
        days.into_iter().collect()
    }
}

/// Averages each emotion's score per cycle day across the history.
///
/// Only entries with a cycle day and a complete set of scores participate.
pub fn aggregate_by_cycle_day(snapshot: &HistorySnapshot) -> Result<CycleDayTable, InsufficientData> {
    let scored: Vec<_> = snapshot
        .entries()
        .iter()
        .filter(|e| e.per_emotion_scores.is_complete())
        .filter_map(|e| e.cycle_day.map(|day| (day, &e.per_emotion_scores)))
        .collect();

    if scored.len() < MIN_ENTRIES_FOR_PATTERNS {
        return Err(InsufficientData {
            required: MIN_ENTRIES_FOR_PATTERNS,
            found: scored.len(),
        });
    }

    let mut sums: BTreeMap<CycleDay, ([f64; 7], usize)> = BTreeMap::new();
    for (day, scores) in scored {
        let slot = sums.entry(day).or_insert(([0.0; 7], 0));
        for (i, emotion) in Emotion::ALL.iter().enumerate() {
            slot.0[i] += scores.get(*emotion).unwrap_or_default();
        }
        slot.1 += 1;
    }

    let rows = sums
        .into_iter()
        .flat_map(|(cycle_day, (totals, count))| {
            Emotion::ALL
                .into_iter()
                .zip(totals)
                .map(move |(emotion, total)| CycleDayScore {
                    cycle_day,
                    emotion,
                    mean_score: total / count as f64,
                })
        })
        .collect();

    Ok(CycleDayTable { rows })
}
