//! crates/mood_journal_core/src/classification.rs
//!
//! Turns the raw `{label, score}` list produced by an `EmotionClassifier` into a
//! validated `Classification`: the dominant emotion plus every per-label score.

use crate::domain::{Emotion, EmotionScores};
use crate::ports::{EmotionClassifier, LabelScore, PortError, PortResult};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassificationError {
    #[error("classifier returned no scores")]
    Empty,
    #[error("classifier returned unknown label '{0}'")]
    UnknownLabel(String),
    #[error("classifier output is missing label '{0}'")]
    MissingLabel(Emotion),
    #[error("classifier returned label '{0}' more than once")]
    DuplicateLabel(Emotion),
    #[error("classifier returned a score outside [0, 1] for '{0}'")]
    InvalidScore(String),
}

impl From<ClassificationError> for PortError {
    fn from(e: ClassificationError) -> Self {
        PortError::Classification(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub dominant: Emotion,
    pub confidence: f64,
    pub scores: EmotionScores,
}

impl Classification {
    /// Validates classifier output and selects the highest-scoring label.
    ///
    /// When two labels share the maximum, the one listed first wins.
    pub fn from_label_scores(raw: Vec<LabelScore>) -> Result<Self, ClassificationError> {
        if raw.is_empty() {
            return Err(ClassificationError::Empty);
        }

        let mut scores = EmotionScores::new();
        let mut dominant: Option<(Emotion, f64)> = None;
        for LabelScore { label, score } in raw {
            // NaN fails both bounds.
            if !(0.0..=1.0).contains(&score) {
                return Err(ClassificationError::InvalidScore(label));
            }
            let emotion =
                Emotion::parse(&label).ok_or(ClassificationError::UnknownLabel(label))?;
            if scores.insert(emotion, score).is_some() {
                return Err(ClassificationError::DuplicateLabel(emotion));
            }
            if dominant.map_or(true, |(_, best)| score > best) {
                dominant = Some((emotion, score));
            }
        }

        if let Some(missing) = Emotion::ALL.into_iter().find(|e| scores.get(*e).is_none()) {
            return Err(ClassificationError::MissingLabel(missing));
        }

        let (dominant, confidence) = dominant.ok_or(ClassificationError::Empty)?;
        Ok(Self {
            dominant,
            confidence,
            scores,
        })
    }
}

/// Runs the classifier on `text` and validates the result.
pub async fn classify_text(
    classifier: &dyn EmotionClassifier,
    text: &str,
) -> PortResult<Classification> {
    let raw = classifier.classify(text).await?;
    Ok(Classification::from_label_scores(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ls(label: &str, score: f64) -> LabelScore {
        LabelScore {
            label: label.to_string(),
            score,
        }
    }

    fn full_output() -> Vec<LabelScore> {
        vec![
            ls("anger", 0.02),
            ls("disgust", 0.01),
            ls("fear", 0.05),
            ls("joy", 0.81),
            ls("neutral", 0.06),
            ls("sadness", 0.03),
            ls("surprise", 0.02),
        ]
    }

    #[test]
    fn picks_maximum_score_as_dominant() {
        let c = Classification::from_label_scores(full_output()).unwrap();
        assert_eq!(c.dominant, Emotion::Joy);
        assert_eq!(c.confidence, 0.81);
        assert_eq!(c.scores.get(Emotion::Fear), Some(0.05));
        assert!(c.scores.is_complete());
    }

    #[test]
    fn labels_are_case_insensitive() {
        let raw = full_output()
            .into_iter()
            .map(|s| ls(&s.label.to_uppercase(), s.score))
            .collect();
        let c = Classification::from_label_scores(raw).unwrap();
        assert_eq!(c.dominant, Emotion::Joy);
    }

    #[test]
    fn first_of_equal_maxima_wins() {
        let raw = vec![
            ls("sadness", 0.4),
            ls("joy", 0.4),
            ls("anger", 0.04),
            ls("fear", 0.04),
            ls("surprise", 0.04),
            ls("disgust", 0.04),
            ls("neutral", 0.04),
        ];
        let c = Classification::from_label_scores(raw).unwrap();
        assert_eq!(c.dominant, Emotion::Sadness);
    }

    #[test]
    fn rejects_empty_output() {
        assert_eq!(
            Classification::from_label_scores(Vec::new()),
            Err(ClassificationError::Empty)
        );
    }

    #[test]
    fn rejects_unknown_label() {
        let mut raw = full_output();
        raw.push(ls("boredom", 0.9));
        assert_eq!(
            Classification::from_label_scores(raw),
            Err(ClassificationError::UnknownLabel("boredom".to_string()))
        );
    }

    #[test]
    fn rejects_partial_output() {
        let raw = full_output().into_iter().filter(|s| s.label != "fear").collect();
        assert_eq!(
            Classification::from_label_scores(raw),
            Err(ClassificationError::MissingLabel(Emotion::Fear))
        );
    }

    #[test]
    fn rejects_repeated_label() {
        let mut raw = vec![ls("joy", 0.9)];
        raw.extend(Emotion::ALL.iter().map(|e| ls(e.as_str(), 0.05)));
        assert_eq!(
            Classification::from_label_scores(raw),
            Err(ClassificationError::DuplicateLabel(Emotion::Joy))
        );
    }

    #[test]
    fn dominant_confidence_matches_stored_score() {
        let c = Classification::from_label_scores(full_output()).unwrap();
        assert_eq!(c.scores.get(c.dominant), Some(c.confidence));
    }

    #[test]
    fn rejects_scores_outside_unit_interval() {
        for bad in [1.5, -0.1, f64::INFINITY] {
            let mut raw = full_output();
            raw[3].score = bad;
            assert_eq!(
                Classification::from_label_scores(raw),
                Err(ClassificationError::InvalidScore("joy".to_string()))
            );
        }
    }

    #[test]
    fn rejects_nan_scores() {
        let mut raw = full_output();
        raw[0].score = f64::NAN;
        assert!(matches!(
            Classification::from_label_scores(raw),
            Err(ClassificationError::InvalidScore(_))
        ));
    }
}
