//! Core data types produced by the categorization pipeline.

use serde::{Deserialize, Serialize};

/// The best-scoring category for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Winning category name
    pub category: String,

    /// Cosine similarity between the image and the category vector
    pub score: f32,
}

/// One gallery entry in the JSON summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Site URL of the copied file, e.g. `/images/gallery/decks/deck.jpg`
    pub file: String,

    /// Similarity score rounded to 4 decimals
    pub confidence: f64,

    /// Original source file name
    pub source: String,
}

impl SummaryRecord {
    /// Build a record, rounding the score the way the summary stores it.
    pub fn new(file: String, score: f32, source: String) -> Self {
        Self {
            file,
            confidence: round_confidence(score),
            source,
        }
    }
}

/// Round a similarity score to 4 decimal places.
pub fn round_confidence(score: f32) -> f64 {
    (score as f64 * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_confidence() {
        assert_eq!(round_confidence(0.312_345), 0.3123);
        assert_eq!(round_confidence(0.312_36), 0.3124);
        assert_eq!(round_confidence(-0.05), -0.05);
        assert_eq!(round_confidence(0.31), 0.31);
    }

    #[test]
    fn test_record_serializes_in_schema_order() {
        let record = SummaryRecord::new(
            "/images/gallery/decks/a.jpg".to_string(),
            0.25,
            "A.JPG".to_string(),
        );
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"file":"/images/gallery/decks/a.jpg","confidence":0.25,"source":"A.JPG"}"#
        );
    }
}
