//! Sentence-level sentiment.

use serde::{Deserialize, Serialize};

/// Sentiment level of a sentence.
///
/// `Unset` is the default and carries no graph label; the remaining levels
/// map through a fixed table to the labels attached at materialization time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLevel {
    #[default]
    Unset,
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl SentimentLevel {
    /// Graph label for this level, or `None` for [`SentimentLevel::Unset`].
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SentimentLevel::Unset => None,
            SentimentLevel::VeryNegative => Some("VeryNegative"),
            SentimentLevel::Negative => Some("Negative"),
            SentimentLevel::Neutral => Some("Neutral"),
            SentimentLevel::Positive => Some("Positive"),
            SentimentLevel::VeryPositive => Some("VeryPositive"),
        }
    }
}
