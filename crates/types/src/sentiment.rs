//! Market sentiment readings.

use serde::{Deserialize, Serialize};

/// Short-term direction of a sentiment reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    #[serde(alias = "neutral")]
    Stable,
}

/// Sentiment for one traded item.
///
/// Recomputed on every sentiment cadence; each value depends on the previous
/// one plus noise plus the active event's skew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSentiment {
    pub item: String,
    /// Sentiment in `[0, 1]`.
    pub sentiment: f64,
    #[serde(default)]
    pub trend: Trend,
    /// Confidence in `[0, 1]`; absent until the first update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl MarketSentiment {
    pub fn new(item: impl Into<String>, sentiment: f64, trend: Trend) -> Self {
        Self {
            item: item.into(),
            sentiment,
            trend,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}
