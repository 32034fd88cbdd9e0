//! Market event types.
//!
//! A [`MarketEvent`] is an exogenous shock (harvest surplus, port strike, ...)
//! with sentiment, price and supply impact magnitudes. The sign of every
//! impact comes from the [`EventType`], never from the magnitude.

use serde::{Deserialize, Serialize};

/// Direction of a market event. There is no neutral event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Positive,
    Negative,
}

impl EventType {
    /// +1 for positive events, -1 for negative ones.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            EventType::Positive => 1.0,
            EventType::Negative => -1.0,
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, EventType::Positive)
    }
}

/// A named catalog entry. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    /// Unique event identifier (snake_case, e.g. `"port_strike"`).
    pub event_id: String,

    /// Positive or negative shock.
    #[serde(rename = "type")]
    pub event_type: EventType,

    /// Sentiment strength (0.0 to 1.0).
    pub sentiment_score: f64,

    /// Fractional price impact magnitude (0.0 to 1.0).
    pub price_impact: f64,

    /// Fractional supply impact magnitude (0.0 to 1.0).
    pub supply_impact: f64,

    /// Human-readable description.
    pub description: String,
}

impl MarketEvent {
    /// Create a new event, clamping all magnitudes into `[0, 1]`.
    pub fn new(
        event_id: impl Into<String>,
        event_type: EventType,
        sentiment_score: f64,
        price_impact: f64,
        supply_impact: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type,
            sentiment_score,
            price_impact,
            supply_impact,
            description: description.into(),
        }
        .clamped()
    }

    /// Return a copy with magnitudes clamped into `[0, 1]`.
    ///
    /// NaN magnitudes collapse to zero.
    pub fn clamped(mut self) -> Self {
        self.sentiment_score = unit(self.sentiment_score);
        self.price_impact = unit(self.price_impact);
        self.supply_impact = unit(self.supply_impact);
        self
    }

    /// Multiplier applied to sentiment-style readings (`1 ± price_impact`).
    pub fn multiplier(&self) -> f64 {
        1.0 + self.event_type.sign() * self.price_impact
    }

    /// Signed price impact (`+price_impact` or `-price_impact`).
    pub fn signed_price_impact(&self) -> f64 {
        self.event_type.sign() * self.price_impact
    }

    /// Signed supply impact (`+supply_impact` or `-supply_impact`).
    pub fn signed_supply_impact(&self) -> f64 {
        self.event_type.sign() * self.supply_impact
    }

    /// Display title derived from the id (`port_strike` -> `PORT STRIKE`).
    pub fn title(&self) -> String {
        self.event_id.split('_').collect::<Vec<_>>().join(" ").to_uppercase()
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
