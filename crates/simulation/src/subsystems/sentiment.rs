//! Sentiment aggregator.
//!
//! Runs on its own cadence. Each step random-walks every item's sentiment and
//! confidence, redraws the five-factor weighting, and walks the risk radar.
//! The active event skews all of them through its multiplier `1 ± price_impact`.

use types::{
    FactorWeights, MarketEvent, MarketSentiment, RiskMetric, Trend, metrics::RISK_METRIC_NAMES,
};

use crate::RandomSource;

/// Sentiment is kept within `[SENTIMENT_MIN, 1]`.
pub const SENTIMENT_MIN: f64 = 0.1;

/// Confidence is kept within `[0.2, 0.95]`.
pub const CONFIDENCE_RANGE: (f64, f64) = (0.2, 0.95);

/// Confidence before the first update.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

fn event_multiplier(event: Option<&MarketEvent>) -> f64 {
    event.map_or(1.0, MarketEvent::multiplier)
}

/// Update one item's sentiment reading.
pub fn step_item(
    reading: &mut MarketSentiment,
    event: Option<&MarketEvent>,
    rng: &mut dyn RandomSource,
) {
    let multiplier = event_multiplier(event);
    reading.sentiment =
        ((reading.sentiment + rng.uniform(-0.05, 0.05)) * multiplier).clamp(SENTIMENT_MIN, 1.0);

    reading.trend = if rng.chance(0.5) { Trend::Up } else { Trend::Down };

    let drift = event.map_or(0.0, |e| e.event_type.sign() * 0.05);
    let confidence =
        reading.confidence.unwrap_or(DEFAULT_CONFIDENCE) + drift + rng.uniform(-0.05, 0.05);
    reading.confidence = Some(confidence.clamp(CONFIDENCE_RANGE.0, CONFIDENCE_RANGE.1));
}

/// Portfolio confidence percentage for the current event.
pub fn portfolio_confidence(event: Option<&MarketEvent>) -> f64 {
    let base = if event.is_some_and(|e| e.event_type.is_positive()) {
        75.0
    } else {
        45.0
    };
    f64::clamp(base, 30.0, 95.0)
}

/// Draw a fresh five-factor weighting that sums to 100.
pub fn draw_factors(event: Option<&MarketEvent>, rng: &mut dyn RandomSource) -> FactorWeights {
    let raw = [(); 5].map(|_| rng.uniform(0.0, 100.0));
    FactorWeights::normalized(raw, portfolio_confidence(event))
}

/// Initial risk radar: `U(0, 100) × multiplier`, clamped to `[0, 100]`.
pub fn initial_risk(event: Option<&MarketEvent>, rng: &mut dyn RandomSource) -> Vec<RiskMetric> {
    let multiplier = event_multiplier(event);
    RISK_METRIC_NAMES
        .iter()
        .map(|name| {
            let value = (rng.uniform(0.0, 100.0) * multiplier).clamp(0.0, 100.0);
            RiskMetric::new(*name, value)
        })
        .collect()
}

/// Random-walk every risk reading.
pub fn step_risk(risk: &mut [RiskMetric], event: Option<&MarketEvent>, rng: &mut dyn RandomSource) {
    let multiplier = event_multiplier(event);
    for metric in risk {
        metric.value = ((metric.value + rng.uniform(-5.0, 5.0)) * multiplier).clamp(0.0, 100.0);
    }
}

/// Mean sentiment across items (0 when there are none).
pub fn portfolio_sentiment(readings: &[MarketSentiment]) -> f64 {
    if readings.is_empty() {
        return 0.0;
    }
    readings.iter().map(|r| r.sentiment).sum::<f64>() / readings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScriptedRandom, SeededRandom};
    use types::EventType;

    fn event(ty: EventType, price: f64) -> MarketEvent {
        MarketEvent::new("e", ty, 0.5, price, 0.1, "")
    }

    #[test]
    fn test_step_item_without_event() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut s = MarketSentiment::new("Rice", 0.8, Trend::Stable);
        step_item(&mut s, None, &mut rng);
        assert!((s.sentiment - 0.8).abs() < 1e-12);
        assert_eq!(s.trend, Trend::Down);
        assert!((s.confidence.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_positive_event_stays_in_unit_range() {
        let mut rng = ScriptedRandom::constant(0.99);
        let mut s = MarketSentiment::new("Rice", 0.95, Trend::Up).with_confidence(0.94);
        step_item(&mut s, Some(&event(EventType::Positive, 0.5)), &mut rng);
        assert_eq!(s.sentiment, 1.0);
        assert_eq!(s.confidence, Some(0.95));
    }

    #[test]
    fn test_negative_event_floors() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut s = MarketSentiment::new("Oil", 0.12, Trend::Down).with_confidence(0.21);
        step_item(&mut s, Some(&event(EventType::Negative, 0.9)), &mut rng);
        assert_eq!(s.sentiment, SENTIMENT_MIN);
        assert_eq!(s.confidence, Some(0.2));
        assert_eq!(s.trend, Trend::Up);
    }

    #[test]
    fn test_factors_sum_to_100() {
        let mut rng = SeededRandom::new(5);
        for _ in 0..200 {
            let f = draw_factors(None, &mut rng);
            assert!((f.sum() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_factors_all_zero_draws() {
        let mut rng = ScriptedRandom::constant(0.0);
        let f = draw_factors(None, &mut rng);
        assert_eq!(f.weights(), [20.0; 5]);
    }

    #[test]
    fn test_portfolio_confidence() {
        assert_eq!(portfolio_confidence(None), 45.0);
        assert_eq!(portfolio_confidence(Some(&event(EventType::Positive, 0.1))), 75.0);
        assert_eq!(portfolio_confidence(Some(&event(EventType::Negative, 0.1))), 45.0);
    }

    #[test]
    fn test_risk_stays_in_range() {
        let mut rng = SeededRandom::new(9);
        let e = event(EventType::Positive, 0.8);
        let mut risk = initial_risk(Some(&e), &mut rng);
        assert_eq!(risk.len(), 5);
        for _ in 0..100 {
            step_risk(&mut risk, Some(&e), &mut rng);
            assert!(risk.iter().all(|r| (0.0..=100.0).contains(&r.value)));
        }
    }

    #[test]
    fn test_portfolio_sentiment_empty() {
        assert_eq!(portfolio_sentiment(&[]), 0.0);
        let readings = vec![
            MarketSentiment::new("A", 0.2, Trend::Up),
            MarketSentiment::new("B", 0.6, Trend::Up),
        ];
        assert!((portfolio_sentiment(&readings) - 0.4).abs() < 1e-12);
    }
}
