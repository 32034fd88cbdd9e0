//! The market event catalog.

use std::collections::HashSet;

use types::{EventType, MarketEvent};

/// Immutable list of market events, loaded once at startup.
///
/// Magnitudes are clamped into `[0, 1]` on load and ids are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketEventCatalog {
    events: Vec<MarketEvent>,
}

impl MarketEventCatalog {
    /// Build a catalog from fetched events.
    ///
    /// Out-of-range magnitudes are clamped. Duplicate ids keep the first
    /// occurrence.
    pub fn from_events(events: impl IntoIterator<Item = MarketEvent>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for event in events {
            if !seen.insert(event.event_id.clone()) {
                tracing::warn!(event_id = %event.event_id, "Duplicate market event id dropped");
                continue;
            }
            let clamped = event.clone().clamped();
            if clamped != event {
                tracing::warn!(event_id = %event.event_id, "Market event magnitudes clamped into [0, 1]");
            }
            kept.push(clamped);
        }
        Self { events: kept }
    }

    /// All events in load order.
    pub fn list_events(&self) -> &[MarketEvent] {
        &self.events
    }

    pub fn get(&self, event_id: &str) -> Option<&MarketEvent> {
        self.events.iter().find(|e| e.event_id == event_id)
    }

    /// Split events into `(positive, negative)` for display, preserving order.
    pub fn partition(&self) -> (Vec<&MarketEvent>, Vec<&MarketEvent>) {
        self.events
            .iter()
            .partition(|e| e.event_type == EventType::Positive)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, ty: EventType, price: f64) -> MarketEvent {
        MarketEvent {
            event_id: id.to_string(),
            event_type: ty,
            sentiment_score: 0.5,
            price_impact: price,
            supply_impact: 0.1,
            description: String::new(),
        }
    }

    #[test]
    fn test_from_events_clamps_and_dedups() {
        let catalog = MarketEventCatalog::from_events(vec![
            event("harvest", EventType::Positive, 1.5),
            event("strike", EventType::Negative, 0.2),
            event("harvest", EventType::Negative, 0.3),
        ]);
        assert_eq!(catalog.len(), 2);
        let harvest = catalog.get("harvest").unwrap();
        assert_eq!(harvest.price_impact, 1.0);
        assert_eq!(harvest.event_type, EventType::Positive);
    }

    #[test]
    fn test_partition_preserves_order() {
        let catalog = MarketEventCatalog::from_events(vec![
            event("a", EventType::Negative, 0.1),
            event("b", EventType::Positive, 0.1),
            event("c", EventType::Negative, 0.1),
        ]);
        let (pos, neg) = catalog.partition();
        assert_eq!(pos.len(), 1);
        let neg_ids: Vec<_> = neg.iter().map(|e| e.event_id.as_str()).collect();
        assert_eq!(neg_ids, vec!["a", "c"]);
    }

    #[test]
    fn test_get_missing() {
        let catalog = MarketEventCatalog::default();
        assert!(catalog.get("nope").is_none());
        assert!(catalog.is_empty());
    }
}
