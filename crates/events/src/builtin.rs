//! Default market event catalog.

use types::{EventType, MarketEvent};

use crate::MarketEventCatalog;

impl MarketEventCatalog {
    /// Catalog used when no external data API is configured.
    pub fn builtin() -> Self {
        Self::from_events(builtin_events())
    }
}

/// The built-in market events, positive ones first.
pub fn builtin_events() -> Vec<MarketEvent> {
    use EventType::{Negative, Positive};

    vec![
        MarketEvent::new(
            "bumper_harvest",
            Positive,
            0.85,
            0.15,
            0.25,
            "Record monsoon yields lift grain supply across the network",
        ),
        MarketEvent::new(
            "festival_demand",
            Positive,
            0.75,
            0.20,
            0.10,
            "Festival season drives strong retail demand",
        ),
        MarketEvent::new(
            "export_subsidy",
            Positive,
            0.70,
            0.12,
            0.08,
            "Government announces export subsidies for agricultural goods",
        ),
        MarketEvent::new(
            "port_strike",
            Negative,
            0.25,
            0.18,
            0.30,
            "Dock workers strike at major ports, inbound shipments stall",
        ),
        MarketEvent::new(
            "drought",
            Negative,
            0.20,
            0.25,
            0.35,
            "Failed monsoon cuts crop output in key producing states",
        ),
        MarketEvent::new(
            "chip_shortage",
            Negative,
            0.30,
            0.22,
            0.20,
            "Global semiconductor shortage constrains electronics supply",
        ),
        MarketEvent::new(
            "fuel_price_hike",
            Negative,
            0.35,
            0.10,
            0.12,
            "Diesel price increase raises transport costs",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_both_sides() {
        let catalog = MarketEventCatalog::builtin();
        let (pos, neg) = catalog.partition();
        assert!(!pos.is_empty());
        assert!(!neg.is_empty());
        assert_eq!(catalog.len(), builtin_events().len());
    }

    #[test]
    fn test_builtin_magnitudes_in_range() {
        for e in MarketEventCatalog::builtin().list_events() {
            for v in [e.sentiment_score, e.price_impact, e.supply_impact] {
                assert!((0.0..=1.0).contains(&v), "{} out of range", e.event_id);
            }
        }
    }
}
