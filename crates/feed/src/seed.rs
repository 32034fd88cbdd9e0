//! Built-in dashboard seed data.

use async_trait::async_trait;
use types::{
    GeoPoint, InventoryItem, MarketCondition, MarketEvent, MarketSentiment, Trend, Warehouse,
};

use crate::{DataFetchError, DataSource};

/// In-process data source serving the default dashboard dataset.
#[derive(Debug, Clone, Default)]
pub struct SeedDataSource;

impl SeedDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for SeedDataSource {
    fn name(&self) -> &str {
        "seed"
    }

    async fn fetch_warehouses(&self) -> Result<Vec<Warehouse>, DataFetchError> {
        Ok(seed_warehouses())
    }

    async fn fetch_market_events(&self) -> Result<Vec<MarketEvent>, DataFetchError> {
        Ok(events::builtin::builtin_events())
    }

    async fn fetch_sentiment(&self) -> Result<Vec<MarketSentiment>, DataFetchError> {
        Ok(seed_sentiment())
    }
}

/// The five seed warehouses.
pub fn seed_warehouses() -> Vec<Warehouse> {
    use MarketCondition::{Bearish, Bullish, Neutral};

    vec![
        Warehouse::new("1", "Mumbai Hub", "Maharashtra", GeoPoint::new(19.0760, 72.8777))
            .with_item(InventoryItem::new("Wheat", 75, 53.0, 54.3, 3, Neutral))
            .with_item(InventoryItem::new("Rice", 80, 32.0, 36.69, 10, Bullish)),
        Warehouse::new("2", "Delhi Center", "Delhi", GeoPoint::new(28.6139, 77.2090))
            .with_item(InventoryItem::new("Wheat", 742, 53.0, 43.32, 7, Bearish))
            .with_item(InventoryItem::new("Sugar", 764, 43.0, 44.19, 4, Neutral)),
        Warehouse::new("3", "Bangalore Depot", "Karnataka", GeoPoint::new(12.9716, 77.5946))
            .with_item(InventoryItem::new("Rice", 624, 36.0, 33.48, 9, Bearish))
            .with_item(InventoryItem::new("Electronics", 275, 8679.0, 7426.08, 1, Bearish)),
        Warehouse::new("4", "Kolkata Hub", "West Bengal", GeoPoint::new(22.5726, 88.3639))
            .with_item(InventoryItem::new("Rice", 520, 34.0, 35.8, 5, Neutral))
            .with_item(InventoryItem::new("Sugar", 430, 41.0, 43.5, 8, Bullish)),
        Warehouse::new("5", "Chennai Center", "Tamil Nadu", GeoPoint::new(13.0827, 80.2707))
            .with_item(InventoryItem::new("Electronics", 180, 8450.0, 8890.0, 2, Bullish))
            .with_item(InventoryItem::new("Wheat", 320, 51.0, 53.8, 6, Neutral)),
    ]
}

/// Seed sentiment for the four traded items.
pub fn seed_sentiment() -> Vec<MarketSentiment> {
    vec![
        MarketSentiment::new("Wheat", 0.6, Trend::Down),
        MarketSentiment::new("Rice", 0.8, Trend::Up),
        MarketSentiment::new("Electronics", 0.3, Trend::Down),
        MarketSentiment::new("Sugar", 0.5, Trend::Stable),
    ]
}
