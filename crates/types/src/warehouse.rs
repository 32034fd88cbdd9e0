//! Warehouse and inventory types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MIN_MARKUP;
use crate::route::GeoPoint;

// =============================================================================
// WarehouseId
// =============================================================================

/// Warehouse identifier as delivered by the data source (e.g. `"1"`).
pub type WarehouseId = String;

// =============================================================================
// MarketCondition
// =============================================================================

/// Per-item market state biasing the direction of price and stock drift.
///
/// `Neutral` only appears in seed data. Once the simulation starts, the
/// oscillator resolves it to `Bullish` or `Bearish` and never returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketCondition {
    Bullish,
    Bearish,
    Neutral,
}

impl MarketCondition {
    /// Direction multiplier used by the tick engine (+1 bullish, -1 otherwise).
    #[inline]
    pub fn direction(self) -> f64 {
        match self {
            MarketCondition::Bullish => 1.0,
            MarketCondition::Bearish | MarketCondition::Neutral => -1.0,
        }
    }

    pub fn is_neutral(self) -> bool {
        matches!(self, MarketCondition::Neutral)
    }
}

impl fmt::Display for MarketCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MarketCondition::Bullish => "Bullish",
            MarketCondition::Bearish => "Bearish",
            MarketCondition::Neutral => "Neutral",
        };
        f.write_str(label)
    }
}

// =============================================================================
// InventoryItem
// =============================================================================

/// One inventory line inside a warehouse.
///
/// `item` is the key within its warehouse. Lines are mutated in place on
/// every tick and never removed during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Item name (unique within a warehouse).
    pub item: String,
    /// Units in stock.
    pub stock: u64,
    /// Purchase price per unit.
    pub buy_price: f64,
    /// Sale price per unit.
    pub sell_price: f64,
    /// Month of record (1-12), informational only.
    pub month: u8,
    /// Current market condition.
    pub market_condition: MarketCondition,
}

impl InventoryItem {
    pub fn new(
        item: impl Into<String>,
        stock: u64,
        buy_price: f64,
        sell_price: f64,
        month: u8,
        market_condition: MarketCondition,
    ) -> Self {
        Self {
            item: item.into(),
            stock,
            buy_price,
            sell_price,
            month,
            market_condition,
        }
    }

    /// Lowest sell price allowed for the current buy price, rounded up to
    /// whole cents so it is itself a valid price.
    #[inline]
    pub fn min_sell_price(&self) -> f64 {
        let buy_cents = (self.buy_price * 100.0).round();
        ((buy_cents * (MIN_MARKUP * 100.0).round()) / 100.0).ceil() / 100.0
    }

    /// Whether the minimum markup currently holds.
    pub fn has_min_markup(&self) -> bool {
        self.sell_price >= self.min_sell_price()
    }

    /// Inventory value at the current sell price.
    pub fn value(&self) -> f64 {
        self.stock as f64 * self.sell_price
    }
}

// =============================================================================
// Warehouse
// =============================================================================

/// A warehouse and its ordered inventory lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub location: String,
    pub coordinates: GeoPoint,
    pub inventory: Vec<InventoryItem>,
}

impl Warehouse {
    pub fn new(
        id: impl Into<WarehouseId>,
        name: impl Into<String>,
        location: impl Into<String>,
        coordinates: GeoPoint,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            coordinates,
            inventory: Vec::new(),
        }
    }

    /// Builder-style inventory append.
    pub fn with_item(mut self, item: InventoryItem) -> Self {
        self.inventory.push(item);
        self
    }

    /// Total units across all lines.
    pub fn total_stock(&self) -> u64 {
        self.inventory.iter().map(|i| i.stock).sum()
    }

    /// Total inventory value at sell price.
    pub fn total_value(&self) -> f64 {
        self.inventory.iter().map(InventoryItem::value).sum()
    }

    pub fn item_mut(&mut self, name: &str) -> Option<&mut InventoryItem> {
        self.inventory.iter_mut().find(|i| i.item == name)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Warehouse {
        Warehouse::new("1", "Mumbai Hub", "Maharashtra", GeoPoint::new(19.076, 72.8777))
            .with_item(InventoryItem::new(
                "Wheat",
                75,
                53.0,
                54.3,
                3,
                MarketCondition::Neutral,
            ))
            .with_item(InventoryItem::new(
                "Rice",
                80,
                32.0,
                36.69,
                10,
                MarketCondition::Bullish,
            ))
    }

    #[test]
    fn test_condition_direction() {
        assert_eq!(MarketCondition::Bullish.direction(), 1.0);
        assert_eq!(MarketCondition::Bearish.direction(), -1.0);
        assert_eq!(MarketCondition::Neutral.direction(), -1.0);
    }

    #[test]
    fn test_warehouse_totals() {
        let w = sample();
        assert_eq!(w.total_stock(), 155);
        let expected = 75.0 * 54.3 + 80.0 * 36.69;
        assert!((w.total_value() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_min_sell_price_is_whole_cents() {
        let item = InventoryItem::new("Wheat", 1, 50.0, 55.0, 1, MarketCondition::Bullish);
        assert_eq!(item.min_sell_price(), 55.0);
        assert!(item.has_min_markup());

        let item = InventoryItem::new("Rice", 1, 1.23, 1.35, 1, MarketCondition::Bullish);
        // 1.23 × 1.10 = 1.353, rounded up to 1.36
        assert_eq!(item.min_sell_price(), 1.36);
        assert!(!item.has_min_markup());
    }

    #[test]
    fn test_min_markup() {
        let w = sample();
        // Seed data may start below the markup floor; the first tick repairs it.
        assert!(!w.inventory[0].has_min_markup());
        assert!(w.inventory[1].has_min_markup());
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = InventoryItem::new("Sugar", 430, 41.0, 45.1, 8, MarketCondition::Bullish);
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"buyPrice\":41.0"));
        assert!(json.contains("\"marketCondition\":\"Bullish\""));
    }
}
