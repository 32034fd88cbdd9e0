//! Warehouse inventory drift and network aggregates.
//!
//! # Per-Item Tick
//!
//! ```text
//! market_factor = direction(condition) × sensitivity
//! event_impact  = ±price_impact × volatility        (0 without an event)
//!
//! stock += (floor(U(-3, 5) × vf) + event_impact × 15) × market_factor
//! buy   += U(-1.5, 1.5) × vf × market_factor + event_impact × buy × 0.15
//! sell  += U(-1.75, 1.75) × vf × market_factor + event_impact × sell × 0.18
//! ```
//!
//! Stock is rounded to whole units and floored at 0. Prices are rounded to
//! cents, buy is floored at 1 and sell at `buy × 1.10` rounded up to a cent.
//! Items fed by the live channel skip the stock line.

use types::{InventoryItem, MIN_BUY_PRICE, MarketEvent, NetworkMetrics, Warehouse};

use crate::RandomSource;

// =============================================================================
// WarehouseProfile
// =============================================================================

/// Per-warehouse constants drawn once at load.
///
/// Kept across reset so a restored run draws with the same profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarehouseProfile {
    /// Noise amplitude multiplier in `[0.85, 1.15)`.
    pub volatility_factor: f64,
    /// Direction strength multiplier in `[0.8, 1.2)`.
    pub market_sensitivity: f64,
}

impl WarehouseProfile {
    /// Draw a fresh profile.
    pub fn draw(rng: &mut dyn RandomSource) -> Self {
        let volatility_factor = rng.uniform(0.85, 1.15);
        let market_sensitivity = rng.uniform(0.8, 1.2);
        Self {
            volatility_factor,
            market_sensitivity,
        }
    }
}

impl Default for WarehouseProfile {
    fn default() -> Self {
        Self {
            volatility_factor: 1.0,
            market_sensitivity: 1.0,
        }
    }
}

// =============================================================================
// Per-Item Update
// =============================================================================

/// Apply one tick of stock and price drift to an item.
///
/// The item's market condition must already have been stepped.
pub fn apply_tick(
    item: &mut InventoryItem,
    profile: &WarehouseProfile,
    event: Option<&MarketEvent>,
    rng: &mut dyn RandomSource,
) {
    let (market_factor, event_impact) = tick_factors(item, profile, event);

    let stock_delta = ((rng.uniform(-3.0, 5.0) * profile.volatility_factor).floor()
        + event_impact * 15.0)
        * market_factor;
    item.stock = apply_stock_delta(item.stock, stock_delta);

    drift_prices(item, profile, market_factor, event_impact, rng);
}

/// Price-only tick for an item whose stock is fed by the live channel.
pub fn apply_price_tick(
    item: &mut InventoryItem,
    profile: &WarehouseProfile,
    event: Option<&MarketEvent>,
    rng: &mut dyn RandomSource,
) {
    let (market_factor, event_impact) = tick_factors(item, profile, event);
    drift_prices(item, profile, market_factor, event_impact, rng);
}

fn tick_factors(
    item: &InventoryItem,
    profile: &WarehouseProfile,
    event: Option<&MarketEvent>,
) -> (f64, f64) {
    let market_factor = item.market_condition.direction() * profile.market_sensitivity;
    let event_impact = event.map_or(0.0, |e| e.signed_price_impact() * profile.volatility_factor);
    (market_factor, event_impact)
}

fn drift_prices(
    item: &mut InventoryItem,
    profile: &WarehouseProfile,
    market_factor: f64,
    event_impact: f64,
    rng: &mut dyn RandomSource,
) {
    let vf = profile.volatility_factor;

    let buy_delta =
        rng.uniform(-1.5, 1.5) * vf * market_factor + event_impact * item.buy_price * 0.15;
    item.buy_price = round_cents(item.buy_price + buy_delta).max(MIN_BUY_PRICE);

    let sell_delta =
        rng.uniform(-1.75, 1.75) * vf * market_factor + event_impact * item.sell_price * 0.18;
    item.sell_price = round_cents(item.sell_price + sell_delta).max(item.min_sell_price());
}

/// Add a fractional delta to a stock count, rounding to the nearest unit.
#[inline]
pub fn apply_stock_delta(stock: u64, delta: f64) -> u64 {
    let next = (stock as f64 + delta).round();
    if next.is_nan() || next <= 0.0 {
        0
    } else {
        next as u64
    }
}

#[inline]
pub fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// =============================================================================
// Aggregates
// =============================================================================

/// Total stock after the active event's supply skew.
///
/// `floor(total × (1 ± supply_impact))`, or `total` without an event.
pub fn adjusted_total_stock(total: u64, event: Option<&MarketEvent>) -> u64 {
    match event {
        Some(e) => {
            let adjusted = (total as f64 * (1.0 + e.signed_supply_impact())).floor();
            if adjusted <= 0.0 { 0 } else { adjusted as u64 }
        }
        None => total,
    }
}

/// Utilization percentage, capped at 100.
pub fn utilization(stock: u64, capacity: u64) -> f64 {
    (stock as f64 / capacity.max(1) as f64 * 100.0).min(100.0)
}

/// Recompute the stock-derived aggregates without touching synthetic rates.
///
/// Used after live snapshots and as the deterministic half of a tick.
pub fn recompute_stock_aggregates(
    metrics: &mut NetworkMetrics,
    warehouses: &[Warehouse],
    event: Option<&MarketEvent>,
    capacity: u64,
) {
    let total: u64 = warehouses.iter().map(Warehouse::total_stock).sum();
    let adjusted = adjusted_total_stock(total, event);

    metrics.current_stock = adjusted;
    metrics.total_value = warehouses.iter().map(Warehouse::total_value).sum();
    metrics.utilization = utilization(adjusted, capacity);
    metrics.market_impact = event.map_or(0.0, MarketEvent::signed_price_impact);
}

/// End-of-tick aggregate update.
pub fn update_metrics(
    metrics: &mut NetworkMetrics,
    warehouses: &[Warehouse],
    event: Option<&MarketEvent>,
    capacity: u64,
    rng: &mut dyn RandomSource,
) {
    metrics.previous_stock = metrics.current_stock;
    recompute_stock_aggregates(metrics, warehouses, event, capacity);
    metrics.order_rate = (45.0 + rng.next_f64() * 20.0).floor() as u32;
    metrics.turnover_rate = (10.0 + rng.next_f64() * 10.0).floor() as u32;
}

/// Metrics shown before the first tick: configured rates plus stock aggregates.
pub fn initial_metrics(
    base: &NetworkMetrics,
    warehouses: &[Warehouse],
    capacity: u64,
) -> NetworkMetrics {
    let mut metrics = base.clone();
    recompute_stock_aggregates(&mut metrics, warehouses, None, capacity);
    metrics.previous_stock = metrics.current_stock;
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScriptedRandom, SeededRandom};
    use types::{EventType, GeoPoint, MarketCondition};

    fn item(condition: MarketCondition) -> InventoryItem {
        InventoryItem::new("Wheat", 100, 50.0, 55.0, 3, condition)
    }

    fn negative(supply: f64, price: f64) -> MarketEvent {
        MarketEvent::new("drought", EventType::Negative, 0.2, price, supply, "")
    }

    #[test]
    fn test_bullish_tick_with_midpoint_draws() {
        // U(-3,5) at 0.5 = 1, U(-1.5,1.5) = 0, U(-1.75,1.75) = 0
        let mut rng = ScriptedRandom::constant(0.5);
        let mut it = item(MarketCondition::Bullish);
        apply_tick(&mut it, &WarehouseProfile::default(), None, &mut rng);
        assert_eq!(it.stock, 101);
        assert_eq!(it.buy_price, 50.0);
        assert_eq!(it.sell_price, 55.0);
    }

    #[test]
    fn test_price_tick_leaves_stock() {
        let event = MarketEvent::new("boom", EventType::Positive, 0.9, 0.2, 0.1, "");
        let mut rng = ScriptedRandom::constant(0.5);
        let mut it = item(MarketCondition::Bullish);
        apply_price_tick(&mut it, &WarehouseProfile::default(), Some(&event), &mut rng);
        assert_eq!(it.stock, 100);
        assert_eq!(it.buy_price, 51.5);
        assert_eq!(it.sell_price, 56.98);
    }

    #[test]
    fn test_markup_floor_rounds_up_to_cents() {
        // Prices unchanged at the midpoint, then floored to 1.36 (1.23 × 1.10 = 1.353)
        let mut rng = ScriptedRandom::constant(0.5);
        let mut it = InventoryItem::new("Salt", 10, 1.23, 1.30, 1, MarketCondition::Bullish);
        apply_tick(&mut it, &WarehouseProfile::default(), None, &mut rng);
        assert_eq!(it.sell_price, 1.36);
    }

    #[test]
    fn test_bearish_tick_reverses_direction() {
        let mut rng = ScriptedRandom::constant(0.5);
        let mut it = item(MarketCondition::Bearish);
        apply_tick(&mut it, &WarehouseProfile::default(), None, &mut rng);
        assert_eq!(it.stock, 99);
    }

    #[test]
    fn test_stock_floors_at_zero() {
        assert_eq!(apply_stock_delta(2, -7.5), 0);
        assert_eq!(apply_stock_delta(2, f64::NAN), 0);
        assert_eq!(apply_stock_delta(10, 2.5), 13);
    }

    #[test]
    fn test_buy_floor_and_markup() {
        let mut rng = ScriptedRandom::constant(0.0);
        let mut it = InventoryItem::new("Sugar", 0, 1.2, 1.3, 1, MarketCondition::Bullish);
        apply_tick(&mut it, &WarehouseProfile::default(), None, &mut rng);
        assert_eq!(it.stock, 0);
        assert_eq!(it.buy_price, MIN_BUY_PRICE);
        assert!(it.has_min_markup());
    }

    #[test]
    fn test_event_pushes_prices() {
        // Positive event on a bullish item raises both prices
        let event = MarketEvent::new("boom", EventType::Positive, 0.9, 0.2, 0.1, "");
        let mut rng = ScriptedRandom::constant(0.5);
        let mut it = item(MarketCondition::Bullish);
        apply_tick(&mut it, &WarehouseProfile::default(), Some(&event), &mut rng);
        assert_eq!(it.buy_price, 51.5);
        assert_eq!(it.sell_price, 56.98);
        // (1 + 0.2 × 15) × 1 = 4
        assert_eq!(it.stock, 104);
    }

    #[test]
    fn test_adjusted_total_negative_event() {
        let event = negative(0.2, 0.1);
        assert_eq!(adjusted_total_stock(1000, Some(&event)), 800);
        assert_eq!(adjusted_total_stock(1000, None), 1000);
    }

    #[test]
    fn test_utilization_caps() {
        assert_eq!(utilization(20_000, 10_000), 100.0);
        assert_eq!(utilization(2_500, 10_000), 25.0);
        assert_eq!(utilization(10, 0), 100.0);
    }

    #[test]
    fn test_update_metrics() {
        let w = Warehouse::new("1", "A", "X", GeoPoint::new(0.0, 0.0))
            .with_item(InventoryItem::new("Rice", 600, 30.0, 40.0, 1, MarketCondition::Bullish))
            .with_item(InventoryItem::new("Wheat", 400, 50.0, 60.0, 1, MarketCondition::Bearish));
        let event = negative(0.2, 0.3);
        let mut metrics = NetworkMetrics {
            current_stock: 900,
            ..Default::default()
        };
        let mut rng = ScriptedRandom::constant(0.5);

        update_metrics(&mut metrics, &[w], Some(&event), 10_000, &mut rng);

        assert_eq!(metrics.previous_stock, 900);
        assert_eq!(metrics.current_stock, 800);
        assert!((metrics.total_value - 48_000.0).abs() < 1e-9);
        assert!((metrics.utilization - 8.0).abs() < 1e-9);
        assert_eq!(metrics.order_rate, 55);
        assert_eq!(metrics.turnover_rate, 15);
        assert!((metrics.market_impact + 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_profile_ranges() {
        let mut rng = SeededRandom::new(11);
        for _ in 0..500 {
            let p = WarehouseProfile::draw(&mut rng);
            assert!((0.85..1.15).contains(&p.volatility_factor));
            assert!((0.8..1.2).contains(&p.market_sensitivity));
        }
    }
}
