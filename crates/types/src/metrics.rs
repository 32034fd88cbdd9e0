//! Derived network metrics, factor weights and risk readings.

use serde::{Deserialize, Serialize};

// =============================================================================
// NetworkMetrics
// =============================================================================

/// Aggregates recomputed at the end of every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    /// Σ stock × sell price across the network.
    pub total_value: f64,
    /// Orders per minute (synthetic).
    pub order_rate: u32,
    /// Capacity utilization percentage in `[0, 100]`.
    pub utilization: f64,
    /// Stock turnover rate (synthetic).
    pub turnover_rate: u32,
    /// Average order processing time in minutes.
    pub avg_processing_time: u32,
    /// Cumulative orders (informational).
    pub total_orders: u64,
    /// Capacity used percentage reported by the dashboard header.
    pub capacity_used: f64,
    /// Total stock after the active event's supply skew.
    pub current_stock: u64,
    /// `current_stock` from the previous tick.
    pub previous_stock: u64,
    /// Signed price impact of the active event (0 without one).
    pub market_impact: f64,
}

impl Default for NetworkMetrics {
    fn default() -> Self {
        Self {
            total_value: 0.0,
            order_rate: 50,
            utilization: 0.0,
            turnover_rate: 15,
            avg_processing_time: 45,
            total_orders: 1200,
            capacity_used: 75.0,
            current_stock: 0,
            previous_stock: 0,
            market_impact: 0.0,
        }
    }
}

impl NetworkMetrics {
    /// Percentage change of stock since the previous tick (0 when there is no
    /// previous stock).
    pub fn stock_change_pct(&self) -> f64 {
        if self.previous_stock == 0 {
            return 0.0;
        }
        (self.current_stock as f64 - self.previous_stock as f64) / self.previous_stock as f64
            * 100.0
    }
}

// =============================================================================
// FactorWeights
// =============================================================================

/// Five-factor prediction weighting.
///
/// The five weights are a normalized split of 100, not independent
/// percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorWeights {
    pub historical_price_trends: f64,
    pub trading_volume_analysis: f64,
    pub market_events_impact: f64,
    pub supply_chain_metrics: f64,
    pub technical_indicators: f64,
    /// Portfolio confidence percentage in `[30, 95]`.
    pub confidence: f64,
}

impl FactorWeights {
    /// Build weights from five raw scores, normalizing them to sum to 100.
    ///
    /// Non-finite or negative raw scores count as zero. If nothing remains,
    /// every factor gets an even 20.
    pub fn normalized(raw: [f64; 5], confidence: f64) -> Self {
        let cleaned = raw.map(|v| if v.is_finite() && v > 0.0 { v } else { 0.0 });
        let total: f64 = cleaned.iter().sum();
        let w = if total > 0.0 {
            cleaned.map(|v| v / total * 100.0)
        } else {
            [20.0; 5]
        };
        Self {
            historical_price_trends: w[0],
            trading_volume_analysis: w[1],
            market_events_impact: w[2],
            supply_chain_metrics: w[3],
            technical_indicators: w[4],
            confidence,
        }
    }

    pub fn weights(&self) -> [f64; 5] {
        [
            self.historical_price_trends,
            self.trading_volume_analysis,
            self.market_events_impact,
            self.supply_chain_metrics,
            self.technical_indicators,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.weights().iter().sum()
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self::normalized([0.0; 5], 45.0)
    }
}

// =============================================================================
// RiskMetric
// =============================================================================

/// Names of the radar risk readings, in display order.
pub const RISK_METRIC_NAMES: [&str; 5] = [
    "Volatility",
    "Market Risk",
    "Liquidity",
    "Sentiment",
    "Technical",
];

/// One named risk reading in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetric {
    pub name: String,
    pub value: f64,
}

impl RiskMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
