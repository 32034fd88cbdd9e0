//! Per-item market condition oscillator.
//!
//! Each tick an item flips with probability `max(0, 1 - 0.9 × volatility)`.
//! A flip lands on `Bullish` when `r × sensitivity > 0.65`, otherwise
//! `Bearish`. `Neutral` is seed-only and resolved on the first step.

use types::MarketCondition;

use crate::RandomSource;
use crate::subsystems::WarehouseProfile;

/// Bias threshold a draw scaled by sensitivity must exceed to turn bullish.
pub const BULLISH_THRESHOLD: f64 = 0.65;

/// Flip probability for a warehouse profile, clamped at zero.
pub fn flip_probability(profile: &WarehouseProfile) -> f64 {
    (1.0 - 0.9 * profile.volatility_factor).max(0.0)
}

/// Advance one item's condition by one tick.
pub fn step_condition(
    current: MarketCondition,
    profile: &WarehouseProfile,
    rng: &mut dyn RandomSource,
) -> MarketCondition {
    if current.is_neutral() || rng.chance(flip_probability(profile)) {
        resolve(profile, rng)
    } else {
        current
    }
}

fn resolve(profile: &WarehouseProfile, rng: &mut dyn RandomSource) -> MarketCondition {
    if rng.next_f64() * profile.market_sensitivity > BULLISH_THRESHOLD {
        MarketCondition::Bullish
    } else {
        MarketCondition::Bearish
    }
}
