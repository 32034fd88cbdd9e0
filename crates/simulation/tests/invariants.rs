//! Property tests for the per-tick invariants.
//!
//! Stock never goes negative, the sell price always carries the minimum
//! markup, and factor weights always sum to 100.

use events::MarketEventCatalog;
use proptest::prelude::*;
use simulation::subsystems::inventory;
use simulation::{SeededRandom, Simulation, WarehouseProfile};
use types::{EventType, FactorWeights, InventoryItem, MIN_BUY_PRICE, MIN_MARKUP, MarketCondition, MarketEvent};

fn condition() -> impl Strategy<Value = MarketCondition> {
    prop_oneof![
        Just(MarketCondition::Bullish),
        Just(MarketCondition::Bearish),
        Just(MarketCondition::Neutral),
    ]
}

fn event() -> impl Strategy<Value = Option<MarketEvent>> {
    prop::option::of(
        (any::<bool>(), 0.0..=1.0_f64, 0.0..=1.0_f64).prop_map(|(positive, price, supply)| {
            let event_type = if positive {
                EventType::Positive
            } else {
                EventType::Negative
            };
            MarketEvent::new("prop", event_type, 0.5, price, supply, "generated")
        }),
    )
}

proptest! {
    #[test]
    fn prop_item_tick_keeps_invariants(
        stock in 0u64..5_000,
        buy in 1.0..500.0_f64,
        markup in 1.10..2.0_f64,
        condition in condition(),
        volatility in 0.85..1.15_f64,
        sensitivity in 0.8..1.2_f64,
        event in event(),
        seed in any::<u64>(),
        ticks in 1usize..200,
    ) {
        let mut item = InventoryItem::new("Wheat", stock, buy, buy * markup, 1, condition);
        let profile = WarehouseProfile { volatility_factor: volatility, market_sensitivity: sensitivity };
        let mut rng = SeededRandom::new(seed);

        for _ in 0..ticks {
            item.market_condition = simulation::subsystems::oscillator::step_condition(
                item.market_condition, &profile, &mut rng,
            );
            inventory::apply_tick(&mut item, &profile, event.as_ref(), &mut rng);

            prop_assert!(item.buy_price >= MIN_BUY_PRICE);
            prop_assert!(item.has_min_markup(),
                "sell {} below markup floor for buy {}", item.sell_price, item.buy_price);
            prop_assert!(item.sell_price >= item.buy_price * MIN_MARKUP - 1e-9);
            prop_assert!(item.stock < u64::MAX / 2, "stock wrapped: {}", item.stock);
        }
    }

    #[test]
    fn prop_factor_weights_sum_to_100(
        raw in prop::array::uniform5(-10.0..100.0_f64),
        confidence in 0.0..1.0_f64,
    ) {
        let factors = FactorWeights::normalized(raw, confidence);
        prop_assert!((factors.sum() - 100.0).abs() < 1e-9, "sum = {}", factors.sum());
    }

    #[test]
    fn prop_seeded_run_keeps_invariants(
        seed in any::<u64>(),
        ticks in 1u64..120,
        event_index in prop::option::of(0usize..7),
    ) {
        let mut sim = Simulation::with_seed_data(seed);
        if let Some(index) = event_index {
            let ids: Vec<String> = MarketEventCatalog::builtin()
                .list_events()
                .iter()
                .map(|e| e.event_id.clone())
                .collect();
            sim.toggle_event(&ids[index % ids.len()]).unwrap();
        }

        for _ in 0..ticks {
            sim.step();
            sim.step_sentiment();
        }

        let snapshot = sim.snapshot();
        for warehouse in &snapshot.warehouses {
            for item in &warehouse.inventory {
                prop_assert!(item.has_min_markup());
                prop_assert!(!item.market_condition.is_neutral());
            }
        }
        prop_assert!((snapshot.factors.sum() - 100.0).abs() < 1e-9);
        prop_assert!((0.0..=100.0).contains(&snapshot.metrics.utilization));
        for reading in &snapshot.sentiment {
            prop_assert!((0.1..=1.0).contains(&reading.sentiment));
        }
    }
}
