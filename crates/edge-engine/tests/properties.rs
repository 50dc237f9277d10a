//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Edge triggering: a signal only fires when its raw condition was false on the prior bar
//! 2. Zone capacity: live zones per kind never exceed the configured maximum
//! 3. Status idempotence: reading the dashboard twice yields the same snapshot
//! 4. Determinism: identical inputs produce byte-identical event streams

use edge_core::types::{Bar, Direction, EngineEvent, SessionWindow, ZoneKind};
use edge_engine::{EngineConfig, SignalEngine};
use proptest::prelude::*;

// 2024-01-02 09:00 New York
const START: i64 = 1_704_204_000_000;
const FIVE_MINUTES: i64 = 5 * 60_000;

// ── Strategies (proptest) ────────────────────────────────────────────

/// (close change, wick size, body fraction, volume)
fn arb_step() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (-1.0..1.0_f64, 0.01..1.5_f64, -1.0..1.0_f64, 100.0..5000.0_f64)
}

fn arb_bars(max: usize) -> impl Strategy<Value = Vec<Bar>> {
    prop::collection::vec(arb_step(), 1..max).prop_map(|steps| {
        let mut close = 100.0;
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (change, wick, body, volume))| {
                let open = close;
                close = (close + change).max(1.0);
                let open = open + (close - open) * (1.0 - body.abs());
                let high = open.max(close) + wick;
                let low = (open.min(close) - wick).max(0.5);
                Bar::new(START + i as i64 * FIVE_MINUTES, open, high, low, close, volume)
            })
            .collect()
    })
}

/// Short windows so random walks leave warm-up quickly.
fn small_config() -> EngineConfig {
    EngineConfig {
        fast_length: 3,
        slow_length: 8,
        rsi_length: 5,
        consolidation_lookback: 5,
        consolidation_ma_pct: 0.01,
        consolidation_range_pct: 0.05,
        volume_length: 5,
        body_length: 5,
        atr_length: 5,
        pivot_left: 2,
        pivot_right: 2,
        max_zones_per_kind: 2,
        zone_height_ticks: 50.0,
        session_window: "0000-2359".parse::<SessionWindow>().unwrap(),
        ..Default::default()
    }
}

fn replay(bars: &[Bar]) -> String {
    let mut engine = SignalEngine::new(small_config()).unwrap();
    let mut events: Vec<EngineEvent> = Vec::new();
    for bar in bars {
        events.extend(engine.ingest(bar).unwrap().events);
    }
    serde_json::to_string(&events).unwrap()
}

// ── 1. Edge triggering ───────────────────────────────────────────────

proptest! {
    /// At most one signal per bar, and only on a rising edge of its raw condition.
    #[test]
    fn signals_are_edge_triggered(bars in arb_bars(300)) {
        let mut engine = SignalEngine::new(small_config()).unwrap();
        let mut prev_raw = (false, false);

        for bar in &bars {
            let output = engine.ingest(bar).unwrap();
            let signals: Vec<_> = output
                .events
                .iter()
                .filter(|e| matches!(e, EngineEvent::Signal(_)))
                .collect();
            prop_assert!(signals.len() <= 1);

            if let Some(signal) = output.signal() {
                match signal.direction {
                    Direction::Long => {
                        prop_assert!(output.raw_long);
                        prop_assert!(!prev_raw.0);
                    }
                    Direction::Short => {
                        prop_assert!(output.raw_short);
                        prop_assert!(!prev_raw.1);
                    }
                }
                prop_assert!(output.snapshot.warm);
                prop_assert!(!output.trend.is_consolidating);
            }
            prev_raw = (output.raw_long, output.raw_short);
        }
    }

    // ── 2. Zone capacity ─────────────────────────────────────────────

    /// Live zones per kind stay within the configured maximum after every bar.
    #[test]
    fn zone_count_is_bounded(bars in arb_bars(300)) {
        let config = small_config();
        let max = config.max_zones_per_kind;
        let mut engine = SignalEngine::new(config).unwrap();

        for bar in &bars {
            engine.ingest(bar).unwrap();
            let status = engine.status();
            prop_assert!(status.supply_zones <= max);
            prop_assert!(status.demand_zones <= max);
            prop_assert_eq!(status.supply_zones, engine.zones(ZoneKind::Supply).count());

            for zone in engine.zones(ZoneKind::Supply).chain(engine.zones(ZoneKind::Demand)) {
                prop_assert!(zone.top > zone.bottom);
            }
        }
    }

    // ── 3. Status idempotence ────────────────────────────────────────

    /// Reading the dashboard never changes it.
    #[test]
    fn status_is_idempotent(bars in arb_bars(120)) {
        let mut engine = SignalEngine::new(small_config()).unwrap();
        for bar in &bars {
            engine.ingest(bar).unwrap();
            let first = engine.status();
            let second = engine.status();
            prop_assert_eq!(first, second);
        }
    }

    // ── 4. Determinism ───────────────────────────────────────────────

    /// Two fresh engines fed the same bars emit byte-identical events.
    #[test]
    fn replay_is_deterministic(bars in arb_bars(200)) {
        prop_assert_eq!(replay(&bars), replay(&bars));
    }

    /// A rejected bar leaves the following event stream unchanged.
    #[test]
    fn rejected_bars_do_not_disturb_state(bars in arb_bars(120), dup in 0usize..120) {
        let mut clean = SignalEngine::new(small_config()).unwrap();
        let mut noisy = SignalEngine::new(small_config()).unwrap();
        let dup = dup % bars.len();

        for (i, bar) in bars.iter().enumerate() {
            let expected = clean.ingest(bar).unwrap();
            let actual = noisy.ingest(bar).unwrap();
            prop_assert_eq!(expected, actual);
            if i == dup {
                prop_assert!(noisy.ingest(bar).is_err());
            }
        }
        prop_assert_eq!(clean.status(), noisy.status());
    }
}
