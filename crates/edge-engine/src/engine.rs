//! Per-symbol signal engine.
//!
//! `SignalEngine` owns every component's state and threads each bar
//! through them in a fixed order:
//!
//! 1. Indicator core
//! 2. Trend and consolidation classifier
//! 3. ORB state machine
//! 4. Zone registry
//! 5. Signal composer, then target/stop levels for an emitted signal
//!
//! A bar is either fully processed or rejected with the engine untouched.

use edge_core::error::EngineError;
use edge_core::types::{
    Bar, ChopEvent, Direction, EngineEvent, Killzone, SessionClock, SignalEvent, ZoneKind,
};
use edge_indicators::{IndicatorCore, IndicatorSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::composer::{ComposerInput, SignalComposer};
use crate::config::EngineConfig;
use crate::orb::{OrbState, OrbTracker};
use crate::status::{DashboardSnapshot, OrbSummary, RsiZone};
use crate::targets::TargetCalculator;
use crate::trend::{TrendClassifier, TrendState};
use crate::zones::{Zone, ZoneRegistry};

/// Volume above this multiple of its average tags a signal as high-volume.
pub const HIGH_VOLUME_MULT: f64 = 1.5;

/// Everything produced by one `ingest` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarOutput {
    pub bar_index: u64,
    pub snapshot: IndicatorSnapshot,
    pub trend: TrendState,
    /// Gated, pre-dedup signal conditions
    pub raw_long: bool,
    pub raw_short: bool,
    /// Events in emission order: chop, ORB, zone, signal
    pub events: Vec<EngineEvent>,
}

impl BarOutput {
    /// The signal emitted on this bar, if any.
    pub fn signal(&self) -> Option<&SignalEvent> {
        self.events.iter().find_map(|event| match event {
            EngineEvent::Signal(signal) => Some(signal),
            _ => None,
        })
    }
}

/// Streaming signal engine for one symbol and timeframe.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: EngineConfig,
    clock: SessionClock,
    indicators: IndicatorCore,
    classifier: TrendClassifier,
    orb: OrbTracker,
    zones: ZoneRegistry,
    composer: SignalComposer,
    targets: TargetCalculator,
    bars_processed: u64,
    last_timestamp: Option<i64>,
    trend: TrendState,
    last_signal: Option<Direction>,
}

impl SignalEngine {
    /// Build an engine. Fails if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;

        let clock = SessionClock::new(config.utc_offset_minutes);
        Ok(Self {
            clock,
            indicators: IndicatorCore::new(config.indicator_settings()),
            classifier: TrendClassifier::new(
                config.consolidation_ma_pct,
                config.consolidation_range_pct,
                config.consolidation_lookback,
            ),
            orb: OrbTracker::new(
                clock,
                config.orb_window,
                config.orb_momentum_hold,
                config.retest_tolerance_pct,
                config.max_retest_bars,
            ),
            zones: ZoneRegistry::new(
                config.pivot_left,
                config.pivot_right,
                config.zone_height(),
                config.max_zones_per_kind,
            ),
            composer: SignalComposer::new(config.body_strength_mult),
            targets: TargetCalculator::new(config.profit_factor, config.stop_factor),
            bars_processed: 0,
            last_timestamp: None,
            trend: TrendState::default(),
            last_signal: None,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ingest the next bar.
    ///
    /// Rejects out-of-order or duplicate timestamps and malformed bars
    /// without touching any state.
    pub fn ingest(&mut self, bar: &Bar) -> Result<BarOutput, EngineError> {
        bar.validate()?;
        if let Some(previous) = self.last_timestamp {
            if bar.timestamp <= previous {
                return Err(EngineError::OutOfOrderBar {
                    timestamp: bar.timestamp,
                    previous,
                });
            }
        }
        let Some(minute) = self.clock.minute_of_day(bar.timestamp) else {
            return Err(EngineError::InvalidBar(format!(
                "timestamp {} has no local time at UTC offset {} minutes",
                bar.timestamp,
                self.clock.utc_offset_minutes()
            )));
        };

        let bar_index = self.bars_processed;
        let mut events = Vec::new();

        let snapshot = self.indicators.ingest(bar);

        let trend = self.classifier.classify(&snapshot, bar);
        if trend.is_consolidating != self.trend.is_consolidating {
            let chop = if trend.is_consolidating {
                ChopEvent::Entered { bar_index }
            } else {
                ChopEvent::Exited { bar_index }
            };
            debug!(bar_index, entered = trend.is_consolidating, "consolidation changed");
            events.push(EngineEvent::Chop(chop));
        }

        let orb = self.orb.update(bar, bar_index);
        events.extend(orb.events.iter().copied().map(EngineEvent::Orb));

        let zone_events = self.zones.update(bar, bar_index);
        events.extend(zone_events.into_iter().map(EngineEvent::Zone));

        let session_active = self.config.session_window.contains(minute);

        let composition = self.composer.compose(&ComposerInput {
            bar,
            snapshot: &snapshot,
            trend,
            session_active,
            retest: orb.retest,
            blocked: orb.blocked,
        });

        if let Some(direction) = composition.signal {
            let levels = self.targets.levels(direction, bar.close, snapshot.atr);
            let zone_kind = match direction {
                Direction::Long => ZoneKind::Demand,
                Direction::Short => ZoneKind::Supply,
            };
            let signal = SignalEvent {
                direction,
                bar_index,
                timestamp: bar.timestamp,
                entry_price: bar.close,
                target: levels.target,
                stop: levels.stop,
                atr: snapshot.atr,
                sources: composition.sources.clone(),
                in_zone: self.zones.contains_price(zone_kind, bar.close),
                high_volume: bar.volume > snapshot.avg_volume * HIGH_VOLUME_MULT,
            };
            info!(
                bar_index,
                %direction,
                entry = signal.entry_price,
                target = signal.target,
                stop = signal.stop,
                "signal"
            );
            self.last_signal = Some(direction);
            events.push(EngineEvent::Signal(signal));
        }

        self.trend = trend;
        self.last_timestamp = Some(bar.timestamp);
        self.bars_processed += 1;

        Ok(BarOutput {
            bar_index,
            snapshot,
            trend,
            raw_long: composition.raw_long,
            raw_short: composition.raw_short,
            events,
        })
    }

    /// Dashboard view of the current state. Never mutates the engine.
    pub fn status(&self) -> DashboardSnapshot {
        let snapshot = self.indicators.last();
        let minute = self
            .last_timestamp
            .and_then(|timestamp| self.clock.minute_of_day(timestamp));

        DashboardSnapshot {
            bars_processed: self.bars_processed,
            warm: snapshot.warm,
            trend: self.trend.trend,
            is_consolidating: self.trend.is_consolidating,
            rsi: snapshot.rsi,
            rsi_zone: RsiZone::classify(
                snapshot.rsi,
                self.config.rsi_overbought,
                self.config.rsi_oversold,
            ),
            orb: OrbSummary::from(self.orb.state()),
            supply_zones: self.zones.count(ZoneKind::Supply),
            demand_zones: self.zones.count(ZoneKind::Demand),
            session_active: minute.is_some_and(|m| self.config.session_window.contains(m)),
            killzone: minute.and_then(Killzone::at),
            last_signal: self.last_signal,
        }
    }

    pub fn orb_state(&self) -> &OrbState {
        self.orb.state()
    }

    pub fn trend(&self) -> TrendState {
        self.trend
    }

    /// Live zones of a kind, oldest first.
    pub fn zones(&self, kind: ZoneKind) -> impl Iterator<Item = &Zone> {
        self.zones.zones(kind)
    }

    pub fn bars_processed(&self) -> u64 {
        self.bars_processed
    }

    /// Bars needed before indicator outputs are warm.
    pub fn warmup_period(&self) -> usize {
        self.indicators.warmup_period()
    }
}
