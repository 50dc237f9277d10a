//! Opening range breakout state machine.
//!
//! One range per trading day. The range is built from bars inside the
//! opening window, frozen on the first bar after the window closes, and
//! at most one breakout direction is latched until the next day key.

use chrono::{NaiveDate, Timelike};
use edge_core::types::{Bar, Direction, OrbEvent, SessionClock, SessionWindow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Opening range state for the current trading day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrbState {
    pub day_key: Option<NaiveDate>,
    pub range_high: Option<f64>,
    pub range_low: Option<f64>,
    pub is_complete: bool,
    pub breakout_direction: Option<Direction>,
    pub breakout_bar_index: Option<u64>,
    pub range_start_bar_index: Option<u64>,
}

/// Coarse ORB phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbPhase {
    Building,
    Complete,
    Breakout(Direction),
}

impl OrbState {
    pub fn phase(&self) -> OrbPhase {
        match (self.is_complete, self.breakout_direction) {
            (_, Some(direction)) => OrbPhase::Breakout(direction),
            (true, None) => OrbPhase::Complete,
            (false, None) => OrbPhase::Building,
        }
    }

    /// The broken level for a direction: range high for longs, range low for shorts.
    pub fn level(&self, direction: Direction) -> Option<f64> {
        match direction {
            Direction::Long => self.range_high,
            Direction::Short => self.range_low,
        }
    }
}

/// Result of one ORB step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrbUpdate {
    /// Direction whose broken level was retested on this bar
    pub retest: Option<Direction>,
    /// Direction blocked by the post-breakout momentum hold
    pub blocked: Option<Direction>,
    pub events: Vec<OrbEvent>,
}

/// Drives `OrbState` from bar timestamps.
#[derive(Debug, Clone)]
pub struct OrbTracker {
    clock: SessionClock,
    window: SessionWindow,
    momentum_hold: usize,
    retest_tolerance_pct: f64,
    max_retest_bars: usize,
    state: OrbState,
}

impl OrbTracker {
    pub fn new(
        clock: SessionClock,
        window: SessionWindow,
        momentum_hold: usize,
        retest_tolerance_pct: f64,
        max_retest_bars: usize,
    ) -> Self {
        Self {
            clock,
            window,
            momentum_hold,
            retest_tolerance_pct,
            max_retest_bars,
            state: OrbState::default(),
        }
    }

    pub fn state(&self) -> &OrbState {
        &self.state
    }

    /// Advance the state machine by one bar.
    pub fn update(&mut self, bar: &Bar, bar_index: u64) -> OrbUpdate {
        let mut out = OrbUpdate::default();

        // SignalEngine rejects bars with no local time before they get here
        let Some(local) = self.clock.local(bar.timestamp) else {
            return out;
        };
        let day = local.date();
        if self.state.day_key != Some(day) {
            if self.state.day_key.is_some() {
                debug!(%day, "ORB reset for new trading day");
            }
            self.state = OrbState {
                day_key: Some(day),
                ..Default::default()
            };
        }

        let minute = local.hour() * 60 + local.minute();

        if !self.state.is_complete && self.window.contains(minute) {
            self.extend_range(bar, bar_index);
        }

        if !self.state.is_complete && self.window.has_closed(minute) {
            if let (Some(high), Some(low)) = (self.state.range_high, self.state.range_low) {
                self.state.is_complete = true;
                debug!(bar_index, high, low, "ORB range complete");
                out.events.push(OrbEvent::RangeComplete {
                    bar_index,
                    high,
                    low,
                });
            }
        }

        if self.state.is_complete && self.state.breakout_direction.is_none() {
            if let Some((direction, level)) = self.detect_breakout(bar) {
                self.state.breakout_direction = Some(direction);
                self.state.breakout_bar_index = Some(bar_index);
                debug!(bar_index, %direction, level, "ORB breakout latched");
                out.events.push(OrbEvent::Breakout {
                    bar_index,
                    direction,
                    level,
                });
            }
        }

        if let (Some(direction), Some(breakout_index)) =
            (self.state.breakout_direction, self.state.breakout_bar_index)
        {
            let bars_since = bar_index.saturating_sub(breakout_index);
            if bars_since < self.momentum_hold as u64 {
                out.blocked = Some(direction.opposite());
            }
            if bars_since >= 1
                && bars_since <= self.max_retest_bars as u64
                && self.is_retest(bar, direction)
            {
                out.retest = Some(direction);
            }
        }

        out
    }

    fn extend_range(&mut self, bar: &Bar, bar_index: u64) {
        let state = &mut self.state;
        state.range_high = Some(state.range_high.map_or(bar.high, |h| h.max(bar.high)));
        state.range_low = Some(state.range_low.map_or(bar.low, |l| l.min(bar.low)));
        if state.range_start_bar_index.is_none() {
            state.range_start_bar_index = Some(bar_index);
        }
    }

    fn detect_breakout(&self, bar: &Bar) -> Option<(Direction, f64)> {
        let high = self.state.range_high?;
        let low = self.state.range_low?;
        if bar.close > high {
            Some((Direction::Long, high))
        } else if bar.close < low {
            Some((Direction::Short, low))
        } else {
            None
        }
    }

    /// Price came back to the broken level and held on the breakout side.
    fn is_retest(&self, bar: &Bar, direction: Direction) -> bool {
        let Some(level) = self.state.level(direction) else {
            return false;
        };
        let tolerance = level.abs() * self.retest_tolerance_pct / 100.0;
        match direction {
            Direction::Long => bar.low <= level + tolerance && bar.close > level - tolerance,
            Direction::Short => bar.high >= level - tolerance && bar.close < level + tolerance,
        }
    }
}
