//! Output events consumed by presentation and journal layers.
//!
//! These structures are the only contract an outside renderer may rely on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// The opposite direction.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Long => Direction::Short,
            Direction::Short => Direction::Long,
        }
    }

    /// +1.0 for long, -1.0 for short.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// Candidate generator that contributed to a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Base,
    Momentum,
    Pullback,
    OrbRetest,
}

/// An emitted trading signal. At most one per bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub direction: Direction,
    pub bar_index: u64,
    /// Timestamp of the emitting bar (Unix ms)
    pub timestamp: i64,
    /// Close of the emitting bar
    pub entry_price: f64,
    pub target: f64,
    pub stop: f64,
    /// ATR used for the target/stop distances
    pub atr: f64,
    /// Generators whose predicate held on this bar
    pub sources: Vec<SignalSource>,
    /// Entry sits inside a live zone of the matching kind
    pub in_zone: bool,
    /// Volume well above its average
    pub high_volume: bool,
}

impl SignalEvent {
    /// Reward-to-risk ratio of the recorded levels.
    pub fn reward_risk(&self) -> f64 {
        let risk = (self.entry_price - self.stop).abs();
        if risk == 0.0 {
            0.0
        } else {
            (self.target - self.entry_price).abs() / risk
        }
    }
}

/// Supply or demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    /// Hangs below a pivot high
    Supply,
    /// Sits above a pivot low
    Demand,
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneKind::Supply => write!(f, "supply"),
            ZoneKind::Demand => write!(f, "demand"),
        }
    }
}

/// Zone lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneAction {
    Created,
    /// Price closed through the zone's far edge
    Invalidated,
    /// Removed to respect the per-kind capacity
    Evicted,
}

/// Zone lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneEvent {
    pub action: ZoneAction,
    pub zone_id: u64,
    pub kind: ZoneKind,
    pub top: f64,
    pub bottom: f64,
    /// Bar on which the transition happened
    pub bar_index: u64,
}

/// Consolidation regime transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChopEvent {
    Entered { bar_index: u64 },
    Exited { bar_index: u64 },
}

/// Opening range transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbEvent {
    RangeComplete { bar_index: u64, high: f64, low: f64 },
    Breakout { bar_index: u64, direction: Direction, level: f64 },
}

/// Any event produced while ingesting a bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EngineEvent {
    Signal(SignalEvent),
    Zone(ZoneEvent),
    Chop(ChopEvent),
    Orb(OrbEvent),
}

impl EngineEvent {
    /// Bar index the event belongs to.
    pub fn bar_index(&self) -> u64 {
        match self {
            EngineEvent::Signal(s) => s.bar_index,
            EngineEvent::Zone(z) => z.bar_index,
            EngineEvent::Chop(ChopEvent::Entered { bar_index })
            | EngineEvent::Chop(ChopEvent::Exited { bar_index }) => *bar_index,
            EngineEvent::Orb(OrbEvent::RangeComplete { bar_index, .. })
            | EngineEvent::Orb(OrbEvent::Breakout { bar_index, .. }) => *bar_index,
        }
    }
}
