//! Streaming signal engine.
//!
//! Consumes one bar at a time and emits structured events:
//! - `trend`: trend alignment and the consolidation veto
//! - `orb`: opening range breakout state machine with retest detection
//! - `zones`: pivot-anchored supply/demand zones with FIFO eviction
//! - `composer`: candidate generators, gating and edge-triggered de-duplication
//! - `targets`: ATR-multiple target and stop levels
//! - `status`: read-only dashboard projection
//!
//! `SignalEngine` ties them together. One instance per symbol stream;
//! instances share no state.

pub mod composer;
pub mod config;
pub mod engine;
pub mod orb;
pub mod status;
pub mod targets;
pub mod trend;
pub mod zones;

pub use config::EngineConfig;
pub use engine::{BarOutput, SignalEngine, HIGH_VOLUME_MULT};
pub use orb::{OrbPhase, OrbState};
pub use status::{DashboardSnapshot, OrbSummary, RsiZone};
pub use trend::{Trend, TrendState};
pub use zones::Zone;
