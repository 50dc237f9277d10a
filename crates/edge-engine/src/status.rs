//! Read-only dashboard projection of engine state.

use edge_core::types::{Direction, Killzone};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::orb::{OrbPhase, OrbState};
use crate::trend::Trend;

/// RSI relative to the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub fn classify(rsi: f64, overbought: f64, oversold: f64) -> Self {
        if rsi >= overbought {
            RsiZone::Overbought
        } else if rsi <= oversold {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }
}

/// Opening range as shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbSummary {
    pub phase: OrbPhase,
    pub range_high: Option<f64>,
    pub range_low: Option<f64>,
    pub breakout_bar_index: Option<u64>,
}

impl From<&OrbState> for OrbSummary {
    fn from(state: &OrbState) -> Self {
        Self {
            phase: state.phase(),
            range_high: state.range_high,
            range_low: state.range_low,
            breakout_bar_index: state.breakout_bar_index,
        }
    }
}

/// Snapshot of the engine for a dashboard. Recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub bars_processed: u64,
    pub warm: bool,
    pub trend: Trend,
    pub is_consolidating: bool,
    pub rsi: f64,
    pub rsi_zone: RsiZone,
    pub orb: OrbSummary,
    pub supply_zones: usize,
    pub demand_zones: usize,
    pub session_active: bool,
    pub killzone: Option<Killzone>,
    pub last_signal: Option<Direction>,
}

impl fmt::Display for DashboardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trend = match self.trend {
            Trend::Bullish => "BULLISH",
            Trend::Bearish => "BEARISH",
            Trend::Neutral => "NEUTRAL",
        };
        let orb = match self.orb.phase {
            OrbPhase::Building => "BUILDING".to_string(),
            OrbPhase::Complete => "COMPLETE".to_string(),
            OrbPhase::Breakout(direction) => format!("BREAKOUT {}", direction),
        };

        let warming = if self.warm { "" } else { " (warming up)" };
        let chop = if self.is_consolidating { " / CHOP" } else { "" };
        let session = if self.session_active { "ACTIVE" } else { "CLOSED" };
        let killzone = self.killzone.map(|k| format!(" ({})", k)).unwrap_or_default();
        let last = self
            .last_signal
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        writeln!(f, "Bars:        {}{}", self.bars_processed, warming)?;
        writeln!(f, "Trend:       {}{}", trend, chop)?;
        writeln!(f, "RSI:         {:.1} ({:?})", self.rsi, self.rsi_zone)?;
        match (self.orb.range_high, self.orb.range_low) {
            (Some(high), Some(low)) => {
                writeln!(f, "ORB:         {} [{:.2} - {:.2}]", orb, low, high)?
            }
            _ => writeln!(f, "ORB:         {}", orb)?,
        }
        writeln!(
            f,
            "Zones:       {} supply / {} demand",
            self.supply_zones, self.demand_zones
        )?;
        writeln!(f, "Session:     {}{}", session, killzone)?;
        write!(f, "Last signal: {}", last)
    }
}
