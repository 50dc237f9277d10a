//! Event journal: engine events as JSON lines or human-readable text.

use chrono::DateTime;
use edge_core::types::{
    ChopEvent, Direction, EngineEvent, OrbEvent, SignalSource, ZoneAction,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// Journal output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for JournalFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(JournalFormat::Text),
            "json" => Ok(JournalFormat::Json),
            _ => Err(format!("Unknown journal format: {}", s)),
        }
    }
}

/// Running totals over everything recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalSummary {
    pub long_signals: usize,
    pub short_signals: usize,
    pub zones_created: usize,
    pub zones_invalidated: usize,
    pub zones_evicted: usize,
    pub chop_periods: usize,
    pub orb_breakouts: usize,
}

impl JournalSummary {
    fn count(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::Signal(s) => match s.direction {
                Direction::Long => self.long_signals += 1,
                Direction::Short => self.short_signals += 1,
            },
            EngineEvent::Zone(z) => match z.action {
                ZoneAction::Created => self.zones_created += 1,
                ZoneAction::Invalidated => self.zones_invalidated += 1,
                ZoneAction::Evicted => self.zones_evicted += 1,
            },
            EngineEvent::Chop(ChopEvent::Entered { .. }) => self.chop_periods += 1,
            EngineEvent::Chop(ChopEvent::Exited { .. }) => {}
            EngineEvent::Orb(OrbEvent::Breakout { .. }) => self.orb_breakouts += 1,
            EngineEvent::Orb(OrbEvent::RangeComplete { .. }) => {}
        }
    }
}

impl fmt::Display for JournalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Signals:     {} long / {} short", self.long_signals, self.short_signals)?;
        writeln!(
            f,
            "Zones:       {} created / {} invalidated / {} evicted",
            self.zones_created, self.zones_invalidated, self.zones_evicted
        )?;
        writeln!(f, "Chop:        {} periods", self.chop_periods)?;
        write!(f, "ORB:         {} breakouts", self.orb_breakouts)
    }
}

#[derive(Serialize)]
struct JournalLine<'a> {
    symbol: &'a str,
    timestamp: i64,
    event: &'a EngineEvent,
}

/// Writes engine events for one symbol.
pub struct EventJournal<W: Write> {
    writer: W,
    format: JournalFormat,
    symbol: String,
    summary: JournalSummary,
}

impl<W: Write> EventJournal<W> {
    pub fn new(writer: W, format: JournalFormat, symbol: impl Into<String>) -> Self {
        Self {
            writer,
            format,
            symbol: symbol.into(),
            summary: JournalSummary::default(),
        }
    }

    /// Record one event produced on the bar at `timestamp`.
    pub fn record(&mut self, timestamp: i64, event: &EngineEvent) -> io::Result<()> {
        self.summary.count(event);
        match self.format {
            JournalFormat::Json => {
                let line = JournalLine {
                    symbol: &self.symbol,
                    timestamp,
                    event,
                };
                serde_json::to_writer(&mut self.writer, &line)?;
                writeln!(self.writer)
            }
            JournalFormat::Text => {
                let text = render_text(&self.symbol, timestamp, event);
                writeln!(self.writer, "{}", text)
            }
        }
    }

    pub fn summary(&self) -> JournalSummary {
        self.summary
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn source_label(source: SignalSource) -> &'static str {
    match source {
        SignalSource::Base => "base",
        SignalSource::Momentum => "momentum",
        SignalSource::Pullback => "pullback",
        SignalSource::OrbRetest => "orb-retest",
    }
}

/// One-line text rendering of an event.
pub fn render_text(symbol: &str, timestamp: i64, event: &EngineEvent) -> String {
    let time = DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string());

    let detail = match event {
        EngineEvent::Signal(s) => {
            let sources: Vec<&str> = s.sources.iter().map(|src| source_label(*src)).collect();
            let mut detail = format!(
                "{:<5} entry {:.2} target {:.2} stop {:.2} R:R {:.1} [{}]",
                s.direction.to_string(),
                s.entry_price,
                s.target,
                s.stop,
                s.reward_risk(),
                sources.join(",")
            );
            if s.in_zone {
                detail.push_str(" in-zone");
            }
            if s.high_volume {
                detail.push_str(" high-volume");
            }
            detail
        }
        EngineEvent::Zone(z) => format!(
            "zone {} {:?} #{} [{:.2} - {:.2}]",
            z.kind, z.action, z.zone_id, z.bottom, z.top
        ),
        EngineEvent::Chop(ChopEvent::Entered { .. }) => "consolidation entered".to_string(),
        EngineEvent::Chop(ChopEvent::Exited { .. }) => "consolidation exited".to_string(),
        EngineEvent::Orb(OrbEvent::RangeComplete { high, low, .. }) => {
            format!("opening range {:.2} - {:.2}", low, high)
        }
        EngineEvent::Orb(OrbEvent::Breakout {
            direction, level, ..
        }) => format!("ORB breakout {} through {:.2}", direction, level),
    };

    format!("{} {:<6} #{:<6} {}", time, symbol, event.bar_index(), detail)
}
