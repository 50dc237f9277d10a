//! Candidate signal generators, gating and edge-triggered de-duplication.

use edge_core::types::{Bar, Direction, SignalSource};
use edge_indicators::IndicatorSnapshot;

use crate::trend::TrendState;

/// Everything the composer reads for one bar.
#[derive(Debug, Clone, Copy)]
pub struct ComposerInput<'a> {
    pub bar: &'a Bar,
    pub snapshot: &'a IndicatorSnapshot,
    pub trend: TrendState,
    pub session_active: bool,
    /// ORB retest flagged on this bar
    pub retest: Option<Direction>,
    /// Direction blocked by the ORB momentum hold
    pub blocked: Option<Direction>,
}

/// Outcome of composing one bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    /// Gated, pre-dedup condition per direction
    pub raw_long: bool,
    pub raw_short: bool,
    /// Edge-triggered signal, if any
    pub signal: Option<Direction>,
    /// Generators that fired for the emitted direction
    pub sources: Vec<SignalSource>,
}

/// Per-direction flags carried to the next bar.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Carry {
    long: bool,
    short: bool,
}

impl Carry {
    fn get(&self, direction: Direction) -> bool {
        match direction {
            Direction::Long => self.long,
            Direction::Short => self.short,
        }
    }
}

/// Merges the candidate generators into at most one signal per bar.
#[derive(Debug, Clone)]
pub struct SignalComposer {
    body_strength_mult: f64,
    prev_bar: Option<Bar>,
    prev_pullback: Carry,
    prev_raw: Carry,
}

impl SignalComposer {
    pub fn new(body_strength_mult: f64) -> Self {
        Self {
            body_strength_mult,
            prev_bar: None,
            prev_pullback: Carry::default(),
            prev_raw: Carry::default(),
        }
    }

    /// Compose the current bar. Must be called exactly once per ingested bar.
    pub fn compose(&mut self, input: &ComposerInput<'_>) -> Composition {
        let long_sources = self.candidates(input, Direction::Long);
        let short_sources = self.candidates(input, Direction::Short);

        let raw_long = self.gate(input, Direction::Long, !long_sources.is_empty());
        let raw_short = self.gate(input, Direction::Short, !short_sources.is_empty());

        let fire_long = raw_long && !self.prev_raw.long;
        let fire_short = raw_short && !self.prev_raw.short;

        // Long takes precedence when both fire.
        let (signal, sources) = if fire_long {
            (Some(Direction::Long), long_sources)
        } else if fire_short {
            (Some(Direction::Short), short_sources)
        } else {
            (None, Vec::new())
        };

        self.prev_raw = Carry {
            long: raw_long,
            short: raw_short,
        };
        self.prev_pullback = Carry {
            long: is_pullback_bar(input, Direction::Long),
            short: is_pullback_bar(input, Direction::Short),
        };
        self.prev_bar = Some(*input.bar);

        Composition {
            raw_long,
            raw_short,
            signal,
            sources,
        }
    }

    fn gate(&self, input: &ComposerInput<'_>, direction: Direction, any: bool) -> bool {
        any && input.snapshot.warm
            && input.session_active
            && input.blocked != Some(direction)
            && !input.trend.is_consolidating
    }

    fn candidates(&self, input: &ComposerInput<'_>, direction: Direction) -> Vec<SignalSource> {
        let mut sources = Vec::new();
        if !input.snapshot.warm || !input.trend.is_aligned(direction) {
            return sources;
        }
        if self.base(input, direction) {
            sources.push(SignalSource::Base);
        }
        if self.momentum(input, direction) {
            sources.push(SignalSource::Momentum);
        }
        if self.pullback(input, direction) {
            sources.push(SignalSource::Pullback);
        }
        if input.retest == Some(direction) {
            sources.push(SignalSource::OrbRetest);
        }
        sources
    }

    fn base(&self, input: &ComposerInput<'_>, direction: Direction) -> bool {
        let bar = input.bar;
        let snap = input.snapshot;
        !input.trend.is_consolidating
            && beyond(bar.close, snap.fast_ma, direction)
            && bar.volume > snap.avg_volume
            && bar.body() > snap.avg_body
    }

    fn momentum(&self, input: &ComposerInput<'_>, direction: Direction) -> bool {
        let Some(prev) = self.prev_bar else {
            return false;
        };
        let bar = input.bar;
        let strong_body = bar.body() > input.snapshot.avg_body * self.body_strength_mult;
        let breaks_extreme = match direction {
            Direction::Long => bar.close > prev.high,
            Direction::Short => bar.close < prev.low,
        };
        !input.trend.is_consolidating && strong_body && breaks_extreme
    }

    fn pullback(&self, input: &ComposerInput<'_>, direction: Direction) -> bool {
        self.prev_pullback.get(direction)
            && beyond(input.bar.close, input.snapshot.fast_ma, direction)
    }
}

/// Price strictly beyond a level on the direction's side.
#[inline]
fn beyond(price: f64, level: f64, direction: Direction) -> bool {
    match direction {
        Direction::Long => price > level,
        Direction::Short => price < level,
    }
}

/// Trend-aligned close sitting between the fast and slow averages.
fn is_pullback_bar(input: &ComposerInput<'_>, direction: Direction) -> bool {
    let snap = input.snapshot;
    if !snap.warm || !input.trend.is_aligned(direction) {
        return false;
    }
    let close = input.bar.close;
    match direction {
        Direction::Long => close < snap.fast_ma && close > snap.slow_ma,
        Direction::Short => close > snap.fast_ma && close < snap.slow_ma,
    }
}
