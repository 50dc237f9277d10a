//! Trend alignment and consolidation (chop) classification.

use edge_core::types::{Bar, Direction};
use edge_indicators::{IndicatorSnapshot, RingBuffer};
use serde::{Deserialize, Serialize};

/// Bars over which both averages must have risen (or fallen).
pub const TREND_LOOKBACK: usize = 3;

/// Trend alignment of the fast and slow averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

/// Per-bar trend classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrendState {
    pub trend: Trend,
    pub is_consolidating: bool,
}

impl TrendState {
    /// Check if the trend favours the given direction.
    #[inline]
    pub fn is_aligned(&self, direction: Direction) -> bool {
        matches!(
            (self.trend, direction),
            (Trend::Bullish, Direction::Long) | (Trend::Bearish, Direction::Short)
        )
    }
}

/// Classifies trend and chop from indicator snapshots.
///
/// Keeps its own bounded history: the last `TREND_LOOKBACK + 1` warm
/// average pairs and the highs/lows of the consolidation look-back.
#[derive(Debug, Clone)]
pub struct TrendClassifier {
    ma_threshold_pct: f64,
    range_threshold_pct: f64,
    averages: RingBuffer<(f64, f64)>,
    highs: RingBuffer<f64>,
    lows: RingBuffer<f64>,
}

impl TrendClassifier {
    /// Create a classifier.
    pub fn new(ma_threshold_pct: f64, range_threshold_pct: f64, lookback: usize) -> Self {
        Self {
            ma_threshold_pct,
            range_threshold_pct,
            averages: RingBuffer::new(TREND_LOOKBACK + 1),
            highs: RingBuffer::new(lookback),
            lows: RingBuffer::new(lookback),
        }
    }

    /// Classify the current bar.
    pub fn classify(&mut self, snapshot: &IndicatorSnapshot, bar: &Bar) -> TrendState {
        self.highs.push(bar.high);
        self.lows.push(bar.low);

        if !snapshot.warm {
            return TrendState::default();
        }
        self.averages.push((snapshot.fast_ma, snapshot.slow_ma));

        TrendState {
            trend: self.trend(snapshot),
            is_consolidating: self.is_consolidating(snapshot),
        }
    }

    fn trend(&self, snapshot: &IndicatorSnapshot) -> Trend {
        let Some((fast_then, slow_then)) = self.averages.back(TREND_LOOKBACK) else {
            return Trend::Neutral;
        };
        let (fast, slow) = (snapshot.fast_ma, snapshot.slow_ma);

        if fast > slow && fast > fast_then && slow > slow_then {
            Trend::Bullish
        } else if fast < slow && fast < fast_then && slow < slow_then {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }

    fn is_consolidating(&self, snapshot: &IndicatorSnapshot) -> bool {
        let ma_tight = snapshot.slow_ma != 0.0
            && ((snapshot.fast_ma - snapshot.slow_ma).abs() / snapshot.slow_ma.abs()) * 100.0
                < self.ma_threshold_pct;

        let range_tight = match (self.highs.is_full(), self.highs.max(), self.lows.min()) {
            (true, Some(highest), Some(lowest)) if lowest > 0.0 => {
                ((highest - lowest) / lowest) * 100.0 < self.range_threshold_pct
            }
            _ => false,
        };

        ma_tight || range_tight
    }
}
