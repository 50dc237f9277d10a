//! Per-bar indicator aggregate.

use edge_core::traits::StreamingIndicator;
use edge_core::types::Bar;
use serde::{Deserialize, Serialize};

use crate::momentum::Rsi;
use crate::moving_average::{MaKind, MovingAverage, Sma};
use crate::volatility::Atr;

/// Window sizes for the indicator core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    pub ma_kind: MaKind,
    pub fast_length: usize,
    pub slow_length: usize,
    pub rsi_length: usize,
    pub atr_length: usize,
    pub volume_length: usize,
    pub body_length: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            ma_kind: MaKind::Ema,
            fast_length: 9,
            slow_length: 21,
            rsi_length: 14,
            atr_length: 14,
            volume_length: 20,
            body_length: 20,
        }
    }
}

/// Indicator values after a bar.
///
/// `warm` is false until every rolling window has filled; values computed
/// before that are partial-window values and must be treated as
/// non-actionable.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub fast_ma: f64,
    pub slow_ma: f64,
    pub rsi: f64,
    pub atr: f64,
    pub avg_volume: f64,
    pub avg_body: f64,
    pub warm: bool,
}

/// Owns every streaming indicator the engine reads.
#[derive(Debug, Clone)]
pub struct IndicatorCore {
    settings: IndicatorSettings,
    fast: MovingAverage,
    slow: MovingAverage,
    rsi: Rsi,
    atr: Atr,
    volume: Sma,
    body: Sma,
    last: IndicatorSnapshot,
}

impl IndicatorCore {
    /// Create an indicator core. Lengths must be positive.
    pub fn new(settings: IndicatorSettings) -> Self {
        Self {
            settings,
            fast: MovingAverage::new(settings.ma_kind, settings.fast_length),
            slow: MovingAverage::new(settings.ma_kind, settings.slow_length),
            rsi: Rsi::new(settings.rsi_length),
            atr: Atr::new(settings.atr_length),
            volume: Sma::new(settings.volume_length),
            body: Sma::new(settings.body_length),
            last: IndicatorSnapshot::default(),
        }
    }

    /// Feed a bar and return the updated snapshot.
    pub fn ingest(&mut self, bar: &Bar) -> IndicatorSnapshot {
        let fast_ma = self.fast.update(bar.close, bar.volume);
        let slow_ma = self.slow.update(bar.close, bar.volume);
        let rsi = self.rsi.update(bar.close);
        let atr = self.atr.update(*bar);
        let avg_volume = self.volume.update(bar.volume);
        let avg_body = self.body.update(bar.body());

        let warm = self.fast.is_ready()
            && self.slow.is_ready()
            && self.rsi.is_ready()
            && self.atr.is_ready()
            && self.volume.is_ready()
            && self.body.is_ready();

        self.last = IndicatorSnapshot {
            fast_ma,
            slow_ma,
            rsi,
            atr,
            avg_volume,
            avg_body,
            warm,
        };
        self.last
    }

    /// Snapshot of the last ingested bar.
    pub fn last(&self) -> IndicatorSnapshot {
        self.last
    }

    /// Bars needed before snapshots are warm.
    pub fn warmup_period(&self) -> usize {
        [
            self.fast.period(),
            self.slow.period(),
            self.rsi.period(),
            self.atr.period(),
            self.volume.period(),
            self.body.period(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(i: i64, close: f64) -> Bar {
        Bar::new(i * 60_000, close - 0.5, close + 1.0, close - 1.0, close, 1000.0 + i as f64)
    }

    #[test]
    fn test_warmup_flag() {
        let settings = IndicatorSettings {
            fast_length: 2,
            slow_length: 4,
            rsi_length: 3,
            atr_length: 3,
            volume_length: 3,
            body_length: 3,
            ..Default::default()
        };
        let mut core = IndicatorCore::new(settings);
        assert_eq!(core.warmup_period(), 4);

        for i in 0..3 {
            assert!(!core.ingest(&bar(i, 100.0 + i as f64)).warm);
        }
        assert!(core.ingest(&bar(3, 103.0)).warm);
        assert!(core.last().warm);
    }

    #[test]
    fn test_snapshot_values() {
        let settings = IndicatorSettings {
            ma_kind: MaKind::Sma,
            fast_length: 2,
            slow_length: 3,
            rsi_length: 2,
            atr_length: 2,
            volume_length: 2,
            body_length: 2,
        };
        let mut core = IndicatorCore::new(settings);
        core.ingest(&bar(0, 100.0));
        core.ingest(&bar(1, 101.0));
        let snap = core.ingest(&bar(2, 102.0));

        assert!(snap.warm);
        assert!((snap.fast_ma - 101.5).abs() < 1e-10);
        assert!((snap.slow_ma - 101.0).abs() < 1e-10);
        assert!((snap.avg_body - 0.5).abs() < 1e-10);
        assert!((snap.avg_volume - 1001.5).abs() < 1e-10);
        assert!((snap.rsi - 100.0).abs() < 1e-10);
    }
}
