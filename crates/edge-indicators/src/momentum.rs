//! Momentum indicators.

use edge_core::traits::StreamingIndicator;

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// The first average gain/loss is the mean of the first `period` changes;
/// afterwards `avg = (prev_avg * (period - 1) + value) / period`.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_close: Option<f64>,
    changes: usize,
    avg_gain: f64,
    avg_loss: f64,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            prev_close: None,
            changes: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        }
    }
}

impl StreamingIndicator for Rsi {
    type Input = f64;

    fn update(&mut self, close: f64) -> f64 {
        let Some(prev) = self.prev_close.replace(close) else {
            return self.value();
        };

        let change = close - prev;
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };

        self.changes += 1;
        if self.changes <= self.period {
            // Running mean until the seed window is complete
            let n = self.changes as f64;
            self.avg_gain += (gain - self.avg_gain) / n;
            self.avg_loss += (loss - self.avg_loss) / n;
        } else {
            let period = self.period as f64;
            self.avg_gain = (self.avg_gain * (period - 1.0) + gain) / period;
            self.avg_loss = (self.avg_loss * (period - 1.0) + loss) / period;
        }
        self.value()
    }

    fn value(&self) -> f64 {
        if self.avg_loss == 0.0 {
            if self.avg_gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - (100.0 / (1.0 + self.avg_gain / self.avg_loss))
        }
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.changes = 0;
        self.avg_gain = 0.0;
        self.avg_loss = 0.0;
    }

    fn is_ready(&self) -> bool {
        self.changes >= self.period
    }

    fn period(&self) -> usize {
        self.period + 1 // Need period+1 data points
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_bounds() {
        let mut rsi = Rsi::new(14);
        for i in 0..60 {
            let value = rsi.update(100.0 + (i as f64 * 0.5).sin() * 5.0);
            assert!((0.0..=100.0).contains(&value));
        }
        assert!(rsi.is_ready());
    }

    #[test]
    fn test_rsi_all_gains() {
        let mut rsi = Rsi::new(5);
        let mut last = 0.0;
        for v in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0] {
            last = rsi.update(v);
        }
        assert!((last - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let mut rsi = Rsi::new(5);
        let mut last = 100.0;
        for v in [7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0] {
            last = rsi.update(v);
        }
        assert!(last.abs() < 1e-10);
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        let mut rsi = Rsi::new(2);
        rsi.update(10.0);
        rsi.update(12.0); // gain 2
        rsi.update(11.0); // loss 1 -> seed avg gain 1.0, avg loss 0.5
        assert!(rsi.is_ready());
        assert!((rsi.value() - (100.0 - 100.0 / 3.0)).abs() < 1e-10);

        // gain 1 -> avg gain (1.0 + 1) / 2 = 1.0, avg loss 0.5 / 2 = 0.25
        let value = rsi.update(12.0);
        assert!((value - 80.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_warmup_flag() {
        let mut rsi = Rsi::new(3);
        assert_eq!(rsi.period(), 4);
        rsi.update(1.0);
        rsi.update(2.0);
        rsi.update(3.0);
        assert!(!rsi.is_ready());
        rsi.update(4.0);
        assert!(rsi.is_ready());
    }
}
