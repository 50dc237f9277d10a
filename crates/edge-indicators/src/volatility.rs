//! Volatility indicators.

use edge_core::traits::StreamingIndicator;
use edge_core::types::Bar;

/// Average True Range (ATR).
///
/// Measures market volatility by decomposing the entire range
/// of an asset price for that period. The first true range is the bar's
/// high-low; the average is seeded with a mean and then Wilder-smoothed.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    prev_close: Option<f64>,
    count: usize,
    atr: f64,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            prev_close: None,
            count: 0,
            atr: 0.0,
        }
    }
}

impl StreamingIndicator for Atr {
    type Input = Bar;

    fn update(&mut self, bar: Bar) -> f64 {
        let tr = bar.true_range(self.prev_close);
        self.prev_close = Some(bar.close);
        self.count += 1;

        if self.count <= self.period {
            self.atr += (tr - self.atr) / self.count as f64;
        } else {
            let period = self.period as f64;
            self.atr = (self.atr * (period - 1.0) + tr) / period;
        }
        self.atr
    }

    fn value(&self) -> f64 {
        self.atr
    }

    fn reset(&mut self) {
        self.prev_close = None;
        self.count = 0;
        self.atr = 0.0;
    }

    fn is_ready(&self) -> bool {
        self.count >= self.period
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "ATR"
    }
}
