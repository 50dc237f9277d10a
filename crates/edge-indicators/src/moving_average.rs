//! Moving average indicators.
//!
//! Every average is streaming: the window is held in a `RingBuffer` and the
//! aggregate is adjusted by the entering and leaving value, so an update
//! never rescans the window.

use edge_core::traits::StreamingIndicator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::window::RingBuffer;

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    window: RingBuffer<f64>,
    sum: f64,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            window: RingBuffer::new(period),
            sum: 0.0,
        }
    }
}

impl StreamingIndicator for Sma {
    type Input = f64;

    fn update(&mut self, value: f64) -> f64 {
        if let Some(evicted) = self.window.push(value) {
            self.sum -= evicted;
        }
        self.sum += value;
        self.value()
    }

    fn value(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.sum / self.window.len() as f64
        }
    }

    fn reset(&mut self) {
        self.window.clear();
        self.sum = 0.0;
    }

    fn is_ready(&self) -> bool {
        self.window.is_full()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Seeded with the SMA of the first `period` values, then smoothed with
/// multiplier `2 / (period + 1)`. Until seeded the value is the running mean.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
    current: f64,
    count: usize,
    sum: f64,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self {
            period,
            multiplier,
            current: 0.0,
            count: 0,
            sum: 0.0,
        }
    }
}

impl StreamingIndicator for Ema {
    type Input = f64;

    fn update(&mut self, value: f64) -> f64 {
        self.count += 1;

        if self.count <= self.period {
            // Accumulating for initial SMA
            self.sum += value;
            self.current = self.sum / self.count as f64;
        } else {
            self.current = value * self.multiplier + self.current * (1.0 - self.multiplier);
        }
        self.current
    }

    fn value(&self) -> f64 {
        self.current
    }

    fn reset(&mut self) {
        self.current = 0.0;
        self.count = 0;
        self.sum = 0.0;
    }

    fn is_ready(&self) -> bool {
        self.count >= self.period
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Weighted Moving Average (WMA).
///
/// Gives linearly decreasing weights to older prices. The weighted sum is
/// slid forward with `ws' = ws + n * new - window_sum`.
#[derive(Debug, Clone)]
pub struct Wma {
    period: usize,
    window: RingBuffer<f64>,
    weighted_sum: f64,
    window_sum: f64,
}

impl Wma {
    /// Create a new WMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            window: RingBuffer::new(period),
            weighted_sum: 0.0,
            window_sum: 0.0,
        }
    }
}

impl StreamingIndicator for Wma {
    type Input = f64;

    fn update(&mut self, value: f64) -> f64 {
        match self.window.push(value) {
            Some(evicted) => {
                self.weighted_sum += self.period as f64 * value - self.window_sum;
                self.window_sum += value - evicted;
            }
            None => {
                self.weighted_sum += self.window.len() as f64 * value;
                self.window_sum += value;
            }
        }
        self.value()
    }

    fn value(&self) -> f64 {
        let n = self.window.len();
        if n == 0 {
            return 0.0;
        }
        // Sum of weights: 1 + 2 + ... + n = n(n+1)/2
        let weights = (n * (n + 1)) as f64 / 2.0;
        self.weighted_sum / weights
    }

    fn reset(&mut self) {
        self.window.clear();
        self.weighted_sum = 0.0;
        self.window_sum = 0.0;
    }

    fn is_ready(&self) -> bool {
        self.window.is_full()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "WMA"
    }
}

/// Volume-Weighted Moving Average (VWMA).
///
/// `sum(price * volume) / sum(volume)` over the window; falls back to the
/// plain mean when the window carries no volume.
#[derive(Debug, Clone)]
pub struct Vwma {
    period: usize,
    window: RingBuffer<(f64, f64)>,
    price_volume_sum: f64,
    volume_sum: f64,
    price_sum: f64,
}

impl Vwma {
    /// Create a new VWMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            window: RingBuffer::new(period),
            price_volume_sum: 0.0,
            volume_sum: 0.0,
            price_sum: 0.0,
        }
    }
}

impl StreamingIndicator for Vwma {
    type Input = (f64, f64);

    fn update(&mut self, (price, volume): (f64, f64)) -> f64 {
        if let Some((old_price, old_volume)) = self.window.push((price, volume)) {
            self.price_volume_sum -= old_price * old_volume;
            self.volume_sum -= old_volume;
            self.price_sum -= old_price;
        }
        self.price_volume_sum += price * volume;
        self.volume_sum += volume;
        self.price_sum += price;
        self.value()
    }

    fn value(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else if self.volume_sum > 0.0 {
            self.price_volume_sum / self.volume_sum
        } else {
            self.price_sum / self.window.len() as f64
        }
    }

    fn reset(&mut self) {
        self.window.clear();
        self.price_volume_sum = 0.0;
        self.volume_sum = 0.0;
        self.price_sum = 0.0;
    }

    fn is_ready(&self) -> bool {
        self.window.is_full()
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "VWMA"
    }
}

/// Moving average flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MaKind {
    #[default]
    Ema,
    Sma,
    Wma,
    Vwma,
}

impl fmt::Display for MaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MaKind::Ema => "ema",
            MaKind::Sma => "sma",
            MaKind::Wma => "wma",
            MaKind::Vwma => "vwma",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ema" => Ok(MaKind::Ema),
            "sma" => Ok(MaKind::Sma),
            "wma" => Ok(MaKind::Wma),
            "vwma" => Ok(MaKind::Vwma),
            _ => Err(format!("Invalid moving average kind: {}", s)),
        }
    }
}

/// A moving average of any supported kind, fed with price and volume.
#[derive(Debug, Clone)]
pub enum MovingAverage {
    Sma(Sma),
    Ema(Ema),
    Wma(Wma),
    Vwma(Vwma),
}

impl MovingAverage {
    /// Create a moving average of the given kind.
    pub fn new(kind: MaKind, period: usize) -> Self {
        match kind {
            MaKind::Sma => MovingAverage::Sma(Sma::new(period)),
            MaKind::Ema => MovingAverage::Ema(Ema::new(period)),
            MaKind::Wma => MovingAverage::Wma(Wma::new(period)),
            MaKind::Vwma => MovingAverage::Vwma(Vwma::new(period)),
        }
    }

    /// Update with a price (and its volume, used by VWMA only).
    pub fn update(&mut self, price: f64, volume: f64) -> f64 {
        match self {
            MovingAverage::Sma(ma) => ma.update(price),
            MovingAverage::Ema(ma) => ma.update(price),
            MovingAverage::Wma(ma) => ma.update(price),
            MovingAverage::Vwma(ma) => ma.update((price, volume)),
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            MovingAverage::Sma(ma) => ma.value(),
            MovingAverage::Ema(ma) => ma.value(),
            MovingAverage::Wma(ma) => ma.value(),
            MovingAverage::Vwma(ma) => ma.value(),
        }
    }

    pub fn is_ready(&self) -> bool {
        match self {
            MovingAverage::Sma(ma) => ma.is_ready(),
            MovingAverage::Ema(ma) => ma.is_ready(),
            MovingAverage::Wma(ma) => ma.is_ready(),
            MovingAverage::Vwma(ma) => ma.is_ready(),
        }
    }

    pub fn period(&self) -> usize {
        match self {
            MovingAverage::Sma(ma) => ma.period(),
            MovingAverage::Ema(ma) => ma.period(),
            MovingAverage::Wma(ma) => ma.period(),
            MovingAverage::Vwma(ma) => ma.period(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<I: StreamingIndicator<Input = f64>>(ind: &mut I, data: &[f64]) -> Vec<f64> {
        data.iter().map(|&v| ind.update(v)).collect()
    }

    #[test]
    fn test_sma() {
        let mut sma = Sma::new(3);
        let result = feed(&mut sma, &[1.0, 2.0, 3.0, 4.0, 5.0]);

        assert!((result[2] - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result[3] - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result[4] - 4.0).abs() < 1e-10); // (3+4+5)/3
        assert!(sma.is_ready());
    }

    #[test]
    fn test_sma_partial_window() {
        let mut sma = Sma::new(5);
        let result = feed(&mut sma, &[1.0, 2.0, 3.0]);

        assert!(!sma.is_ready());
        assert!((result[2] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema() {
        let mut ema = Ema::new(3);

        assert!(!ema.is_ready());
        ema.update(1.0);
        ema.update(2.0);
        assert!(!ema.is_ready());

        // Third value completes the seed
        let first = ema.update(3.0);
        assert!((first - 2.0).abs() < 1e-10); // SMA of first 3
        assert!(ema.is_ready());

        // mult = 2/(3+1) = 0.5
        // 4 * 0.5 + 2 * 0.5 = 3.0
        let second = ema.update(4.0);
        assert!((second - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_ema_reset() {
        let mut ema = Ema::new(3);
        feed(&mut ema, &[1.0, 2.0, 3.0]);

        assert!(ema.is_ready());
        ema.reset();
        assert!(!ema.is_ready());
        assert_eq!(ema.value(), 0.0);
    }

    #[test]
    fn test_wma_matches_direct_formula() {
        let mut wma = Wma::new(3);
        let result = feed(&mut wma, &[1.0, 2.0, 3.0, 4.0, 5.0]);

        // Weights: 1, 2, 3; sum = 6
        // (1*1 + 2*2 + 3*3) / 6 = 14/6
        assert!((result[2] - 14.0 / 6.0).abs() < 1e-10);
        // (2*1 + 3*2 + 4*3) / 6 = 20/6
        assert!((result[3] - 20.0 / 6.0).abs() < 1e-10);
        // (3*1 + 4*2 + 5*3) / 6 = 26/6
        assert!((result[4] - 26.0 / 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_vwma() {
        let mut vwma = Vwma::new(2);
        vwma.update((10.0, 1.0));
        let value = vwma.update((20.0, 3.0));
        // (10*1 + 20*3) / 4
        assert!((value - 17.5).abs() < 1e-10);

        // Window slides: (20*3 + 30*1) / 4
        let value = vwma.update((30.0, 1.0));
        assert!((value - 22.5).abs() < 1e-10);
    }

    #[test]
    fn test_vwma_zero_volume_falls_back_to_mean() {
        let mut vwma = Vwma::new(2);
        vwma.update((10.0, 0.0));
        let value = vwma.update((20.0, 0.0));
        assert!((value - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_ma_kind_parse() {
        assert_eq!("EMA".parse::<MaKind>().unwrap(), MaKind::Ema);
        assert_eq!("vwma".parse::<MaKind>().unwrap(), MaKind::Vwma);
        assert!("hull".parse::<MaKind>().is_err());
        assert_eq!(MaKind::Wma.to_string(), "wma");
    }

    #[test]
    fn test_moving_average_dispatch() {
        let mut ma = MovingAverage::new(MaKind::Sma, 2);
        ma.update(1.0, 100.0);
        let value = ma.update(3.0, 100.0);
        assert!((value - 2.0).abs() < 1e-10);
        assert!(ma.is_ready());
        assert_eq!(ma.period(), 2);
    }
}
