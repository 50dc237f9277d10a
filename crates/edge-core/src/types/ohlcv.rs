//! OHLCV (Open, High, Low, Close, Volume) bar type.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A single price bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds (bar open time, UTC)
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the bar's body size (absolute difference between open and close).
    #[inline]
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }

    /// Reject bars the engine cannot reason about.
    pub fn validate(&self) -> Result<(), EngineError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite()) || !self.volume.is_finite() {
            return Err(EngineError::InvalidBar(format!(
                "non-finite value in bar at {}",
                self.timestamp
            )));
        }
        if self.volume < 0.0 {
            return Err(EngineError::InvalidBar(format!(
                "negative volume {} at {}",
                self.volume, self.timestamp
            )));
        }
        if self.high < self.low {
            return Err(EngineError::InvalidBar(format!(
                "high {} below low {} at {}",
                self.high, self.low, self.timestamp
            )));
        }
        if DateTime::from_timestamp_millis(self.timestamp).is_none() {
            return Err(EngineError::InvalidBar(format!(
                "timestamp {} out of range",
                self.timestamp
            )));
        }
        Ok(())
    }
}

impl Default for Bar {
    fn default() -> Self {
        Self {
            timestamp: 0,
            open: 0.0,
            high: 0.0,
            low: 0.0,
            close: 0.0,
            volume: 0.0,
        }
    }
}
