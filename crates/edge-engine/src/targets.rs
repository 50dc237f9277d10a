//! ATR-multiple target and stop levels.

use edge_core::types::Direction;

/// Computes target/stop levels at signal emission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetCalculator {
    profit_factor: f64,
    stop_factor: f64,
}

/// Levels recorded on the emitting bar. Never adjusted afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    pub target: f64,
    pub stop: f64,
}

impl TargetCalculator {
    pub fn new(profit_factor: f64, stop_factor: f64) -> Self {
        Self {
            profit_factor,
            stop_factor,
        }
    }

    pub fn levels(&self, direction: Direction, close: f64, atr: f64) -> Levels {
        let sign = direction.sign();
        Levels {
            target: close + sign * atr * self.profit_factor,
            stop: close - sign * atr * self.stop_factor,
        }
    }
}
