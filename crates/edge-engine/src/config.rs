//! Engine configuration.

use edge_core::error::EngineError;
use edge_core::types::SessionWindow;
use edge_indicators::{IndicatorSettings, MaKind};
use serde::{Deserialize, Serialize};

/// Every tunable of the signal engine, supplied once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Moving average flavour for the fast and slow averages
    pub ma_kind: MaKind,
    pub fast_length: usize,
    pub slow_length: usize,
    pub rsi_length: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// Chop when |fast - slow| / slow falls below this percentage
    pub consolidation_ma_pct: f64,
    /// Chop when (highest high - lowest low) / lowest low falls below this percentage
    pub consolidation_range_pct: f64,
    pub consolidation_lookback: usize,
    /// Opening range window, exchange-local
    pub orb_window: SessionWindow,
    /// Signals are only emitted inside this window
    pub session_window: SessionWindow,
    /// Offset applied to UTC bar timestamps to get exchange-local time
    pub utc_offset_minutes: i32,
    /// Bars after a breakout during which opposite signals are blocked
    pub orb_momentum_hold: usize,
    pub retest_tolerance_pct: f64,
    pub max_retest_bars: usize,
    pub pivot_left: usize,
    pub pivot_right: usize,
    pub max_zones_per_kind: usize,
    pub tick_size: f64,
    pub zone_height_ticks: f64,
    pub volume_length: usize,
    pub body_length: usize,
    pub body_strength_mult: f64,
    pub atr_length: usize,
    pub profit_factor: f64,
    pub stop_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ma_kind: MaKind::Ema,
            fast_length: 9,
            slow_length: 21,
            rsi_length: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            consolidation_ma_pct: 0.1,
            consolidation_range_pct: 0.5,
            consolidation_lookback: 20,
            orb_window: SessionWindow::NY_OPENING_RANGE,
            session_window: SessionWindow::NY_REGULAR_HOURS,
            utc_offset_minutes: -300,
            orb_momentum_hold: 5,
            retest_tolerance_pct: 0.1,
            max_retest_bars: 10,
            pivot_left: 5,
            pivot_right: 5,
            max_zones_per_kind: 3,
            tick_size: 0.01,
            zone_height_ticks: 20.0,
            volume_length: 20,
            body_length: 20,
            body_strength_mult: 1.5,
            atr_length: 14,
            profit_factor: 4.5,
            stop_factor: 1.5,
        }
    }
}

fn invalid(msg: impl Into<String>) -> EngineError {
    EngineError::InvalidConfiguration(msg.into())
}

impl EngineConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), EngineError> {
        let lengths = [
            ("fast_length", self.fast_length),
            ("slow_length", self.slow_length),
            ("rsi_length", self.rsi_length),
            ("consolidation_lookback", self.consolidation_lookback),
            ("pivot_left", self.pivot_left),
            ("pivot_right", self.pivot_right),
            ("max_zones_per_kind", self.max_zones_per_kind),
            ("volume_length", self.volume_length),
            ("body_length", self.body_length),
            ("atr_length", self.atr_length),
        ];
        for (name, value) in lengths {
            if value == 0 {
                return Err(invalid(format!("{} must be greater than 0", name)));
            }
        }
        if self.fast_length >= self.slow_length {
            return Err(invalid("fast_length must be less than slow_length"));
        }

        if !(self.rsi_oversold > 0.0
            && self.rsi_oversold < self.rsi_overbought
            && self.rsi_overbought < 100.0)
        {
            return Err(invalid(format!(
                "RSI thresholds must satisfy 0 < oversold < overbought < 100 (got {} / {})",
                self.rsi_oversold, self.rsi_overbought
            )));
        }

        let non_negative = [
            ("consolidation_ma_pct", self.consolidation_ma_pct),
            ("consolidation_range_pct", self.consolidation_range_pct),
            ("retest_tolerance_pct", self.retest_tolerance_pct),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{} must be a non-negative number", name)));
            }
        }

        let positive = [
            ("tick_size", self.tick_size),
            ("zone_height_ticks", self.zone_height_ticks),
            ("body_strength_mult", self.body_strength_mult),
            ("profit_factor", self.profit_factor),
            ("stop_factor", self.stop_factor),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{} must be greater than 0", name)));
            }
        }

        if self.utc_offset_minutes.unsigned_abs() >= 24 * 60 {
            return Err(invalid("utc_offset_minutes must be within one day"));
        }

        Ok(())
    }

    /// Window sizes for the indicator core.
    pub fn indicator_settings(&self) -> IndicatorSettings {
        IndicatorSettings {
            ma_kind: self.ma_kind,
            fast_length: self.fast_length,
            slow_length: self.slow_length,
            rsi_length: self.rsi_length,
            atr_length: self.atr_length,
            volume_length: self.volume_length,
            body_length: self.body_length,
        }
    }

    /// Zone height in price units.
    pub fn zone_height(&self) -> f64 {
        self.zone_height_ticks * self.tick_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();
        config.fast_length = 30;
        config.slow_length = 20;
        assert!(config.validate().is_err());

        let config = EngineConfig {
            max_zones_per_kind: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(EngineError::InvalidConfiguration(
                "max_zones_per_kind must be greater than 0".into()
            ))
        );

        let config = EngineConfig {
            rsi_oversold: 80.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            consolidation_range_pct: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            stop_factor: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            utc_offset_minutes: 1440,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zone_height() {
        let config = EngineConfig {
            tick_size: 0.01,
            zone_height_ticks: 2.0,
            ..Default::default()
        };
        assert!((config.zone_height() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"fast_length": 5, "orb_window": "0930-1000"}"#).unwrap();
        assert_eq!(config.fast_length, 5);
        assert_eq!(config.slow_length, 21);
        assert_eq!(config.orb_window.end(), 600);
    }
}
