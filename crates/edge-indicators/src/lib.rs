//! Streaming technical indicators.
//!
//! This crate provides incremental implementations of the indicators the
//! signal engine needs, each updated in O(1) amortized time per bar:
//! - Moving averages (SMA, EMA, WMA, VWMA)
//! - Momentum (Wilder RSI)
//! - Volatility (ATR)
//! - The `IndicatorCore` aggregate that turns each bar into an `IndicatorSnapshot`
//!
//! Lookback access into recent history goes through `RingBuffer`, a
//! fixed-capacity window that never grows past its configured size.

pub mod snapshot;
pub mod momentum;
pub mod moving_average;
pub mod volatility;
pub mod window;

pub use snapshot::{IndicatorCore, IndicatorSettings, IndicatorSnapshot};
pub use momentum::Rsi;
pub use moving_average::{Ema, MaKind, MovingAverage, Sma, Vwma, Wma};
pub use volatility::Atr;
pub use window::RingBuffer;
