//! Core types and traits for the signal engine.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar) and the exchange-local session clock
//! - Output events consumed by presentation layers (signals, zones, chop, ORB)
//! - The error taxonomy shared by every crate
//! - Core traits for streaming indicators and bar sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{DataError, EngineError};
pub use types::*;
pub use traits::*;
