//! Error types for the signal engine.

use thiserror::Error;

/// Errors raised while constructing an engine or ingesting bars.
///
/// Warm-up is not an error: outputs computed before the rolling windows
/// fill carry `warm = false` instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Timestamp not strictly greater than the previous accepted bar.
    #[error("Out of order bar: timestamp {timestamp} is not after {previous}")]
    OutOfOrderBar { timestamp: i64, previous: i64 },

    #[error("Invalid bar: {0}")]
    InvalidBar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Bar source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
