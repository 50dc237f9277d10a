//! Core traits for the signal engine.

mod bar_source;
mod indicator;

pub use bar_source::BarSource;
pub use indicator::StreamingIndicator;
