//! Bar sources for the signal engine.
//!
//! Loaders only parse; ordering and validity are enforced by the engine.

mod csv_source;

pub use csv_source::CsvDataSource;
