//! CLI command implementations.

pub mod default_config;
pub mod replay;
pub mod validate;
