//! Bar source trait definitions.

use crate::error::DataError;
use crate::types::Bar;
use async_trait::async_trait;

/// Trait for historical bar sources.
///
/// Sources hand bars over in their stored order; ordering is enforced by
/// the engine, which rejects out-of-order bars.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Load every bar available for a symbol, oldest first.
    async fn load_bars(&self, symbol: &str) -> Result<Vec<Bar>, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}
