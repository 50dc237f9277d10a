//! Logging setup and the engine event journal.

mod journal;
mod logging;

pub use journal::{render_text, EventJournal, JournalFormat, JournalSummary};
pub use logging::setup_logging;
