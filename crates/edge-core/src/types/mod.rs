//! Core data types for the signal engine.

mod events;
mod ohlcv;
mod session;

pub use events::{
    ChopEvent, Direction, EngineEvent, OrbEvent, SignalEvent, SignalSource, ZoneAction,
    ZoneEvent, ZoneKind,
};
pub use ohlcv::Bar;
pub use session::{Killzone, SessionClock, SessionWindow};
