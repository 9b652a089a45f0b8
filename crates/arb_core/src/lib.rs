//! Cross-bookmaker entity resolution and arbitrage detection.
//!
//! The engine takes two immutable raw snapshots (one per bookmaker) and
//! runs them through a pure, single-threaded pipeline:
//!
//! raw rows → normalized quotes → matched events → classified markets
//! → aligned outcome pairs → evaluated opportunities → emitted notifications
//!
//! Everything up to emission is side-effect free; the emitter is the only
//! component that talks to the outside world (via the [`emit::Notifier`]
//! port).

pub mod align;
pub mod classify;
pub mod config;
pub mod emit;
pub mod evaluate;
pub mod events;
pub mod normalize;
pub mod pipeline;
pub mod similarity;
pub mod sport;

pub use align::OutcomePair;
pub use classify::{MarketFamily, MarketTag, Side, TaggedQuote, Timeframe};
pub use config::EngineConfig;
pub use emit::Notifier;
pub use evaluate::Opportunity;
pub use events::EventMatch;
pub use normalize::Quote;
pub use pipeline::{run, FamilyTable, RunResult, RunStats};
pub use sport::SportProfile;
