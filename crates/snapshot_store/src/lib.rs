//! Snapshot loading and result persistence.
//!
//! Scrapers drop `{source}-{timestamp}.jsonl` files into a snapshot
//! directory; the store always reads the newest file per source by
//! modification time. Results go out two ways: a CSV export per run and
//! an append-only JSONL journal rotated daily.

pub mod store;
pub mod writer;

pub use store::SnapshotStore;
pub use writer::ResultWriter;
