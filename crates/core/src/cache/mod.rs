//! Decision cache: salted fingerprint keys over a pluggable store.

pub mod keys;
pub mod memory;
pub mod ports;
pub mod sweeper;

pub use keys::DecisionKeyer;
pub use memory::ResultCache;
pub use ports::DecisionStore;
pub use sweeper::CacheSweeper;
