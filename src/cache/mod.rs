//! Timestamped local snapshots of panel state.
//!
//! A snapshot survives reloads for the freshness window. When it is read back,
//! stages registered since it was written get default entries so the cache
//! never silently drops a known stage.

mod debounce;
mod entry;
mod local;

pub use debounce::Debouncer;
pub use entry::{reconcile_stages, CacheEntry, Reconciled};
pub use local::LocalCache;
