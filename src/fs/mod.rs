//! Local persistence backends for the panel cache.

pub mod locking;
pub mod store;

pub use store::{FileStore, LocalStore, MemoryStore};
