//! The boundary to the remote document store.
//!
//! Panels talk to the backend only through [`RemoteStore`]. Responses are
//! matched to the newest request per cache key by [`RequestTracker`] so a slow
//! response can never overwrite newer local state.

mod http;
mod memory;
mod remote;
mod tracker;

pub use http::HttpRemoteStore;
pub use memory::MemoryRemoteStore;
pub use remote::RemoteStore;
pub use tracker::{RequestTicket, RequestTracker};
