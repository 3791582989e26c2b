//! The conversation runtime: the in-memory per-chat store and the router
//! that serializes each chat's turns onto its own worker.

pub mod router;
pub mod store;

pub use router::{ChatRouter, OutboundSink, TransportError, GENERIC_FAILURE_REPLY};
pub use store::MemoryStore;
