//! Snapshots and per-property typing.
//!
//! A snapshot is the full value held by a store at one instant. The store
//! replaces it on every reduction and never mutates it in place.

mod snapshot;

pub use snapshot::{PropState, Snapshot};
