//! A reducer-driven store with a middleware pipeline.
//!
//! The store owns the current snapshot, runs every dispatched action through
//! its middleware and the root reducer, and notifies subscribers after each
//! reduction. The async set middleware is always installed last.

mod store;

pub use store::{Store, StoreBuilder, SubscriptionId};
