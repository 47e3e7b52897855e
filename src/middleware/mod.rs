//! Dispatch pipeline stages.
//!
//! Middleware sees every action before the reducer does and decides when
//! (and whether) to pass it on:
//! - [`AsyncSetPropMiddleware`] - runs async set producers and reports their lifecycle
//! - [`LoggingMiddleware`] - traces every dispatched action

mod async_set;
mod logging;
mod pipeline;

pub(crate) use async_set::InFlight;
pub use async_set::AsyncSetPropMiddleware;
pub use logging::LoggingMiddleware;
pub use pipeline::{Middleware, Next};
