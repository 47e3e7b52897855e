//! # Propset
//!
//! Single-property updates for reducer-driven state, including properties
//! whose value arrives asynchronously.
//!
//! ## Actions
//!
//! - `SET_PROP` - assign a value to one property of the snapshot
//! - `SET_PROP_ASYNC` - assign the eventual result of a producer
//! - `NOTIFY_SET_PROP_ASYNC` - `start`, `success`/`error`, `end` for each async set
//!
//! ## Pipeline
//!
//! - [`RootReducer`] applies direct sets, absorbs async sets and hands
//!   everything else to the application's reducer
//! - [`AsyncSetPropMiddleware`] runs producers on a tokio runtime and
//!   dispatches the lifecycle notifications and the final commit
//! - [`Store`] ties both together with subscriptions and user middleware

pub mod action;
pub mod error;
pub mod middleware;
pub mod reducer;
pub mod state;
pub mod store;

// Re-export main types for convenience
pub use action::{
    Action, ActionKind, AsyncStatus, NotifySetPropAsync, SetProp, SetPropAsync,
    SetPropAsyncIntent, SetPropIntent,
};
pub use error::{ProducerError, PropError, StoreError};
pub use middleware::{AsyncSetPropMiddleware, LoggingMiddleware, Middleware, Next};
pub use reducer::{set_prop_reducer, Reducer, RootReducer};
pub use state::{PropState, Snapshot};
pub use store::{Store, StoreBuilder, SubscriptionId};
