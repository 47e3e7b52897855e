//! The set-property action vocabulary.
//!
//! Every action carries an [`ActionKind`] discriminant so reducers and
//! middleware can branch on it without inspecting payloads:
//! - `SET_PROP` - assign a value to one property
//! - `SET_PROP_ASYNC` - assign the eventual result of a producer
//! - `NOTIFY_SET_PROP_ASYNC` - lifecycle progress of an async set
//! - anything else - application actions, opaque to this crate

mod action;

pub use action::{
    Action, ActionKind, AsyncStatus, NotifySetPropAsync, Producer, SetProp, SetPropAsync,
    SetPropAsyncIntent, SetPropIntent,
};
