//! Reducers for set-property actions.
//!
//! - [`set_prop_reducer`] applies one direct set to a snapshot
//! - [`RootReducer`] routes every action kind: direct sets are applied,
//!   async sets are absorbed, everything else goes to the application's
//!   own [`Reducer`]

mod reducer;

pub use reducer::{set_prop_reducer, Reducer, RootReducer};
