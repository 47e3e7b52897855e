use crate::action::{Action, SetProp};
use crate::state::PropState;
use std::fmt;

/// Application reducer for actions the root reducer does not handle itself.
///
/// It receives custom actions and async lifecycle notifications. Any
/// `Fn(&S, &Action<S, C>) -> S` closure is a reducer.
pub trait Reducer<S: PropState, C>: Send + Sync {
    fn reduce(&self, state: &S, action: &Action<S, C>) -> S;
}

impl<S, C, F> Reducer<S, C> for F
where
    S: PropState,
    F: Fn(&S, &Action<S, C>) -> S + Send + Sync,
{
    fn reduce(&self, state: &S, action: &Action<S, C>) -> S {
        self(state, action)
    }
}

/// Apply a direct set to `state`.
///
/// Returns a new snapshot with exactly `action.prop` replaced. A missing
/// payload, or a payload the snapshot rejects, yields an unchanged clone.
pub fn set_prop_reducer<S: PropState>(state: &S, action: &SetProp<S>) -> S {
    let Some(payload) = &action.payload else {
        tracing::debug!(prop = ?action.prop, "set action without payload ignored");
        return state.clone();
    };

    match state.with_prop(&action.prop, payload.clone()) {
        Ok(next) => next,
        Err(err) => {
            tracing::warn!(prop = ?action.prop, error = %err, "set action rejected");
            state.clone()
        }
    }
}

/// Routes actions by kind and owns the default snapshot.
pub struct RootReducer<S: PropState, C = ()> {
    default_state: Option<S>,
    custom: Option<Box<dyn Reducer<S, C>>>,
}

impl<S: PropState, C> RootReducer<S, C> {
    pub fn new() -> Self {
        Self {
            default_state: None,
            custom: None,
        }
    }

    /// Snapshot used when reducing without a current snapshot.
    pub fn with_default(mut self, state: S) -> Self {
        self.default_state = Some(state);
        self
    }

    pub fn with_reducer(mut self, reducer: impl Reducer<S, C> + 'static) -> Self {
        self.custom = Some(Box::new(reducer));
        self
    }

    /// The default snapshot, or the empty one.
    pub fn initial_state(&self) -> S {
        self.default_state.clone().unwrap_or_default()
    }

    pub fn reduce(&self, state: Option<&S>, action: &Action<S, C>) -> S {
        let initial;
        let state = match state {
            Some(state) => state,
            None => {
                initial = self.initial_state();
                &initial
            }
        };

        match action {
            Action::SetProp(set) => set_prop_reducer(state, set),
            Action::SetPropAsync(set) => {
                if set.is_pending() {
                    // The producer was never taken, so nothing will ever run it.
                    tracing::warn!(
                        prop = ?set.prop,
                        "async set reached the reducer untouched; is the async set middleware installed?"
                    );
                }
                state.clone()
            }
            _ => match &self.custom {
                Some(custom) => custom.reduce(state, action),
                None => state.clone(),
            },
        }
    }
}

impl<S: PropState, C> Default for RootReducer<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PropState + fmt::Debug, C> fmt::Debug for RootReducer<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RootReducer")
            .field("default_state", &self.default_state)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{AsyncStatus, SetPropAsync};
    use crate::error::ProducerError;
    use crate::state::Snapshot;

    type State = Snapshot<&'static str, i64>;

    #[derive(Debug)]
    enum Counter {
        Increment,
        Noop,
    }

    fn counter_reducer(state: &State, action: &Action<State, Counter>) -> State {
        match action {
            Action::Custom(Counter::Increment) => {
                let count = state.get(&"count").copied().unwrap_or(0);
                state.with_prop(&"count", count + 1).unwrap_or_else(|_| state.clone())
            }
            Action::NotifySetPropAsync(notify) if notify.status == AsyncStatus::Start => {
                state.with_prop(&"loading", 1).unwrap_or_else(|_| state.clone())
            }
            _ => state.clone(),
        }
    }

    fn state(entries: &[(&'static str, i64)]) -> State {
        entries.iter().copied().collect()
    }

    #[test]
    fn set_prop_replaces_one_key() {
        let before = state(&[("count", 1), ("total", 4)]);
        let after = set_prop_reducer(&before, &SetProp::new("count", 5));

        assert_eq!(after, state(&[("count", 5), ("total", 4)]));
        assert_eq!(before, state(&[("count", 1), ("total", 4)]));
    }

    #[test]
    fn set_prop_without_payload_is_noop() {
        let before = state(&[("count", 1)]);
        let after = set_prop_reducer(&before, &SetProp::without_payload("count"));

        assert!(after.ptr_eq(&before));
    }

    #[test]
    fn set_prop_is_idempotent() {
        let reducer: RootReducer<State> = RootReducer::new();
        let action = Action::set_prop("count", 5);
        let start = state(&[("count", 1)]);

        let once = reducer.reduce(Some(&start), &action);
        let twice = reducer.reduce(Some(&once), &action);
        assert_eq!(once, twice);
    }

    #[test]
    fn root_applies_direct_set() {
        let reducer: RootReducer<State> = RootReducer::new();
        let next = reducer.reduce(Some(&state(&[("count", 1)])), &Action::set_prop("count", 5));

        assert_eq!(next, state(&[("count", 5)]));
    }

    #[test]
    fn root_uses_default_when_state_missing() {
        let reducer = RootReducer::new()
            .with_default(state(&[("count", 0)]))
            .with_reducer(counter_reducer);

        let next = reducer.reduce(None, &Action::custom(Counter::Noop));
        assert_eq!(next, state(&[("count", 0)]));
    }

    #[test]
    fn root_falls_back_to_empty_state() {
        let reducer: RootReducer<State> = RootReducer::new();
        let next = reducer.reduce(None, &Action::custom(()));

        assert!(next.is_empty());
    }

    #[test]
    fn root_absorbs_async_set() {
        let reducer = RootReducer::new().with_reducer(counter_reducer);
        let before = state(&[("count", 1)]);
        let mut action = SetPropAsync::<State>::new("count", || async { Ok::<_, ProducerError>(9) });
        let _producer = action.take_producer();

        let next = reducer.reduce(Some(&before), &Action::SetPropAsync(action));
        assert!(next.ptr_eq(&before));
    }

    #[test]
    fn root_routes_custom_and_notifications_to_custom_reducer() {
        let reducer = RootReducer::new().with_reducer(counter_reducer);
        let before = state(&[("count", 1)]);

        let next = reducer.reduce(Some(&before), &Action::custom(Counter::Increment));
        assert_eq!(next.get(&"count"), Some(&2));

        let next = reducer.reduce(Some(&before), &Action::notify("count", AsyncStatus::Start));
        assert_eq!(next.get(&"loading"), Some(&1));
    }

    #[test]
    fn root_without_custom_reducer_passes_through() {
        let reducer: RootReducer<State, Counter> = RootReducer::new();
        let before = state(&[("count", 1)]);

        let next = reducer.reduce(Some(&before), &Action::custom(Counter::Increment));
        assert!(next.ptr_eq(&before));
    }
}
