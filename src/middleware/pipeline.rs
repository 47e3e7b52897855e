use crate::action::Action;
use crate::state::PropState;
use crate::store::Store;

/// A stage in a store's dispatch pipeline.
///
/// `store` dispatches new actions from the top of the pipeline; `next`
/// forwards `action` to the following stage and finally to the reducer.
/// A middleware that never calls `next.run` swallows the action.
pub trait Middleware<S: PropState, C>: Send + Sync {
    fn handle(&self, store: &Store<S, C>, action: Action<S, C>, next: Next<'_, S, C>);
}

/// The remainder of the pipeline after the current middleware.
pub struct Next<'a, S: PropState, C> {
    store: &'a Store<S, C>,
    rest: &'a [Box<dyn Middleware<S, C>>],
}

impl<'a, S: PropState, C> Next<'a, S, C> {
    pub(crate) fn new(store: &'a Store<S, C>, rest: &'a [Box<dyn Middleware<S, C>>]) -> Self {
        Self { store, rest }
    }

    /// Forward `action` to the next stage.
    pub fn run(self, action: Action<S, C>) {
        match self.rest.split_first() {
            Some((head, rest)) => head.handle(self.store, action, Next::new(self.store, rest)),
            None => self.store.reduce(action),
        }
    }
}
