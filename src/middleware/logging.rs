use super::{Middleware, Next};
use crate::action::Action;
use crate::state::PropState;
use crate::store::Store;
use std::fmt::Debug;

/// Emits a `tracing` event for every action passing through.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingMiddleware;

impl<S: PropState, C: Debug> Middleware<S, C> for LoggingMiddleware {
    fn handle(&self, _store: &Store<S, C>, action: Action<S, C>, next: Next<'_, S, C>) {
        match &action {
            Action::NotifySetPropAsync(notify) => {
                tracing::debug!(kind = %action.kind(), prop = ?notify.prop, status = %notify.status, "dispatch");
            }
            _ => tracing::debug!(kind = %action.kind(), ?action, "dispatch"),
        }
        next.run(action);
    }
}
