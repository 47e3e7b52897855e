use super::{Middleware, Next};
use crate::action::{Action, AsyncStatus, NotifySetPropAsync, SetProp};
use crate::error::ProducerError;
use crate::state::PropState;
use crate::store::Store;
use futures::FutureExt;
use std::panic::{self, AssertUnwindSafe};
use std::pin::pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Notify;

/// Count of producers that have started but not yet settled.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    fn begin(self: &Arc<Self>) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            in_flight: Arc::clone(self),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Resolve once no producer is in flight.
    pub(crate) async fn settled(&self) {
        loop {
            let mut notified = pin!(self.idle.notified());
            notified.as_mut().enable();
            if self.len() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Released on drop, including when a settle handler unwinds.
struct InFlightGuard {
    in_flight: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.in_flight.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.in_flight.idle.notify_waiters();
        }
    }
}

/// Turns `SET_PROP_ASYNC` actions into a lifecycle of notifications and a
/// final `SET_PROP` commit.
///
/// For each async set it:
/// 1. forwards the action unchanged (the reducer absorbs it)
/// 2. dispatches `start`
/// 3. calls the producer once
/// 4. on success dispatches `success` and then `SET_PROP` with the value
/// 5. on failure dispatches `error` and leaves the snapshot alone
/// 6. always dispatches `end` last
///
/// Requests are independent. Nothing is coalesced or cancelled, so two
/// requests for one property commit in the order they settle.
#[derive(Debug)]
pub struct AsyncSetPropMiddleware {
    runtime: Handle,
    in_flight: Arc<InFlight>,
}

impl AsyncSetPropMiddleware {
    /// Run producer continuations on `runtime`.
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            in_flight: Arc::new(InFlight::default()),
        }
    }

    pub(crate) fn in_flight(&self) -> Arc<InFlight> {
        Arc::clone(&self.in_flight)
    }
}

impl<S, C> Middleware<S, C> for AsyncSetPropMiddleware
where
    S: PropState,
    C: Send + 'static,
{
    fn handle(&self, store: &Store<S, C>, mut action: Action<S, C>, next: Next<'_, S, C>) {
        let request = match &mut action {
            Action::SetPropAsync(set) => {
                let producer = set.take_producer();
                if producer.is_none() {
                    tracing::debug!(prop = ?set.prop, "async set without producer ignored");
                }
                producer.map(|producer| (set.prop.clone(), producer))
            }
            _ => None,
        };

        next.run(action);

        let Some((prop, producer)) = request else {
            return;
        };

        store.dispatch(Action::notify(prop.clone(), AsyncStatus::Start));

        let guard = self.in_flight.begin();
        // A producer may panic before handing back its future.
        let started = panic::catch_unwind(AssertUnwindSafe(producer));
        let store = store.clone();
        self.runtime.spawn(async move {
            let _guard = guard;
            let outcome = match started {
                Ok(pending) => match AssertUnwindSafe(pending).catch_unwind().await {
                    Ok(outcome) => outcome,
                    Err(_) => Err(ProducerError::from("producer panicked")),
                },
                Err(_) => Err(ProducerError::from("producer panicked")),
            };
            settle(&store, prop, outcome);
        });
    }
}

fn settle<S, C>(store: &Store<S, C>, prop: S::Prop, outcome: Result<S::Value, ProducerError>)
where
    S: PropState,
    C: Send + 'static,
{
    let handled = panic::catch_unwind(AssertUnwindSafe(|| match outcome {
        Ok(value) => {
            tracing::debug!(prop = ?prop, "async set resolved");
            let success = NotifySetPropAsync::new(prop.clone(), AsyncStatus::Success)
                .with_response(value.clone());
            store.dispatch(success);
            store.dispatch(SetProp::new(prop.clone(), value));
        }
        Err(err) => {
            tracing::debug!(prop = ?prop, error = %err, "async set rejected");
            store.dispatch(Action::notify(prop.clone(), AsyncStatus::Error));
        }
    }));

    store.dispatch(Action::notify(prop, AsyncStatus::End));

    if let Err(payload) = handled {
        panic::resume_unwind(payload);
    }
}
