use crate::action::{Action, SetPropAsyncIntent, SetPropIntent};
use crate::error::StoreError;
use crate::middleware::{AsyncSetPropMiddleware, InFlight, LoggingMiddleware, Middleware, Next};
use crate::reducer::{Reducer, RootReducer};
use crate::state::PropState;
use parking_lot::{ReentrantMutex, RwLock};
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;

type Subscriber<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Handle returned by [`Store::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

struct StoreInner<S: PropState, C> {
    state: RwLock<S>,
    dispatch_lock: ReentrantMutex<()>,
    reducer: RootReducer<S, C>,
    middlewares: Vec<Box<dyn Middleware<S, C>>>,
    subscribers: RwLock<Vec<(SubscriptionId, Subscriber<S>)>>,
    next_subscription: AtomicUsize,
    in_flight: Arc<InFlight>,
}

/// A thread-safe store for property-shaped state.
///
/// Cloning a store yields another handle to the same state.
///
/// # Example
///
/// ```
/// use propset::{Action, Snapshot, Store};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store: Store<Snapshot<&str, i64>> = Store::builder()
///     .default_state([("count", 1)].into_iter().collect())
///     .build()
///     .unwrap();
///
/// store.dispatch(Action::set_prop("count", 5));
/// assert_eq!(store.get().get(&"count"), Some(&5));
/// # }
/// ```
pub struct Store<S: PropState, C = ()> {
    inner: Arc<StoreInner<S, C>>,
}

impl<S: PropState, C: Debug + Send + 'static> Store<S, C> {
    pub fn builder() -> StoreBuilder<S, C> {
        StoreBuilder::new()
    }

    /// A setter bound to this store.
    pub fn setter(&self) -> impl Fn(SetPropIntent<S>) + Send + Sync + 'static {
        let store = self.clone();
        move |intent| store.set_state_prop(intent)
    }

    /// An async setter bound to this store.
    pub fn async_setter(&self) -> impl Fn(SetPropAsyncIntent<S>) + Send + Sync + 'static {
        let store = self.clone();
        move |intent| store.set_state_prop_async(intent)
    }
}

impl<S: PropState, C> Store<S, C> {
    /// Run `action` through the middleware pipeline and the reducer.
    pub fn dispatch(&self, action: impl Into<Action<S, C>>) {
        Next::new(self, &self.inner.middlewares).run(action.into());
    }

    /// Dispatch a direct set.
    pub fn set_state_prop(&self, intent: SetPropIntent<S>) {
        self.dispatch(intent);
    }

    /// Dispatch an async set.
    pub fn set_state_prop_async(&self, intent: SetPropAsyncIntent<S>) {
        self.dispatch(intent);
    }

    /// Get a clone of the current snapshot.
    pub fn get(&self) -> S {
        self.inner.state.read().clone()
    }

    /// Read the snapshot without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.inner.state.read();
        f(&*state)
    }

    /// Subscribe to state changes.
    ///
    /// The callback runs after every reduction with the new snapshot.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_subscription.fetch_add(1, Ordering::SeqCst));
        self.inner.subscribers.write().push((id, Arc::new(callback)));
        id
    }

    /// Remove a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.subscribers.write();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Number of async producers that have not settled yet.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.len()
    }

    /// Wait until every async producer has settled and its notifications
    /// have been dispatched.
    pub async fn settled(&self) {
        self.inner.in_flight.settled().await;
    }

    /// Terminal pipeline stage.
    ///
    /// Reduction and notification happen under one dispatch lock, so
    /// subscribers see snapshots in the order they were produced. The lock
    /// is reentrant because subscribers may dispatch.
    pub(crate) fn reduce(&self, action: Action<S, C>) {
        let _ordered = self.inner.dispatch_lock.lock();
        let next = {
            let mut state = self.inner.state.write();
            let next = self.inner.reducer.reduce(Some(&*state), &action);
            *state = next.clone();
            next
        };
        self.notify(&next);
    }

    fn notify(&self, state: &S) {
        // Snapshot the list so callbacks may subscribe or dispatch.
        let subscribers: Vec<Subscriber<S>> = self
            .inner
            .subscribers
            .read()
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();
        for subscriber in subscribers {
            subscriber(state);
        }
    }
}

impl<S: PropState, C> Clone for Store<S, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Configures and builds a [`Store`].
pub struct StoreBuilder<S: PropState, C = ()> {
    reducer: RootReducer<S, C>,
    middlewares: Vec<Box<dyn Middleware<S, C>>>,
    log_actions: bool,
    runtime: Option<Handle>,
}

impl<S: PropState, C: Debug + Send + 'static> StoreBuilder<S, C> {
    pub fn new() -> Self {
        Self {
            reducer: RootReducer::new(),
            middlewares: Vec::new(),
            log_actions: true,
            runtime: None,
        }
    }

    /// Initial snapshot. Defaults to `S::default()`.
    pub fn default_state(mut self, state: S) -> Self {
        self.reducer = self.reducer.with_default(state);
        self
    }

    /// Reducer for custom actions and async notifications.
    pub fn reducer(mut self, reducer: impl Reducer<S, C> + 'static) -> Self {
        self.reducer = self.reducer.with_reducer(reducer);
        self
    }

    /// Add a middleware. Middleware runs in insertion order, before the
    /// async set middleware.
    pub fn middleware(mut self, middleware: impl Middleware<S, C> + 'static) -> Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    /// Trace every dispatched action. On by default.
    pub fn log_actions(mut self, enabled: bool) -> Self {
        self.log_actions = enabled;
        self
    }

    /// Runtime for async set continuations. Defaults to the current one.
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build(self) -> Result<Store<S, C>, StoreError> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current()?,
        };
        let async_set = AsyncSetPropMiddleware::new(runtime);
        let in_flight = async_set.in_flight();

        let mut middlewares: Vec<Box<dyn Middleware<S, C>>> = Vec::new();
        if self.log_actions {
            middlewares.push(Box::new(LoggingMiddleware));
        }
        middlewares.extend(self.middlewares);
        middlewares.push(Box::new(async_set));

        tracing::debug!(middlewares = middlewares.len(), "store built");

        Ok(Store {
            inner: Arc::new(StoreInner {
                state: RwLock::new(self.reducer.initial_state()),
                dispatch_lock: ReentrantMutex::new(()),
                reducer: self.reducer,
                middlewares,
                subscribers: RwLock::new(Vec::new()),
                next_subscription: AtomicUsize::new(0),
                in_flight,
            }),
        })
    }
}

impl<S: PropState, C: Debug + Send + 'static> Default for StoreBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}
