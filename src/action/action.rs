use crate::error::ProducerError;
use crate::state::PropState;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;

/// Zero-argument function producing the eventual value of an async set.
pub type Producer<V> = Box<dyn FnOnce() -> BoxFuture<'static, Result<V, ProducerError>> + Send>;

fn boxed_producer<V, F, Fut, E>(producer: F) -> Producer<V>
where
    V: Send + 'static,
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
    E: Into<ProducerError>,
{
    Box::new(move || producer().map(|result| result.map_err(Into::into)).boxed())
}

/// Discriminant shared by every action shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SetProp,
    SetPropAsync,
    NotifySetPropAsync,
    Custom,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::SetProp => "SET_PROP",
            ActionKind::SetPropAsync => "SET_PROP_ASYNC",
            ActionKind::NotifySetPropAsync => "NOTIFY_SET_PROP_ASYNC",
            ActionKind::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle stage of one async set.
///
/// A single request always reports `Start`, then `Success` or `Error`, then `End`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AsyncStatus {
    Start,
    Success,
    Error,
    End,
}

impl AsyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AsyncStatus::Start => "start",
            AsyncStatus::Success => "success",
            AsyncStatus::Error => "error",
            AsyncStatus::End => "end",
        }
    }
}

impl fmt::Display for AsyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assign `payload` to `prop`.
///
/// An action without a payload is malformed and reduces to the unchanged
/// snapshot.
pub struct SetProp<S: PropState> {
    pub prop: S::Prop,
    pub payload: Option<S::Value>,
}

impl<S: PropState> SetProp<S> {
    pub fn new(prop: S::Prop, payload: S::Value) -> Self {
        Self {
            prop,
            payload: Some(payload),
        }
    }

    /// A set action with no payload.
    pub fn without_payload(prop: S::Prop) -> Self {
        Self {
            prop,
            payload: None,
        }
    }
}

impl<S: PropState> Clone for SetProp<S> {
    fn clone(&self) -> Self {
        Self {
            prop: self.prop.clone(),
            payload: self.payload.clone(),
        }
    }
}

impl<S: PropState> fmt::Debug for SetProp<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetProp")
            .field("prop", &self.prop)
            .field("payload", &self.payload)
            .finish()
    }
}

/// Assign the eventual result of `producer` to `prop`.
///
/// Reducers never apply this action. It exists for the async set middleware,
/// which takes the producer out before forwarding the action, so the producer
/// can run at most once.
pub struct SetPropAsync<S: PropState> {
    pub prop: S::Prop,
    producer: Option<Producer<S::Value>>,
}

impl<S: PropState> SetPropAsync<S> {
    pub fn new<F, Fut, E>(prop: S::Prop, producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<S::Value, E>> + Send + 'static,
        E: Into<ProducerError>,
    {
        Self::from_producer(prop, boxed_producer(producer))
    }

    pub fn from_producer(prop: S::Prop, producer: Producer<S::Value>) -> Self {
        Self {
            prop,
            producer: Some(producer),
        }
    }

    /// Detach the producer. Returns `None` once it has been taken.
    pub fn take_producer(&mut self) -> Option<Producer<S::Value>> {
        self.producer.take()
    }

    /// Whether the producer is still attached.
    pub fn is_pending(&self) -> bool {
        self.producer.is_some()
    }
}

impl<S: PropState> fmt::Debug for SetPropAsync<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let producer = if self.is_pending() { "pending" } else { "taken" };
        f.debug_struct("SetPropAsync")
            .field("prop", &self.prop)
            .field("producer", &producer)
            .finish()
    }
}

/// Progress report for an async set. Never changes the snapshot by itself.
pub struct NotifySetPropAsync<S: PropState> {
    pub prop: S::Prop,
    pub status: AsyncStatus,
    /// Resolved value, present on `Success` only.
    pub response: Option<S::Value>,
}

impl<S: PropState> NotifySetPropAsync<S> {
    pub fn new(prop: S::Prop, status: AsyncStatus) -> Self {
        Self {
            prop,
            status,
            response: None,
        }
    }

    pub fn with_response(mut self, response: S::Value) -> Self {
        self.response = Some(response);
        self
    }
}

impl<S: PropState> Clone for NotifySetPropAsync<S> {
    fn clone(&self) -> Self {
        Self {
            prop: self.prop.clone(),
            status: self.status,
            response: self.response.clone(),
        }
    }
}

impl<S: PropState> fmt::Debug for NotifySetPropAsync<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifySetPropAsync")
            .field("prop", &self.prop)
            .field("status", &self.status)
            .field("response", &self.response)
            .finish()
    }
}

/// Everything that flows through a store's dispatch pipeline.
///
/// `C` is the application's own action type and defaults to `()` for
/// stores that only set properties.
pub enum Action<S: PropState, C = ()> {
    SetProp(SetProp<S>),
    SetPropAsync(SetPropAsync<S>),
    NotifySetPropAsync(NotifySetPropAsync<S>),
    Custom(C),
}

impl<S: PropState, C> Action<S, C> {
    pub fn set_prop(prop: S::Prop, payload: S::Value) -> Self {
        Action::SetProp(SetProp::new(prop, payload))
    }

    pub fn set_prop_async<F, Fut, E>(prop: S::Prop, producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<S::Value, E>> + Send + 'static,
        E: Into<ProducerError>,
    {
        Action::SetPropAsync(SetPropAsync::new(prop, producer))
    }

    pub fn notify(prop: S::Prop, status: AsyncStatus) -> Self {
        Action::NotifySetPropAsync(NotifySetPropAsync::new(prop, status))
    }

    pub fn custom(action: C) -> Self {
        Action::Custom(action)
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::SetProp(_) => ActionKind::SetProp,
            Action::SetPropAsync(_) => ActionKind::SetPropAsync,
            Action::NotifySetPropAsync(_) => ActionKind::NotifySetPropAsync,
            Action::Custom(_) => ActionKind::Custom,
        }
    }

    /// The property this action targets, if it is one of the set actions.
    pub fn prop(&self) -> Option<&S::Prop> {
        match self {
            Action::SetProp(action) => Some(&action.prop),
            Action::SetPropAsync(action) => Some(&action.prop),
            Action::NotifySetPropAsync(action) => Some(&action.prop),
            Action::Custom(_) => None,
        }
    }
}

impl<S: PropState, C: fmt::Debug> fmt::Debug for Action<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::SetProp(action) => fmt::Debug::fmt(action, f),
            Action::SetPropAsync(action) => fmt::Debug::fmt(action, f),
            Action::NotifySetPropAsync(action) => fmt::Debug::fmt(action, f),
            Action::Custom(action) => f.debug_tuple("Custom").field(action).finish(),
        }
    }
}

impl<S: PropState, C> From<SetProp<S>> for Action<S, C> {
    fn from(action: SetProp<S>) -> Self {
        Action::SetProp(action)
    }
}

impl<S: PropState, C> From<SetPropAsync<S>> for Action<S, C> {
    fn from(action: SetPropAsync<S>) -> Self {
        Action::SetPropAsync(action)
    }
}

impl<S: PropState, C> From<NotifySetPropAsync<S>> for Action<S, C> {
    fn from(action: NotifySetPropAsync<S>) -> Self {
        Action::NotifySetPropAsync(action)
    }
}

/// Caller-facing request to set a property now.
pub struct SetPropIntent<S: PropState> {
    pub prop: S::Prop,
    pub payload: S::Value,
}

impl<S: PropState> SetPropIntent<S> {
    pub fn new(prop: S::Prop, payload: S::Value) -> Self {
        Self { prop, payload }
    }
}

impl<S: PropState> From<SetPropIntent<S>> for SetProp<S> {
    fn from(intent: SetPropIntent<S>) -> Self {
        SetProp::new(intent.prop, intent.payload)
    }
}

impl<S: PropState, C> From<SetPropIntent<S>> for Action<S, C> {
    fn from(intent: SetPropIntent<S>) -> Self {
        Action::SetProp(intent.into())
    }
}

/// Caller-facing request to set a property from a producer.
pub struct SetPropAsyncIntent<S: PropState> {
    pub prop: S::Prop,
    pub producer: Producer<S::Value>,
}

impl<S: PropState> SetPropAsyncIntent<S> {
    pub fn new<F, Fut, E>(prop: S::Prop, producer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<S::Value, E>> + Send + 'static,
        E: Into<ProducerError>,
    {
        Self {
            prop,
            producer: boxed_producer(producer),
        }
    }
}

impl<S: PropState> From<SetPropAsyncIntent<S>> for SetPropAsync<S> {
    fn from(intent: SetPropAsyncIntent<S>) -> Self {
        SetPropAsync::from_producer(intent.prop, intent.producer)
    }
}

impl<S: PropState, C> From<SetPropAsyncIntent<S>> for Action<S, C> {
    fn from(intent: SetPropAsyncIntent<S>) -> Self {
        Action::SetPropAsync(intent.into())
    }
}
