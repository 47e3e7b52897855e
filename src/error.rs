//! Error types.

use thiserror::Error;

/// Boxed rejection reason returned by an async producer.
///
/// The reason is logged by the middleware but never attached to the
/// `error` notification.
pub type ProducerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while applying a value to a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropError {
    /// The value does not belong to the named property.
    #[error("value {value} does not fit property {prop}")]
    TypeMismatch { prop: String, value: String },
}

impl PropError {
    pub fn mismatch(prop: impl std::fmt::Debug, value: impl std::fmt::Debug) -> Self {
        PropError::TypeMismatch {
            prop: format!("{prop:?}"),
            value: format!("{value:?}"),
        }
    }
}

/// Errors raised while building a [`Store`](crate::Store).
#[derive(Debug, Error)]
pub enum StoreError {
    /// No tokio runtime was supplied and none is current.
    #[error("async set middleware needs a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
