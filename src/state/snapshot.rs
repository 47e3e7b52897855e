use crate::error::PropError;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// A state shape whose properties can be set one at a time.
///
/// `Prop` is the key domain and `Value` the per-key value lookup. For a typed
/// struct, `Value` is usually an enum with one variant per property and
/// [`with_prop`](PropState::with_prop) rejects variants that belong to a
/// different key.
///
/// `Default` is the empty snapshot used when a store starts without a
/// default state.
///
/// # Example
///
/// ```
/// use propset::{PropError, PropState};
///
/// #[derive(Clone, Default, Debug, PartialEq)]
/// struct Counter {
///     count: i64,
///     label: String,
/// }
///
/// #[derive(Clone, Copy, Debug, PartialEq)]
/// enum CounterProp {
///     Count,
///     Label,
/// }
///
/// #[derive(Clone, Debug)]
/// enum CounterValue {
///     Count(i64),
///     Label(String),
/// }
///
/// impl PropState for Counter {
///     type Prop = CounterProp;
///     type Value = CounterValue;
///
///     fn with_prop(&self, prop: &CounterProp, value: CounterValue) -> Result<Self, PropError> {
///         let mut next = self.clone();
///         match (prop, value) {
///             (CounterProp::Count, CounterValue::Count(v)) => next.count = v,
///             (CounterProp::Label, CounterValue::Label(v)) => next.label = v,
///             (prop, value) => return Err(PropError::mismatch(prop, value)),
///         }
///         Ok(next)
///     }
/// }
///
/// let state = Counter::default();
/// let next = state.with_prop(&CounterProp::Count, CounterValue::Count(5)).unwrap();
/// assert_eq!(next.count, 5);
/// assert_eq!(state.count, 0);
/// assert!(state.with_prop(&CounterProp::Label, CounterValue::Count(1)).is_err());
/// ```
pub trait PropState: Clone + Default + Send + Sync + 'static {
    type Prop: Clone + Debug + PartialEq + Send + Sync + 'static;
    type Value: Clone + Debug + Send + Sync + 'static;

    /// Return a new snapshot with `prop` overwritten by `value`.
    ///
    /// `self` must be left untouched.
    fn with_prop(&self, prop: &Self::Prop, value: Self::Value) -> Result<Self, PropError>;
}

/// An immutable property map.
///
/// Cloning is cheap. Setting a property copies the map, so older snapshots
/// stay valid and [`ptr_eq`](Snapshot::ptr_eq) tells whether two snapshots
/// are the same value without comparing entries.
#[derive(Debug)]
pub struct Snapshot<K, V> {
    entries: Arc<HashMap<K, V>>,
}

impl<K, V> Snapshot<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Whether both snapshots share the same underlying map.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl<K, V> Clone for Snapshot<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<K: Eq + Hash, V> Default for Snapshot<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for Snapshot<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.entries == other.entries
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for Snapshot<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl<K, V> PropState for Snapshot<K, V>
where
    K: Clone + Debug + Eq + Hash + Send + Sync + 'static,
    V: Clone + Debug + Send + Sync + 'static,
{
    type Prop = K;
    type Value = V;

    fn with_prop(&self, prop: &K, value: V) -> Result<Self, PropError> {
        let mut entries = HashMap::clone(&self.entries);
        entries.insert(prop.clone(), value);
        Ok(Self {
            entries: Arc::new(entries),
        })
    }
}
