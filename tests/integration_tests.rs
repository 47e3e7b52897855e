//! Integration tests for Propset

use parking_lot::Mutex;
use propset::{
    Action, AsyncStatus, Middleware, Next, ProducerError, PropError, PropState, SetProp,
    SetPropAsyncIntent, SetPropIntent, Snapshot, Store,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq)]
struct Profile {
    count: i64,
    name: String,
    loading: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ProfileProp {
    Count,
    Name,
}

#[derive(Clone, Debug, PartialEq)]
enum ProfileValue {
    Count(i64),
    Name(String),
}

impl PropState for Profile {
    type Prop = ProfileProp;
    type Value = ProfileValue;

    fn with_prop(&self, prop: &ProfileProp, value: ProfileValue) -> Result<Self, PropError> {
        let mut next = self.clone();
        match (prop, value) {
            (ProfileProp::Count, ProfileValue::Count(count)) => next.count = count,
            (ProfileProp::Name, ProfileValue::Name(name)) => next.name = name,
            (prop, value) => return Err(PropError::mismatch(prop, value)),
        }
        Ok(next)
    }
}

#[derive(Debug)]
enum ProfileAction {
    Reset,
    Noop,
}

/// Tracks the loading flag from async notifications and handles `Reset`.
fn profile_reducer(state: &Profile, action: &Action<Profile, ProfileAction>) -> Profile {
    match action {
        Action::Custom(ProfileAction::Reset) => Profile::default(),
        Action::NotifySetPropAsync(notify) => match notify.status {
            AsyncStatus::Start => Profile {
                loading: true,
                ..state.clone()
            },
            AsyncStatus::End => Profile {
                loading: false,
                ..state.clone()
            },
            _ => state.clone(),
        },
        _ => state.clone(),
    }
}

/// Records the kind and status of every action.
#[derive(Clone, Default)]
struct ActionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ActionLog {
    fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    fn statuses(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|entry| !entry.starts_with("SET_PROP") && entry != "CUSTOM")
            .collect()
    }
}

impl<S: PropState, C> Middleware<S, C> for ActionLog {
    fn handle(&self, _store: &Store<S, C>, action: Action<S, C>, next: Next<'_, S, C>) {
        let entry = match &action {
            Action::NotifySetPropAsync(notify) => notify.status.to_string(),
            other => other.kind().to_string(),
        };
        self.entries.lock().push(entry);
        next.run(action);
    }
}

fn profile_store(log: &ActionLog, initial: Profile) -> Store<Profile, ProfileAction> {
    Store::builder()
        .default_state(initial)
        .reducer(profile_reducer)
        .middleware(log.clone())
        .build()
        .unwrap()
}

#[tokio::test]
async fn direct_set_replaces_value() {
    let store: Store<Snapshot<&str, i64>> = Store::builder()
        .default_state([("count", 1)].into_iter().collect())
        .build()
        .unwrap();

    store.dispatch(Action::set_prop("count", 5));

    assert_eq!(store.get(), [("count", 5)].into_iter().collect());
}

#[tokio::test(start_paused = true)]
async fn async_set_resolves_after_delay() {
    let log = ActionLog::default();
    let store = profile_store(
        &log,
        Profile {
            name: "a".to_string(),
            ..Profile::default()
        },
    );

    store.dispatch(Action::set_prop_async(ProfileProp::Name, || async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok::<_, ProducerError>(ProfileValue::Name("b".to_string()))
    }));
    assert!(store.get().loading);

    store.settled().await;

    assert_eq!(log.statuses(), ["start", "success", "end"]);
    assert_eq!(
        log.entries(),
        ["SET_PROP_ASYNC", "start", "success", "SET_PROP", "end"]
    );
    let state = store.get();
    assert_eq!(state.name, "b");
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn async_set_rejection_keeps_state() {
    let log = ActionLog::default();
    let store = profile_store(
        &log,
        Profile {
            name: "a".to_string(),
            ..Profile::default()
        },
    );

    store.set_state_prop_async(SetPropAsyncIntent::new(ProfileProp::Name, || async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Err::<ProfileValue, _>("service unavailable")
    }));
    store.settled().await;

    assert_eq!(log.statuses(), ["start", "error", "end"]);
    assert!(!log.entries().iter().any(|entry| entry == "SET_PROP"));
    assert_eq!(store.get().name, "a");
}

#[tokio::test]
async fn default_state_survives_noop_action() {
    let log = ActionLog::default();
    let store = profile_store(
        &log,
        Profile {
            count: 7,
            ..Profile::default()
        },
    );

    store.dispatch(Action::custom(ProfileAction::Noop));

    assert_eq!(
        store.get(),
        Profile {
            count: 7,
            ..Profile::default()
        }
    );
}

#[tokio::test]
async fn custom_actions_reach_custom_reducer() {
    let log = ActionLog::default();
    let store = profile_store(&log, Profile::default());

    store.set_state_prop(SetPropIntent::new(ProfileProp::Count, ProfileValue::Count(3)));
    assert_eq!(store.get().count, 3);

    store.dispatch(Action::custom(ProfileAction::Reset));
    assert_eq!(store.get().count, 0);
}

#[tokio::test]
async fn mismatched_value_is_ignored() {
    let log = ActionLog::default();
    let store = profile_store(&log, Profile::default());
    let before = store.get();

    store.dispatch(SetProp::new(
        ProfileProp::Count,
        ProfileValue::Name("oops".to_string()),
    ));
    store.dispatch(SetProp::without_payload(ProfileProp::Count));

    assert_eq!(store.get(), before);
}

#[tokio::test]
async fn repeated_set_is_idempotent() {
    let log = ActionLog::default();
    let store = profile_store(&log, Profile::default());

    store.dispatch(Action::set_prop(ProfileProp::Count, ProfileValue::Count(9)));
    let once = store.get();
    store.dispatch(Action::set_prop(ProfileProp::Count, ProfileValue::Count(9)));

    assert_eq!(store.get(), once);
}

#[tokio::test(start_paused = true)]
async fn concurrent_sets_on_different_props() {
    let log = ActionLog::default();
    let store = profile_store(&log, Profile::default());

    store.dispatch(Action::set_prop_async(ProfileProp::Name, || async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        Ok::<_, ProducerError>(ProfileValue::Name("late".to_string()))
    }));
    store.dispatch(Action::set_prop_async(ProfileProp::Count, || async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok::<_, ProducerError>(ProfileValue::Count(42))
    }));
    assert_eq!(store.in_flight(), 2);

    store.settled().await;

    let state = store.get();
    assert_eq!(state.count, 42);
    assert_eq!(state.name, "late");
    assert_eq!(
        log.statuses(),
        ["start", "start", "success", "end", "success", "end"]
    );
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_each_commit() {
    let log = ActionLog::default();
    let store = profile_store(&log, Profile::default());
    let commits = Arc::new(AtomicUsize::new(0));

    let seen = Arc::clone(&commits);
    store.subscribe(move |state: &Profile| {
        if state.name == "done" {
            seen.fetch_add(1, Ordering::SeqCst);
        }
    });

    let set_async = store.async_setter();
    set_async(SetPropAsyncIntent::new(ProfileProp::Name, || async {
        Ok::<_, ProducerError>(ProfileValue::Name("done".to_string()))
    }));
    store.settled().await;

    // The commit and the trailing `end` notification both reduce to a snapshot named "done".
    assert_eq!(commits.load(Ordering::SeqCst), 2);
}
