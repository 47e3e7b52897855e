//! Async property sets with lifecycle notifications
//!
//! Run with `RUST_LOG=propset=debug` to see every dispatched action.

use propset::{Action, AsyncStatus, ProducerError, PropState, Snapshot, Store};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

type Profile = Snapshot<&'static str, String>;

/// Mirrors the lifecycle into a `status` property.
fn status_reducer(state: &Profile, action: &Action<Profile>) -> Profile {
    match action {
        Action::NotifySetPropAsync(notify) if notify.status != AsyncStatus::Success => state
            .with_prop(&"status", notify.status.to_string())
            .unwrap_or_else(|_| state.clone()),
        _ => state.clone(),
    }
}

async fn fetch_name(id: u32) -> Result<String, ProducerError> {
    tokio::time::sleep(Duration::from_millis(200)).await;
    match id {
        1 => Ok("Ada".to_string()),
        _ => Err(format!("no user with id {id}").into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), propset::StoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Async Profile ===\n");

    let store: Store<Profile> = Store::builder()
        .default_state([("name", "unknown".to_string())].into_iter().collect())
        .reducer(status_reducer)
        .build()?;

    store.subscribe(|state| {
        println!(
            "   [State] name: {:?}, status: {:?}",
            state.get(&"name"),
            state.get(&"status")
        );
    });

    println!("1. Loading an existing user");
    store.dispatch(Action::set_prop_async("name", || fetch_name(1)));
    store.settled().await;

    println!("\n2. Loading a missing user");
    store.dispatch(Action::set_prop_async("name", || fetch_name(7)));
    store.settled().await;

    println!("\nFinal state: {:?}", store.get());
    Ok(())
}
