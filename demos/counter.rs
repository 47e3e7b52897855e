//! Direct property sets with a custom reducer

use propset::{Action, PropState, SetPropIntent, Snapshot, Store};

#[derive(Debug)]
enum CounterAction {
    Increment,
    Reset,
}

type Counter = Snapshot<&'static str, i64>;

fn counter_reducer(state: &Counter, action: &Action<Counter, CounterAction>) -> Counter {
    let count = state.get(&"count").copied().unwrap_or_default();
    let next = match action {
        Action::Custom(CounterAction::Increment) => count + state.get(&"step").copied().unwrap_or(1),
        Action::Custom(CounterAction::Reset) => 0,
        _ => return state.clone(),
    };
    state.with_prop(&"count", next).unwrap_or_else(|_| state.clone())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), propset::StoreError> {
    println!("=== Counter ===\n");

    let store: Store<Counter, CounterAction> = Store::builder()
        .default_state([("count", 0), ("step", 1)].into_iter().collect())
        .reducer(counter_reducer)
        .build()?;

    store.subscribe(|state| {
        println!(
            "   [State] count: {:?}, step: {:?}",
            state.get(&"count"),
            state.get(&"step")
        );
    });

    println!("1. Incrementing by the default step");
    store.dispatch(Action::custom(CounterAction::Increment));

    println!("\n2. Setting the step property directly");
    let set = store.setter();
    set(SetPropIntent::new("step", 5));
    store.dispatch(Action::custom(CounterAction::Increment));

    println!("\n3. Resetting");
    store.dispatch(Action::custom(CounterAction::Reset));

    println!("\nFinal state: {:?}", store.get());
    Ok(())
}
