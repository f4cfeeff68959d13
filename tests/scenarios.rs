use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};

use mappingbus::{Event, EventBus, Handler};

type Calls = Arc<Mutex<Vec<(String, Value)>>>;

fn tracked(name: &'static str) -> (Handler<Value>, Calls) {
    let calls = Calls::default();
    let log = Arc::clone(&calls);
    let h = Handler::from_fn(name, move |ev: Event<'_, Value>| {
        log.lock().push((ev.topic.to_string(), ev.payload.clone()));
    });
    (h, calls)
}

#[test]
fn reload_handler_called_once_with_payload() {
    let bus = EventBus::new();
    let (fn_a, calls) = tracked("fnA");
    bus.on("reload", &fn_a);

    bus.emit("reload", &json!(true));
    assert_eq!(*calls.lock(), vec![("reload".to_string(), json!(true))]);
}

#[test]
fn off_removes_only_the_given_handler() {
    let bus = EventBus::new();
    let (fn_a, a_calls) = tracked("fnA");
    let (fn_b, b_calls) = tracked("fnB");
    bus.on("x", &fn_a);
    bus.on("x", &fn_b);
    bus.off("x", &fn_a);

    bus.emit("x", &json!(1));
    assert!(a_calls.lock().is_empty());
    assert_eq!(*b_calls.lock(), vec![("x".to_string(), json!(1))]);
}

#[test]
fn wildcard_runs_after_topic_handler_with_topic_name() {
    let bus = EventBus::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    let wild_order = Arc::clone(&order);
    let fn_wild = Handler::from_fn("fnWild", move |ev: Event<'_, Value>| {
        wild_order
            .lock()
            .push(("wild", ev.topic.to_string(), ev.payload.clone()));
    });
    let y_order = Arc::clone(&order);
    let fn_y = Handler::from_fn("fnY", move |ev: Event<'_, Value>| {
        y_order
            .lock()
            .push(("y", ev.topic.to_string(), ev.payload.clone()));
    });
    bus.on("*", &fn_wild);
    bus.on("y", &fn_y);

    bus.emit("y", &json!({ "a": 1 }));
    assert_eq!(
        *order.lock(),
        vec![
            ("y", "y".to_string(), json!({ "a": 1 })),
            ("wild", "y".to_string(), json!({ "a": 1 })),
        ]
    );
}

#[test]
fn double_registration_needs_two_offs() {
    let bus = EventBus::new();
    let (fn_a, calls) = tracked("fnA");
    bus.on("z", &fn_a);
    bus.on("z", &fn_a);

    assert_eq!(bus.emit("z", &Value::Null).invoked, 2);
    assert_eq!(calls.lock().len(), 2);

    bus.off("z", &fn_a);
    assert_eq!(bus.emit("z", &Value::Null).invoked, 1);
    assert_eq!(calls.lock().len(), 3);
}

#[test]
fn emit_without_registrations_is_silent() {
    let bus: EventBus<Value> = EventBus::new();
    let delivery = bus.emit("neverRegistered", &json!(42));
    assert_eq!(delivery.invoked, 0);
    assert!(delivery.is_ok());
}
