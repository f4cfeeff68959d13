use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::json;

use mappingbus::{
    BusConfig, BusError, Event, EventBus, Handler, HandlerError, MappingBus, Message, PayloadError,
    Reload, RuleId, Topic, topics,
};

type Log = Arc<Mutex<Vec<String>>>;

fn recorder(log: &Log, tag: &'static str) -> Handler<serde_json::Value> {
    let log = Arc::clone(log);
    Handler::from_fn(tag, move |ev: Event<'_, serde_json::Value>| {
        log.lock().push(format!("{tag}:{}:{}", ev.topic, ev.payload));
    })
}

#[test]
fn emit_reaches_registered_handler_with_payload() {
    let bus = EventBus::new();
    let log = Log::default();
    bus.on("ruleView.change", &recorder(&log, "h1"));

    let delivery = bus.emit("ruleView.change", &json!({ "id": 7 }));
    assert_eq!(delivery.invoked, 1);
    assert_eq!(*log.lock(), vec![r#"h1:ruleView.change:{"id":7}"#]);
}

#[test]
fn handlers_run_in_registration_order_then_wildcard() {
    let bus = EventBus::new();
    let log = Log::default();
    bus.on("*", &recorder(&log, "w"));
    bus.on("reload", &recorder(&log, "h1"));
    bus.on("reload", &recorder(&log, "h2"));

    bus.emit("reload", &json!(true));
    assert_eq!(
        *log.lock(),
        vec!["h1:reload:true", "h2:reload:true", "w:reload:true"]
    );
}

#[test]
fn unregistered_handler_is_skipped() {
    let bus = EventBus::new();
    let log = Log::default();
    let h1 = recorder(&log, "h1");
    bus.on("x", &h1);
    bus.off("x", &h1);

    assert_eq!(bus.emit("x", &json!(null)).invoked, 0);
    assert!(log.lock().is_empty());
}

#[test]
fn unknown_topic_is_a_noop() {
    let bus: EventBus<serde_json::Value> = EventBus::new();
    let delivery = bus.emit("nothing.here", &json!(1));
    assert_eq!(delivery.invoked, 0);
    assert!(delivery.into_result().is_ok());
}

#[test]
fn failing_handler_does_not_stop_the_pass() {
    let bus = EventBus::new();
    let log = Log::default();
    bus.on(
        "x",
        &Handler::new("broken", |_| Err(HandlerError::fail("boom"))),
    );
    bus.on("x", &recorder(&log, "h2"));
    bus.on(
        "*",
        &Handler::from_fn("panicky", |_: Event<'_, serde_json::Value>| {
            panic!("wildcard exploded")
        }),
    );
    bus.on("*", &recorder(&log, "w"));

    let delivery = bus.emit("x", &json!(1));
    assert_eq!(delivery.invoked, 4);
    assert_eq!(*log.lock(), vec!["h2:x:1", "w:x:1"]);

    match delivery.into_result() {
        Err(BusError::HandlersFailed { topic, failures }) => {
            assert_eq!(topic, "x");
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].position, 0);
            assert_eq!(failures[0].registered_on, "x");
            assert_eq!(failures[0].error.as_label(), "handler_failed");
            assert_eq!(failures[1].position, 2);
            assert!(failures[1].registered_on.is_wildcard());
            assert_eq!(failures[1].error.as_label(), "handler_panicked");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn registration_during_emit_applies_to_next_pass() {
    let bus: EventBus<u32> = EventBus::new();
    let late_calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&late_calls);
    let late = Handler::from_fn("late", move |_: Event<'_, u32>| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let registrar_bus = bus.clone();
    let to_register = late.clone();
    let registrar = Handler::from_fn("registrar", move |_: Event<'_, u32>| {
        registrar_bus.on("x", &to_register);
    });
    bus.on("x", &registrar);

    assert_eq!(bus.emit("x", &1).invoked, 1);
    assert_eq!(late_calls.load(Ordering::SeqCst), 0);

    bus.off("x", &registrar);
    assert_eq!(bus.emit("x", &2).invoked, 1);
    assert_eq!(late_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn unregistration_during_emit_keeps_current_snapshot() {
    let bus: EventBus<u32> = EventBus::new();
    let second_calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&second_calls);
    let second = Handler::from_fn("second", move |_: Event<'_, u32>| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let remover_bus = bus.clone();
    let target = second.clone();
    bus.on(
        "x",
        &Handler::from_fn("remover", move |_: Event<'_, u32>| {
            remover_bus.off("x", &target);
        }),
    );
    bus.on("x", &second);

    bus.emit("x", &1);
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    bus.emit("x", &2);
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn nested_emit_from_handler_completes() {
    let bus: EventBus<u32> = EventBus::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let inner_log = Arc::clone(&log);
    bus.on(
        "inner",
        &Handler::from_fn("inner", move |ev: Event<'_, u32>| {
            inner_log.lock().push(*ev.payload);
        }),
    );
    let nested_bus = bus.clone();
    bus.on(
        "outer",
        &Handler::from_fn("outer", move |ev: Event<'_, u32>| {
            nested_bus.emit("inner", &(ev.payload + 1));
        }),
    );

    bus.emit("outer", &1);
    assert_eq!(*log.lock(), vec![2]);
}

#[test]
fn concurrent_emitters_see_every_handler() {
    let bus: EventBus<u32> = EventBus::new();
    let calls = Arc::new(AtomicUsize::new(0));
    for _ in 0..3 {
        let counter = Arc::clone(&calls);
        bus.on(
            "tick",
            &Handler::from_fn("tick", move |_: Event<'_, u32>| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
    }

    let threads: Vec<_> = (0..4)
        .map(|i| {
            let bus = bus.clone();
            std::thread::spawn(move || {
                for n in 0..50 {
                    bus.emit("tick", &(i * 100 + n));
                }
            })
        })
        .collect();
    for t in threads {
        t.join().expect("emitter thread panicked");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 4 * 50 * 3);
}

#[test]
fn panics_propagate_when_isolation_disabled() {
    let bus: EventBus<u32> = EventBus::with_config(BusConfig {
        catch_panics: false,
        ..BusConfig::default()
    });
    bus.on(
        "x",
        &Handler::from_fn("panicky", |_: Event<'_, u32>| panic!("boom")),
    );

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| bus.emit("x", &1)));
    assert!(result.is_err());
}

#[test]
fn wire_payloads_decode_into_messages() {
    let bus = MappingBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    bus.on(
        Topic::wildcard(),
        &Handler::from_fn("wire", move |ev: Event<'_, Message>| {
            log.lock().push(ev.payload.clone());
        }),
    );

    let incoming = [
        (topics::RULE_VIEW_CHANGE, json!({ "id": 0 })),
        (topics::RELOAD, json!(true)),
        (topics::RULE_VIEW_DISCARD_ALL, json!(null)),
    ];
    for (topic, value) in incoming {
        let msg = Message::from_json(topic, value).expect("valid payload");
        bus.publish(msg);
    }

    assert_eq!(
        *seen.lock(),
        vec![
            Message::change(RuleId::DRAFT),
            Message::Reload(Reload::Full),
            Message::RuleViewDiscardAll,
        ]
    );
}

#[test]
fn wire_payload_errors_are_typed() {
    assert!(matches!(
        Message::from_json("rule.unknown", json!(null)),
        Err(PayloadError::UnknownTopic { .. })
    ));
    let err = Message::from_json(topics::RULE_REQUEST_ORDER, json!({ "fromPos": "a" }))
        .expect_err("fromPos must be numeric");
    assert_eq!(err.as_label(), "payload_invalid");
}

#[test]
fn global_bus_is_shared() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let handler = Handler::from_fn("global", move |_: Event<'_, Message>| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    // unique topic keeps this test independent of other users of the global bus
    mappingbus::bus().on("test.global", &handler);

    let again = mappingbus::bus().clone();
    again.emit("test.global", &Message::ShowSuggestions);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    mappingbus::bus().off("test.global", &handler);
    assert_eq!(mappingbus::bus().listener_count("test.global"), 0);
}
