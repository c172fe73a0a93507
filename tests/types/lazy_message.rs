use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use incident::{FieldState, Formatter, Incident, IncidentError};

fn recording_formatter(log: &Arc<Mutex<Vec<&'static str>>>) -> Formatter {
    let log = Arc::clone(log);
    Formatter::new(move |_| {
        log.lock().unwrap().push("formatted");
        "recorded".to_owned()
    })
}

#[test]
fn formatter_runs_at_first_read_not_at_construction() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let incident = Incident::builder().message(recording_formatter(&log)).stackless().build();
    log.lock().unwrap().push("constructed");

    assert_eq!(incident.message(), "recorded");
    assert_eq!(*log.lock().unwrap(), ["constructed", "formatted"]);
}

#[test]
fn reading_twice_runs_the_formatter_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let incident = Incident::builder()
        .message(Formatter::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            "once".to_owned()
        }))
        .build();

    let first = incident.message().as_ptr();
    let second = incident.message().as_ptr();
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn stack_and_display_trigger_resolution() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let incident = Incident::builder().name("Lazy").message(recording_formatter(&log)).stackless().build();

    assert_eq!(incident.stack(), "Lazy: recorded");
    assert_eq!(incident.to_string(), "Lazy: recorded");
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[test]
fn formatter_receives_the_data() {
    let incident = Incident::builder()
        .entry("port", 50313)
        .message(Formatter::new(|data| format!("unexpected port {}", data["port"])))
        .build();
    assert_eq!(incident.message(), "unexpected port 50313");
}

#[test]
fn data_json_formatter_renders_the_payload() {
    let incident = Incident::builder().entry("port", 50313).message(Formatter::data_json()).build();
    assert_eq!(incident.message(), r#"{"port":50313}"#);
}

#[test]
fn assigned_formatter_is_resolved_again() {
    let mut incident = Incident::new("plain");
    assert_eq!(incident.message_state(), FieldState::Resolved);

    incident.set_message(Formatter::new(|_| "reformatted".to_owned()));
    assert_eq!(incident.message_state(), FieldState::Unresolved);
    assert_eq!(incident.message(), "reformatted");
    assert_eq!(incident.message_state(), FieldState::Resolved);

    incident.set_message("text wins");
    assert_eq!(incident.message_state(), FieldState::Overridden);
    assert_eq!(incident.message(), "text wins");
}

#[test]
fn failing_formatter_surfaces_and_is_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let incident = Incident::builder()
        .name("Flaky")
        .message(Formatter::fallible(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("backend unavailable")
            } else {
                Ok("recovered".to_owned())
            }
        }))
        .stackless()
        .build();

    let err = incident.try_message().unwrap_err();
    assert!(matches!(err, IncidentError::FormatterFailure { ref name, .. } if name == "Flaky"));
    assert_eq!(err.to_string(), "message formatter of `Flaky` failed: backend unavailable");
    assert_eq!(incident.message_state(), FieldState::Unresolved);

    assert_eq!(incident.message(), "recovered");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn failing_formatter_fails_display() {
    use std::fmt::Write;

    let incident = Incident::builder().message(Formatter::fallible(|_| Err::<String, _>("nope"))).build();
    let mut out = String::new();
    assert!(write!(out, "{}", incident).is_err());
    assert!(incident.try_stack().is_err());
}

#[test]
#[should_panic(expected = "message formatter of `Incident` failed")]
fn message_panics_on_formatter_failure() {
    let incident = Incident::builder().message(Formatter::fallible(|_| Err::<String, _>("nope"))).build();
    let _ = incident.message();
}

#[test]
fn concurrent_first_reads_run_the_formatter_once() {
    const READERS: usize = 8;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let incident = Arc::new(
        Incident::builder()
            .message(Formatter::new(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                thread::yield_now();
                "shared".to_owned()
            }))
            .build(),
    );
    let barrier = Arc::new(Barrier::new(READERS));

    let handles: Vec<_> = (0..READERS)
        .map(|_| {
            let incident = Arc::clone(&incident);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                incident.message().to_owned()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "shared");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

fn port_incident(port: u16) -> Incident {
    Incident::builder()
        .name("Port")
        .entry("port", port)
        .message(Formatter::new(|data| format!("port {}", data["port"])))
        .stackless()
        .build()
}

#[test]
fn clone_with_new_data_formats_its_own_data() {
    let original = port_incident(1);
    let mut copy = original.clone();
    copy.set_data(serde_json::from_value(serde_json::json!({"port": 2})).unwrap());

    assert_eq!(copy.message(), "port 2");
    assert_eq!(original.message_state(), FieldState::Unresolved);
    assert_eq!(original.message(), "port 1");
    assert_eq!(original.stack(), "Port: port 1");
    assert_eq!(copy.stack(), "Port: port 2");
}

#[test]
fn converted_copy_edited_in_place_formats_its_own_data() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let original = Incident::builder()
        .entry("port", 1)
        .message(Formatter::new(move |data| {
            counter.fetch_add(1, Ordering::SeqCst);
            format!("port {}", data["port"])
        }))
        .stackless()
        .build();

    let mut copy = Incident::from_error_like(&original);
    copy.data_mut().insert("port".into(), serde_json::json!(2));

    assert_eq!(original.message(), "port 1");
    assert_eq!(copy.message(), "port 2");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn resolved_message_is_kept_when_data_changes() {
    let mut incident = port_incident(1);
    assert_eq!(incident.message(), "port 1");
    incident.try_set_data(serde_json::json!({"port": 2})).unwrap();
    assert_eq!(incident.message(), "port 1");
}
