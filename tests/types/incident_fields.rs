use std::error::Error;
use std::sync::Arc;

use incident::{Cause, Data, FieldState, Incident, IncidentArg, IncidentError};
use serde::Deserialize;
use serde_json::json;

#[test]
fn new_incident_has_default_fields() {
    let incident = Incident::new("Unable to fire the reactor!");
    assert_eq!(incident.name(), "Incident");
    assert!(incident.data().is_empty());
    assert_eq!(incident.message(), "Unable to fire the reactor!");
    assert!(incident.cause().is_none());
}

#[test]
fn display_matches_head_line() {
    assert_eq!(Incident::named("Bare").to_string(), "Bare");
    assert_eq!(Incident::with_name("Named", "message").to_string(), "Named: message");

    let mut unnamed = Incident::new("only message");
    unnamed.set_name("");
    assert_eq!(unnamed.to_string(), "only message");
}

#[test]
fn debug_does_not_resolve_the_message() {
    let incident = Incident::builder()
        .message(incident::Formatter::new(|_| panic!("debug must not format")))
        .build();
    let debug = format!("{:?}", incident);
    assert!(debug.contains("<unresolved>"));
    assert_eq!(incident.message_state(), FieldState::Unresolved);
}

#[test]
fn setters_replace_fields() {
    let mut incident = Incident::named("Before");
    incident.set_name("After").set_message("changed");
    incident.data_mut().insert("retries".into(), json!(3));

    assert_eq!(incident.name(), "After");
    assert_eq!(incident.message(), "changed");
    assert_eq!(incident.message_state(), FieldState::Overridden);
    assert_eq!(incident.data()["retries"], 3);

    let mut data = Data::new();
    data.insert("fresh".into(), json!(true));
    incident.set_data(data);
    assert!(!incident.data().contains_key("retries"));
}

#[test]
fn set_cause_accepts_errors_and_absence() {
    let mut incident = Incident::named("Wrapper");
    let cause: Cause = Arc::new(std::fmt::Error);
    incident.set_cause(cause);
    assert!(incident.source().is_some());

    incident.set_cause(None::<Cause>);
    assert!(incident.source().is_none());
}

#[test]
fn try_set_cause_rejects_non_errors() {
    let mut incident = Incident::named("Wrapper");
    let err = incident.try_set_cause(IncidentArg::from(json!(42))).unwrap_err();
    assert!(matches!(
        err,
        IncidentError::InvalidArgument { field: "cause", expected: "error", found: "number" }
    ));
    assert!(incident.cause().is_none());

    incident.try_set_cause(IncidentArg::from(Incident::named("Root"))).unwrap();
    assert_eq!(incident.root_cause().name(), "Root");
}

#[test]
fn try_set_data_requires_an_object() {
    let mut incident = Incident::named("Data");
    let err = incident.try_set_data(json!("text")).unwrap_err();
    assert!(err.is_usage_error());
    assert!(incident.data().is_empty());

    incident.try_set_data(json!({"port": 50313})).unwrap();
    assert_eq!(incident.data()["port"], 50313);
}

#[test]
fn data_deserializes_into_typed_structures() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Port {
        port: u16,
    }

    let incident = Incident::named("Port").with_entry("port", 50313);
    assert_eq!(incident.data_as::<Port>().unwrap(), Port { port: 50313 });
}

#[test]
fn builder_try_data_rejects_non_objects() {
    assert!(Incident::builder().try_data(&[1, 2, 3]).is_err());
    assert!(Incident::builder().try_data(&json!({"ok": true})).is_ok());
}

#[test]
fn incident_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<Incident>();
}

#[test]
fn incident_is_a_std_error() {
    let cause = Incident::with_name("Inner", "inner message");
    let incident = Incident::caused_by(cause, "outer message");
    let as_error: &dyn Error = &incident;

    assert_eq!(as_error.to_string(), "Incident: outer message");
    assert_eq!(as_error.source().map(|source| source.to_string()).as_deref(), Some("Inner: inner message"));
}

#[test]
fn clone_shares_resolution() {
    let original = Incident::builder().message(incident::Formatter::new(|_| "once".to_owned())).build();
    let copy = original.clone();
    assert_eq!(copy.message(), "once");
    assert_eq!(original.message_state(), FieldState::Resolved);
}

#[test]
fn default_incident_is_stackless() {
    let incident = Incident::default();
    assert!(!incident.has_snapshot());
    assert_eq!(incident.stack(), "Incident");
}
