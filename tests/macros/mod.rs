use incident::{define_incident, incident, lazy_message, Incident, IncidentKind};
use serde_json::json;


#[test]
fn incident_macro_resolves_positional_arguments() {
    let cause = Incident::with_name("ConnectionLost", "Lost connection");
    let incident = incident!(cause, "Network", json!({"host": "db-1"}), "Unable to connect");

    assert_eq!(incident.name(), "Network");
    assert_eq!(incident.data()["host"], "db-1");
    assert_eq!(incident.message(), "Unable to connect");
    assert_eq!(incident.causal_chain().unwrap(), "Unable to connect: Lost connection");
}

#[test]
fn incident_macro_without_arguments_is_default_shaped() {
    let incident = incident!();
    assert_eq!(incident.name(), "Incident");
    assert_eq!(incident.message(), "");
}

#[test]
#[should_panic(expected = "invalid incident arguments")]
fn incident_macro_panics_on_invalid_arguments() {
    let _ = incident!(json!({"a": 1}), "Late", "message");
}

#[test]
fn lazy_message_macro_defers_formatting() {
    let incident = incident!(json!({"port": 50313}), lazy_message!(data => "port {}", data["port"]));
    assert_eq!(incident.message_state(), incident::FieldState::Unresolved);
    assert_eq!(incident.message(), "port 50313");
}

#[test]
fn lazy_message_macro_captures_by_move() {
    let attempts = String::from("three");
    let formatter = lazy_message!("gave up after {} attempts", attempts);
    assert_eq!(formatter.format(&incident::Data::new()).unwrap(), "gave up after three attempts");
}

define_incident!(
    /// Used by the kind tests.
    pub Unreachable
);

#[test]
fn defined_kind_names_its_incidents() {
    assert_eq!(Unreachable::NAME, "Unreachable");
    let incident = Unreachable::new("db-1 did not answer");
    assert!(incident.is::<Unreachable>());
    assert_eq!(incident.to_string(), "Unreachable: db-1 did not answer");
}
