use std::sync::Arc;

use incident::args::{IncidentArg, Resolver};
use incident::{Data, Formatter, Incident, StackCapture};
use serde_json::json;

#[derive(Debug, Clone, Copy)]
struct Shape {
    cause: bool,
    name: bool,
    data: bool,
    lazy: bool,
}

fn shapes() -> impl Iterator<Item = Shape> {
    (0..16u8).map(|bits| Shape {
        cause: bits & 0b0001 != 0,
        name: bits & 0b0010 != 0,
        data: bits & 0b0100 != 0,
        lazy: bits & 0b1000 != 0,
    })
}

fn sample_data() -> Data {
    let mut data = Data::new();
    data.insert("port".into(), json!(50313));
    data
}

fn build(shape: Shape, cause: &Arc<Incident>) -> Incident {
    let mut args = Vec::new();
    if shape.cause {
        args.push(IncidentArg::Cause(cause.clone()));
    }
    if shape.name {
        args.push(IncidentArg::from("Named"));
    }
    if shape.data {
        args.push(IncidentArg::from(sample_data()));
    }
    if shape.lazy {
        args.push(IncidentArg::from(Formatter::new(|data| format!("lazy {}", data.len()))));
    } else {
        args.push(IncidentArg::from("eager"));
    }
    Resolver::new().capture(StackCapture::Disabled).build(args).unwrap()
}

#[test]
fn every_presence_combination_resolves_to_its_fields() {
    let cause = Arc::new(Incident::builder().name("Cause").stackless().build());

    for shape in shapes() {
        let incident = build(shape, &cause);

        let expected_name = if shape.name { "Named" } else { "Incident" };
        assert_eq!(incident.name(), expected_name, "{:?}", shape);

        let expected_data = if shape.data { sample_data() } else { Data::new() };
        assert_eq!(incident.data(), &expected_data, "{:?}", shape);

        let expected_message = if shape.lazy {
            format!("lazy {}", expected_data.len())
        } else {
            "eager".to_owned()
        };
        assert_eq!(incident.message(), expected_message, "{:?}", shape);

        match incident.cause() {
            Some(found) => {
                assert!(shape.cause, "{:?}", shape);
                let found = found.downcast_ref::<Incident>().expect("cause should be an incident");
                assert!(std::ptr::eq(found, &*cause));
            },
            None => assert!(!shape.cause, "{:?}", shape),
        }
    }
}

#[test]
fn empty_argument_list_yields_defaults() {
    let incident = Resolver::new().capture(StackCapture::Disabled).build(Vec::new()).unwrap();
    assert_eq!(incident.name(), "Incident");
    assert!(incident.data().is_empty());
    assert_eq!(incident.message(), "");
    assert!(incident.cause().is_none());
    assert_eq!(incident.stack(), "Incident");
}

#[test]
fn non_object_value_before_the_message_is_left_unconsumed() {
    let resolved = Resolver::new().resolve([IncidentArg::from(json!(42)), IncidentArg::from("msg")]).unwrap();
    assert!(resolved.cause.is_none());
    assert!(resolved.name.is_none());
    assert!(resolved.data.is_none());

    let incident = incident::incident!(json!(42), "msg");
    assert_eq!(incident.name(), "Incident");
    assert!(incident.data().is_empty());
    assert_eq!(incident.message(), "msg");
}

#[test]
fn name_after_the_data_is_not_reinterpreted() {
    let incident = Resolver::new()
        .capture(StackCapture::Disabled)
        .build([IncidentArg::from(json!({})), IncidentArg::from("Timeout"), IncidentArg::from("msg")])
        .unwrap();
    assert_eq!(incident.name(), "Incident");
    assert!(incident.data().is_empty());
    assert_eq!(incident.message(), "msg");
}

#[test]
fn cause_after_the_name_stops_the_scan() {
    let incident = Resolver::new()
        .capture(StackCapture::Disabled)
        .build([
            IncidentArg::from("Named"),
            incident::args::cause(std::fmt::Error),
            IncidentArg::from(sample_data()),
            IncidentArg::from("msg"),
        ])
        .unwrap();
    assert_eq!(incident.name(), "Named");
    assert!(incident.cause().is_none());
    assert!(incident.data().is_empty());
    assert_eq!(incident.message(), "msg");
}
