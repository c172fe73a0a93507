use incident::{FieldState, Incident, StackCapture, INTERNAL_FRAME_PREFIXES};

fn stackless(name: &str, message: &str) -> Incident {
    Incident::builder().name(name).message(message).stackless().build()
}

#[test]
fn reading_the_stack_twice_returns_the_same_value() {
    let incident = Incident::new("FullStack");
    let first = incident.stack().to_owned();
    assert!(!first.is_empty());
    assert_eq!(incident.stack(), first);
    assert_eq!(incident.stack_state(), FieldState::Resolved);
}

#[test]
fn stackless_incident_without_message_uses_its_name() {
    assert_eq!(stackless("StacklessNoMessage", "").stack(), "StacklessNoMessage");
}

#[test]
fn stackless_incident_with_message_uses_the_head_line() {
    assert_eq!(
        stackless("StacklessWithMessage", "I have a message").stack(),
        "StacklessWithMessage: I have a message"
    );
}

#[test]
fn stack_contains_the_causality_chain() {
    let cause = stackless("StacklessCause", "I'm a cause");
    let incident = Incident::builder()
        .cause(cause)
        .name("StacklessWithCause")
        .message("I have a cause")
        .stackless()
        .build();
    assert_eq!(
        incident.stack(),
        "StacklessWithCause: I have a cause\n  caused by StacklessCause: I'm a cause"
    );
}

#[test]
fn nested_causes_are_indented_once_per_level() {
    let root = stackless("Root", "disk on fire");
    let middle = Incident::builder().cause(root).name("Middle").message("write failed").stackless().build();
    let top = Incident::builder().cause(middle).name("Top").message("save failed").stackless().build();
    assert_eq!(
        top.stack(),
        "Top: save failed\n  caused by Middle: write failed\n  caused by Root: disk on fire"
    );
}

#[test]
fn foreign_cause_uses_its_display() {
    let incident = Incident::builder().cause(std::fmt::Error).name("Render").stackless().build();
    assert_eq!(
        incident.stack(),
        "Render\n  caused by Error: an error occurred when formatting an argument"
    );
}

#[test]
fn eager_stack_is_mutable() {
    let mut incident = Incident::new("MyStackWillMutate");
    let old = incident.stack().to_owned();
    incident.set_stack("This is a new stack");
    assert_ne!(incident.stack(), old);
    assert_eq!(incident.stack(), "This is a new stack");
    assert_eq!(incident.stack_state(), FieldState::Overridden);
}

#[test]
fn lazy_stack_is_mutable_before_resolution() {
    let mut incident = Incident::new("MyLazyStackWillMutate");
    incident.set_stack("This is a new stack");
    assert!(!incident.has_snapshot());
    assert_eq!(incident.stack(), "This is a new stack");
}

#[test]
fn forced_capture_keeps_caller_frames() {
    let incident = Incident::builder()
        .name("Forced")
        .message("captured")
        .capture(StackCapture::Force)
        .build();
    assert!(incident.has_snapshot());
    assert_eq!(incident.stack_state(), FieldState::Unresolved);

    let stack = incident.stack();
    let mut lines = stack.lines();
    assert_eq!(lines.next(), Some("Forced: captured"));

    let first_frame = lines.next().expect("forced capture should contain frames");
    let symbol = first_frame.trim_start().split_once(": ").map(|(_, symbol)| symbol).unwrap_or("");
    assert!(
        INTERNAL_FRAME_PREFIXES.iter().all(|prefix| !symbol.starts_with(prefix)),
        "internal frame left at the top: {}",
        first_frame
    );
    assert!(stack.contains("forced_capture_keeps_caller_frames"));
    assert!(!stack.contains("IncidentBuilder"));
}

#[test]
fn unchanged_copies_share_the_first_derivation() {
    let original = stackless("Original", "first");
    let copy = original.clone();
    assert_eq!(copy.stack(), "Original: first");
    assert_eq!(original.stack_state(), FieldState::Resolved);
}

#[test]
fn modified_copy_derives_its_own_stack() {
    let original = stackless("Original", "first");
    let mut copy = original.clone();
    copy.set_name("Copy");

    assert_eq!(copy.stack(), "Copy: first");
    assert_eq!(original.stack_state(), FieldState::Unresolved);
    assert_eq!(original.stack(), "Original: first");
}

#[test]
fn copy_caused_by_its_original_resolves() {
    let original = stackless("Original", "first");
    let mut copy = original.clone();
    copy.set_cause(Some(std::sync::Arc::new(original) as incident::Cause));

    assert_eq!(copy.stack(), "Original: first\n  caused by Original: first");
}
