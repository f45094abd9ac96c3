use std::sync::atomic::{AtomicUsize, Ordering};

use indoc::indoc;
use saphyr_repr::options::{DuplicateKeyPolicy, UnknownTagPolicy};
use saphyr_repr::{
    AnchorId, BudgetBreach, BudgetReport, CollectionStart, CoreSchema, Error, Event, JsonSchema,
    Location, Options, ScalarEvent, TagName, Value, budget, from_str_with_options,
    from_str_with_schema, load_events,
};

fn with_duplicates(policy: DuplicateKeyPolicy) -> Options {
    Options {
        duplicate_keys: policy,
        ..Options::default()
    }
}

#[test]
fn unknown_tag_is_an_error_by_default() {
    let err = from_str_with_schema("shape: !circle { r: 1 }\n", CoreSchema::instance()).unwrap_err();
    match &err {
        Error::UnknownTag { tag, location } => {
            assert_eq!(tag.value(), Some("!circle"));
            assert_eq!(location.row, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("!circle"), "{err}");
}

#[test]
fn unknown_tag_can_be_preserved() {
    let options = Options {
        unknown_tags: UnknownTagPolicy::Preserve,
        ..Options::default()
    };
    let doc = from_str_with_options("shape: !circle { r: 1 }\n", CoreSchema::instance(), options)
        .unwrap();
    let shape = doc.root().get("shape").unwrap();
    assert_eq!(shape.tag().value(), Some("!circle"));
    // Children still resolve under the schema.
    assert_eq!(*shape.get("r").unwrap().tag(), TagName::INT);

    // Strict construction refuses the unknown tag.
    let err = doc.construct(CoreSchema::instance()).unwrap_err();
    assert!(matches!(err, Error::UnknownTag { .. }), "{err}");
}

#[test]
fn scalar_tag_on_a_collection_is_rejected() {
    let err = from_str_with_schema("!!int [1, 2]\n", CoreSchema::instance()).unwrap_err();
    match err {
        Error::TagKindMismatch { tag, kind, .. } => {
            assert_eq!(tag, TagName::INT);
            assert_eq!(kind, "sequence");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn map_tag_on_a_scalar_is_rejected() {
    let err = from_str_with_schema("k: !!map text\n", JsonSchema::instance()).unwrap_err();
    assert!(matches!(err, Error::TagKindMismatch { kind: "scalar", .. }), "{err}");
}

#[test]
fn invalid_scalar_text_fails_on_construct() {
    let doc = from_str_with_schema("n: !!int twelve\n", CoreSchema::instance()).unwrap();
    assert_eq!(*doc.root().get("n").unwrap().tag(), TagName::INT);
    let err = doc.construct(CoreSchema::instance()).unwrap_err();
    match err {
        Error::InvalidScalar { tag, value, location } => {
            assert_eq!(tag, TagName::INT);
            assert_eq!(value, "twelve");
            assert_eq!(location.row, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_keys_error_by_default() {
    let yaml = indoc! {"
        name: a
        other: b
        name: c
    "};
    let err = from_str_with_schema(yaml, CoreSchema::instance()).unwrap_err();
    match err {
        Error::DuplicateKey { key, location } => {
            assert_eq!(key, "name");
            assert_eq!(location.row, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_key_policies() {
    let yaml = "a: 1\nb: 2\na: 3\n";
    let entries = |policy| {
        let doc = from_str_with_options(yaml, CoreSchema::instance(), with_duplicates(policy))
            .unwrap();
        doc.root()
            .entries()
            .map(|(k, v)| (k.scalar_value().unwrap(), v.scalar_value().unwrap()))
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
    };
    assert_eq!(entries(DuplicateKeyPolicy::FirstWins), ["a=1", "b=2"]);
    assert_eq!(entries(DuplicateKeyPolicy::LastWins), ["a=3", "b=2"]);
    assert_eq!(entries(DuplicateKeyPolicy::Keep), ["a=1", "b=2", "a=3"]);
}

#[test]
fn keys_with_different_resolved_tags_are_distinct() {
    // `1` is an int and `'1'` a string under the core schema.
    let doc = from_str_with_schema("1: int\n'1': str\n", CoreSchema::instance()).unwrap();
    assert_eq!(doc.root().entries().count(), 2);
}

#[test]
fn keys_that_denote_the_same_value_are_duplicates() {
    let err = from_str_with_schema("{0x1: a, 1: b}", CoreSchema::instance()).unwrap_err();
    match err {
        Error::DuplicateKey { key, .. } => assert_eq!(key, "1"),
        other => panic!("unexpected error: {other}"),
    }
    for yaml in ["{1.0: a, 1.: b}", "{~: a, null: b}", "{0o10: a, 8: b}"] {
        let err = from_str_with_schema(yaml, CoreSchema::instance()).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }), "{yaml}: {err}");
    }

    let doc = from_str_with_options(
        "{0x1: a, 1: b}",
        CoreSchema::instance(),
        with_duplicates(DuplicateKeyPolicy::LastWins),
    )
    .unwrap();
    let entries: Vec<_> = doc
        .root()
        .entries()
        .map(|(k, v)| (k.scalar_value().unwrap(), v.scalar_value().unwrap()))
        .collect();
    assert_eq!(entries, [("1", "b")]);
}

#[test]
fn unresolved_keys_compare_by_text() {
    // `0x1` is not a JSON int, so it stays a distinct untagged key.
    let doc = from_str_with_schema("{0x1: a, 1: b}", JsonSchema::instance()).unwrap();
    assert_eq!(doc.root().entries().count(), 2);
}

#[test]
fn depth_budget_is_enforced() {
    static REPORTS: AtomicUsize = AtomicUsize::new(0);
    fn report(report: &BudgetReport) {
        assert!(matches!(report.breached, Some(BudgetBreach::Depth { .. })));
        REPORTS.fetch_add(1, Ordering::SeqCst);
    }

    let options = Options {
        budget: Some(budget! { max_depth: 2 }),
        budget_report: Some(report),
        ..Options::default()
    };
    let err = from_str_with_options("a: [[[1]]]\n", CoreSchema::instance(), options).unwrap_err();
    assert!(
        matches!(err, Error::Budget { breach: BudgetBreach::Depth { .. }, .. }),
        "unexpected error: {err}"
    );
    assert_eq!(REPORTS.load(Ordering::SeqCst), 1);
}

#[test]
fn budget_report_is_delivered_on_success() {
    static NODES: AtomicUsize = AtomicUsize::new(0);
    fn report(report: &BudgetReport) {
        assert!(report.breached.is_none());
        NODES.store(report.nodes, Ordering::SeqCst);
    }

    let options = Options {
        budget_report: Some(report),
        ..Options::default()
    };
    from_str_with_options("[a, b]\n", CoreSchema::instance(), options).unwrap();
    assert_eq!(NODES.load(Ordering::SeqCst), 3);
}

#[test]
fn alias_to_an_undefined_anchor_is_rejected() {
    let events = vec![
        Event::StreamStart,
        Event::DocumentStart {
            location: Location::UNKNOWN,
        },
        Event::SequenceStart(CollectionStart::default()),
        Event::Scalar(ScalarEvent::plain("x").with_anchor(AnchorId(1))),
        Event::Alias {
            anchor: AnchorId(2),
            location: Location::new(2, 3),
        },
        Event::SequenceEnd {
            location: Location::UNKNOWN,
        },
        Event::DocumentEnd {
            location: Location::UNKNOWN,
        },
        Event::StreamEnd,
    ];
    let err = load_events(
        events.into_iter().map(Ok),
        |_| CoreSchema::instance(),
        Options::default(),
    )
    .unwrap_err();
    match err {
        Error::UnknownAnchor { id, location } => {
            assert_eq!(id, 2);
            assert_eq!(location, Location::new(2, 3));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn syntax_errors_carry_a_location() {
    let err = from_str_with_schema("a: [1, 2\n", CoreSchema::instance()).unwrap_err();
    assert!(err.location().is_some(), "{err}");
}

#[test]
fn events_after_the_stream_body_are_rejected() {
    let events = vec![
        Event::StreamStart,
        Event::Scalar(ScalarEvent::plain("stray")),
        Event::StreamEnd,
    ];
    let err = load_events(
        events.into_iter().map(Ok),
        |_| CoreSchema::instance(),
        Options::default(),
    )
    .unwrap_err();
    assert!(
        matches!(err, Error::Unexpected { expected: "document start", .. }),
        "{err}"
    );
}

#[test]
fn empty_input_has_no_document() {
    let err = from_str_with_schema("", CoreSchema::instance()).unwrap_err();
    assert!(matches!(err, Error::Message { .. }), "{err}");
    assert_eq!(
        saphyr_repr::from_multiple("", |_| CoreSchema::instance())
            .unwrap()
            .len(),
        0
    );
}

#[test]
fn unrepresentable_values_report_their_path() {
    let value = Value::Mapping(vec![(
        Value::from("limits"),
        Value::Sequence(vec![Value::Float(f64::NAN)]),
    )]);
    let err = saphyr_repr::represent(&value, JsonSchema::instance()).unwrap_err();
    assert!(err.location().is_none());
    assert!(err.to_string().ends_with("at $.limits[0]"), "{err}");
}
