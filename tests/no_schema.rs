use indoc::indoc;
use saphyr_repr::{NullSchema, TagName, Value, from_str};

/// `!?` stands for "no tag at all", which cannot be written in YAML directly.
fn expected_tag(tag: &TagName) -> TagName {
    if tag.value() == Some("!?") {
        TagName::EMPTY
    } else {
        tag.clone()
    }
}

#[test]
fn parse_without_schema_produces_non_specific_tags() {
    let yaml = indoc! {r#"
        - { actual: plain, expected: !? 'plain' }
        - { actual: 'single quoted', expected: ! 'single quoted' }
        - { actual: "double quoted", expected: ! 'double quoted' }

        - { actual: { a: b }, expected: !? { a: b } }
        - { actual: [ a, b ], expected: !? [ a, b ] }
    "#};
    let doc = from_str(yaml).unwrap();
    for case in doc.root().items() {
        let actual = case.get("actual").unwrap();
        let expected = case.get("expected").unwrap();
        assert_eq!(*actual.tag(), expected_tag(expected.tag()));
    }
}

#[test]
fn explicit_tags_are_kept_verbatim() {
    let doc = from_str("- !!int 12\n- !point [1, 2]\n").unwrap();
    let root = doc.root();
    assert_eq!(*root.index(0).unwrap().tag(), TagName::INT);
    assert_eq!(root.index(1).unwrap().tag().value(), Some("!point"));
    assert_eq!(*root.tag(), TagName::EMPTY);
}

#[test]
fn unresolved_document_constructs_structurally() {
    let doc = from_str("name: web\nports: [80, 443]\n").unwrap();
    // Untagged nodes are built from their shape; scalars stay text.
    let value = doc.construct(NullSchema::instance()).unwrap();
    assert_eq!(value.get("name"), Some(&Value::from("web")));
    assert_eq!(
        value.get("ports"),
        Some(&Value::Sequence(vec![Value::from("80"), Value::from("443")]))
    );
}

#[test]
fn null_schema_cannot_represent_anything() {
    let err = saphyr_repr::represent(&Value::from("x"), NullSchema::instance()).unwrap_err();
    assert!(matches!(err, saphyr_repr::Error::Unrepresentable { .. }));
}
