use std::io::Cursor;

use indoc::indoc;
use saphyr_repr::{
    CoreSchema, Error, FailsafeSchema, JsonSchema, Options, Schema, TagName, Value,
    from_multiple, from_reader, from_reader_multiple, from_reader_with_options,
    from_str_with_schema,
};

#[test]
fn each_document_gets_its_own_schema() {
    let yaml = indoc! {"
        --- 0x10
        --- 0x10
        --- 16
    "};
    let mut requested = Vec::new();
    let stream = from_multiple(yaml, |index| -> &'static dyn Schema {
        requested.push(index);
        match index {
            0 => CoreSchema::instance(),
            1 => FailsafeSchema::instance(),
            _ => JsonSchema::instance(),
        }
    })
    .unwrap();
    assert_eq!(requested, vec![0, 1, 2]);

    let tags: Vec<_> = stream.iter().map(|doc| doc.root().tag().clone()).collect();
    assert_eq!(tags, vec![TagName::INT, TagName::STR, TagName::INT]);
}

#[test]
fn documents_without_markers() {
    let stream = from_multiple("name: John\n", |_| CoreSchema::instance()).unwrap();
    assert_eq!(stream.len(), 1);
    let stream = from_multiple("---\nname: Jane\n...\n", |_| CoreSchema::instance()).unwrap();
    assert_eq!(stream.len(), 1);
}

#[test]
fn empty_documents_have_an_empty_scalar_root() {
    let stream = from_multiple("---\n---\n", |_| CoreSchema::instance()).unwrap();
    assert_eq!(stream.len(), 2);
    for doc in stream.iter() {
        assert_eq!(*doc.root().tag(), TagName::NULL);
        assert_eq!(doc.construct(CoreSchema::instance()).unwrap(), Value::Null);
    }
}

#[test]
fn anchors_do_not_leak_across_documents() {
    let yaml = "name: &a John\n---\nname: *a\n";
    let result = from_multiple(yaml, |_| CoreSchema::instance());
    assert!(result.is_err(), "cross-document alias must fail");
}

#[test]
fn single_document_api_rejects_streams() {
    let err = from_str_with_schema("--- 1\n--- 2\n", CoreSchema::instance()).unwrap_err();
    assert!(err.to_string().contains("found 2"), "{err}");
}

#[test]
fn reader_decodes_utf16_with_bom() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "city: Zürich\n".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let doc = from_reader(Cursor::new(bytes), CoreSchema::instance()).unwrap();
    let value = doc.construct(CoreSchema::instance()).unwrap();
    assert_eq!(value.get("city"), Some(&Value::from("Zürich")));
}

#[test]
fn reader_reads_every_document() {
    let bytes = b"--- a\n--- b\n".to_vec();
    let stream = from_reader_multiple(Cursor::new(bytes), |_| FailsafeSchema::instance()).unwrap();
    let texts: Vec<_> = stream
        .iter()
        .map(|doc| doc.root().scalar_value().unwrap_or_default().to_owned())
        .collect();
    assert_eq!(texts, vec!["a", "b"]);
}

#[test]
fn reader_input_limit() {
    let options = Options {
        max_reader_input_bytes: Some(16),
        ..Options::default()
    };
    let input = "key: ".to_owned() + &"x".repeat(64);
    let err = from_reader_with_options(Cursor::new(input.into_bytes()), CoreSchema::instance(), options)
        .unwrap_err();
    assert!(matches!(err, Error::IOError { .. }), "unexpected error: {err}");
}
