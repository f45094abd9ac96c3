use indoc::indoc;
use saphyr_repr::{
    CollectionStart, CollectionStyle, CoreSchema, Error, Mapping, NodeMapper, NodePathSegment,
    STR_MAPPER, Scalar, ScalarEvent, ScalarStyle, Schema, Sequence, TagName, Value,
    from_str_with_schema, represent,
};

/// Core schema, except that the value of any `version` key is always a string.
struct VersionsAreText;

fn is_version(path: &[NodePathSegment]) -> bool {
    matches!(
        path.last(),
        Some(NodePathSegment::MappingValue { key: Some(key) }) if key == "version"
    )
}

impl Schema for VersionsAreText {
    fn resolve_non_specific_scalar(
        &self,
        scalar: &ScalarEvent,
        path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        if is_version(path) {
            return Some(&STR_MAPPER);
        }
        CoreSchema::instance().resolve_non_specific_scalar(scalar, path)
    }

    fn resolve_non_specific_mapping(
        &self,
        start: &CollectionStart,
        path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        CoreSchema::instance().resolve_non_specific_mapping(start, path)
    }

    fn resolve_non_specific_sequence(
        &self,
        start: &CollectionStart,
        path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        CoreSchema::instance().resolve_non_specific_sequence(start, path)
    }

    fn is_tag_implicit_scalar(
        &self,
        tag: &TagName,
        scalar: &Scalar,
        path: &[NodePathSegment],
    ) -> Option<ScalarStyle> {
        if is_version(path) && *tag == TagName::STR {
            return Some(ScalarStyle::Plain);
        }
        CoreSchema::instance().is_tag_implicit_scalar(tag, scalar, path)
    }

    fn is_tag_implicit_mapping(
        &self,
        tag: &TagName,
        mapping: &Mapping,
        path: &[NodePathSegment],
    ) -> Option<CollectionStyle> {
        CoreSchema::instance().is_tag_implicit_mapping(tag, mapping, path)
    }

    fn is_tag_implicit_sequence(
        &self,
        tag: &TagName,
        sequence: &Sequence,
        path: &[NodePathSegment],
    ) -> Option<CollectionStyle> {
        CoreSchema::instance().is_tag_implicit_sequence(tag, sequence, path)
    }

    fn resolve_mapper(&self, tag: &TagName) -> Option<&dyn NodeMapper> {
        CoreSchema::instance().resolve_mapper(tag)
    }

    fn resolve_child_mapper(
        &self,
        native: &Value,
        path: &[NodePathSegment],
    ) -> Result<&dyn NodeMapper, Error> {
        CoreSchema::instance().resolve_child_mapper(native, path)
    }
}

const YAML: &str = indoc! {"
    version: 1.10
    services:
      - name: web
        version: 2.0
        replicas: 3
"};

#[test]
fn resolution_depends_on_the_path() {
    let doc = from_str_with_schema(YAML, &VersionsAreText).unwrap();
    let root = doc.root();
    assert_eq!(*root.get("version").unwrap().tag(), TagName::STR);

    let service = root.get("services").and_then(|s| s.index(0)).unwrap();
    assert_eq!(*service.get("version").unwrap().tag(), TagName::STR);
    assert_eq!(*service.get("replicas").unwrap().tag(), TagName::INT);

    let value = doc.construct(&VersionsAreText).unwrap();
    assert_eq!(value.get("version"), Some(&Value::from("1.10")));
}

#[test]
fn same_text_elsewhere_still_resolves_by_content() {
    let doc = from_str_with_schema("release: 1.10\n", &VersionsAreText).unwrap();
    assert_eq!(*doc.root().get("release").unwrap().tag(), TagName::FLOAT);
}

#[test]
fn path_sensitive_implicit_tags_round_trip() {
    let value = Value::Mapping(vec![
        (Value::from("version"), Value::from("2.0")),
        (Value::from("other"), Value::from("2.0")),
    ]);
    let doc = represent(&value, &VersionsAreText).unwrap();
    let events = doc.to_events(&VersionsAreText);
    let styles: Vec<_> = events
        .iter()
        .filter_map(|ev| match ev {
            saphyr_repr::Event::Scalar(s) if s.value == "2.0" => Some(s.style),
            _ => None,
        })
        .collect();
    assert_eq!(styles, vec![ScalarStyle::Plain, ScalarStyle::DoubleQuoted]);

    let reloaded = saphyr_repr::load_events(
        events.into_iter().map(Ok),
        |_| -> &'static dyn Schema { &VersionsAreText },
        Default::default(),
    )
    .unwrap();
    let root = reloaded.documents()[0].root();
    assert_eq!(*root.get("version").unwrap().tag(), TagName::STR);
    assert_eq!(*root.get("other").unwrap().tag(), TagName::STR);
}
