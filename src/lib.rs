//! YAML tag resolution and representation graphs on top of `saphyr-parser`.
//!
//! Loading turns parse events into [`Document`]s whose nodes carry resolved
//! tags; the active [`Schema`] decides which tag an untagged node gets. The
//! same schema then builds native [`Value`]s from nodes and, in the other
//! direction, represents values as nodes and decides which tags may be left
//! implicit when they are written out again.
//!
//! ```rust
//! use saphyr_repr::{CoreSchema, TagName, Value, from_str_with_schema};
//!
//! let doc = from_str_with_schema("port: 0x1F90\nname: 'web'\n", CoreSchema::instance()).unwrap();
//! let port = doc.root().get("port").unwrap();
//! assert_eq!(*port.tag(), TagName::INT);
//!
//! let value = doc.construct(CoreSchema::instance()).unwrap();
//! assert_eq!(value.get("port"), Some(&Value::Int(8080)));
//! assert_eq!(value.get("name"), Some(&Value::from("web")));
//! ```

use std::io::Read;

pub use budget::{Budget, BudgetBreach, BudgetEnforcer, BudgetReport, check_budget};
pub use construct::Constructor;
pub use error::Error;
pub use event::{AnchorId, CollectionStart, CollectionStyle, Event, ScalarEvent, ScalarStyle};
pub use live_events::LiveEvents;
pub use loader::load_events;
pub use location::Location;
pub use mapper::{
    CollectionMapper, MAP_MAPPER, MapperKind, NodeMapper, Represented, SEQ_MAPPER, STR_MAPPER,
    ScalarMapper,
};
pub use node::{Document, Mapping, Node, NodeId, NodeKind, NodeRef, Scalar, Sequence, Stream};
pub use options::Options;
pub use path::{NodePath, NodePathSegment, display_path};
pub use represent::represent;
pub use schema::{CoreSchema, FailsafeSchema, JsonSchema, NullSchema, Schema};
pub use tags::TagName;
pub use value::Value;

pub mod budget;
mod construct;
mod error;
mod event;
mod float_format;
mod input;
mod live_events;
mod loader;
mod location;
mod macros;
mod mapper;
mod node;
pub mod options;
mod path;
mod quoting;
mod represent;
mod schema;
mod serialize;
mod tags;
mod value;

/// Load a single YAML document without resolving any tags.
///
/// Every node keeps the tag it was written with: plain scalars and untagged
/// collections have [`TagName::EMPTY`], quoted scalars [`TagName::NON_SPECIFIC`].
/// Explicit tags are preserved since no schema knows them.
///
/// ```rust
/// use saphyr_repr::TagName;
///
/// let doc = saphyr_repr::from_str("- 12\n- '12'\n").unwrap();
/// let root = doc.root();
/// assert_eq!(*root.index(0).unwrap().tag(), TagName::EMPTY);
/// assert_eq!(*root.index(1).unwrap().tag(), TagName::NON_SPECIFIC);
/// ```
pub fn from_str(input: &str) -> Result<Document, Error> {
    let options = Options {
        unknown_tags: options::UnknownTagPolicy::Preserve,
        ..Options::default()
    };
    from_str_with_options(input, NullSchema::instance(), options)
}

/// Load a single YAML document, resolving tags with `schema`.
pub fn from_str_with_schema(input: &str, schema: &dyn Schema) -> Result<Document, Error> {
    from_str_with_options(input, schema, Options::default())
}

/// Load a single YAML document with configurable [`Options`].
///
/// An input with no document or with more than one document is an error; use
/// [`from_multiple_with_options`] for streams.
///
/// ```rust
/// use saphyr_repr::options::DuplicateKeyPolicy;
/// use saphyr_repr::{Error, JsonSchema, Options, from_str_with_options};
///
/// let options = Options {
///     duplicate_keys: DuplicateKeyPolicy::Error,
///     ..Options::default()
/// };
/// let err = from_str_with_options("a: 1\na: 2\n", JsonSchema::instance(), options).unwrap_err();
/// assert!(matches!(err, Error::DuplicateKey { .. }));
/// ```
pub fn from_str_with_options(
    input: &str,
    schema: &dyn Schema,
    options: Options,
) -> Result<Document, Error> {
    single_document(from_multiple_with_options(input, |_| schema, options)?)
}

/// Load every document of a YAML stream. `select` picks the schema for each
/// document by its index in the stream.
///
/// ```rust
/// use saphyr_repr::{CoreSchema, FailsafeSchema, Schema, TagName};
///
/// let yaml = "--- 12\n--- 12\n";
/// let stream = saphyr_repr::from_multiple(yaml, |index| -> &'static dyn Schema {
///     if index == 0 { CoreSchema::instance() } else { FailsafeSchema::instance() }
/// })
/// .unwrap();
/// assert_eq!(*stream.documents()[0].root().tag(), TagName::INT);
/// assert_eq!(*stream.documents()[1].root().tag(), TagName::STR);
/// ```
pub fn from_multiple<'s, F>(input: &str, select: F) -> Result<Stream, Error>
where
    F: FnMut(usize) -> &'s dyn Schema,
{
    from_multiple_with_options(input, select, Options::default())
}

/// Load every document of a YAML stream with configurable [`Options`].
pub fn from_multiple_with_options<'s, F>(
    input: &str,
    select: F,
    options: Options,
) -> Result<Stream, Error>
where
    F: FnMut(usize) -> &'s dyn Schema,
{
    load_events(LiveEvents::new(input), select, options)
}

/// Load a single YAML document from a byte reader.
///
/// UTF-8 and UTF-16 input is accepted; the encoding is sniffed from the
/// byte-order mark. At most [`Options::max_reader_input_bytes`] of decoded text
/// are read.
///
/// ```rust
/// use saphyr_repr::{CoreSchema, Value};
///
/// let bytes: &[u8] = b"\xEF\xBB\xBFenabled: yes\n";
/// let doc = saphyr_repr::from_reader(bytes, CoreSchema::instance()).unwrap();
/// let value = doc.construct(CoreSchema::instance()).unwrap();
/// assert_eq!(value.get("enabled"), Some(&Value::from("yes")));
/// ```
pub fn from_reader<R: Read>(reader: R, schema: &dyn Schema) -> Result<Document, Error> {
    from_reader_with_options(reader, schema, Options::default())
}

pub fn from_reader_with_options<R: Read>(
    reader: R,
    schema: &dyn Schema,
    options: Options,
) -> Result<Document, Error> {
    let text = input::read_decoded(reader, options.max_reader_input_bytes)?;
    from_str_with_options(&text, schema, options)
}

/// Load every document from a byte reader; see [`from_reader`] and [`from_multiple`].
pub fn from_reader_multiple<'s, R, F>(reader: R, select: F) -> Result<Stream, Error>
where
    R: Read,
    F: FnMut(usize) -> &'s dyn Schema,
{
    let options = Options::default();
    let text = input::read_decoded(reader, options.max_reader_input_bytes)?;
    from_multiple_with_options(&text, select, options)
}

/// Events for `value` under the core schema.
///
/// ```rust
/// use saphyr_repr::{Event, ScalarStyle, Value};
///
/// let events = saphyr_repr::to_events(&Value::from("null")).unwrap();
/// let Event::Scalar(scalar) = &events[2] else { panic!("expected a scalar") };
/// // A string that reads back as null must be quoted.
/// assert_eq!(scalar.style, ScalarStyle::DoubleQuoted);
/// ```
pub fn to_events(value: &Value) -> Result<Vec<Event>, Error> {
    to_events_with_schema(value, CoreSchema::instance())
}

/// Represent `value` under `schema` and serialize it to events.
pub fn to_events_with_schema(value: &Value, schema: &dyn Schema) -> Result<Vec<Event>, Error> {
    Ok(represent(value, schema)?.to_events(schema))
}

fn single_document(stream: Stream) -> Result<Document, Error> {
    let count = stream.len();
    let mut documents = stream.into_iter();
    match (documents.next(), count) {
        (Some(document), 1) => Ok(document),
        (None, _) => Err(Error::msg("no YAML document found")),
        (Some(_), n) => Err(Error::msg(format!(
            "expected a single YAML document but found {n}; use from_multiple or from_multiple_with_options"
        ))),
    }
}
