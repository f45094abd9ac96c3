//! Schemas: the tag resolution policy consulted by the loader and the representer.
//!
//! A schema answers four questions:
//! - which tag an untagged (or `!`-tagged) node gets, from its content;
//! - whether a tag may be left implicit when dumping, and in which style;
//! - which mapper handles an explicit tag;
//! - which mapper represents a native value.
//!
//! Every hook receives the path of the node, so a schema may resolve the same
//! content differently depending on where it appears. The bundled schemas do not.

use crate::error::Error;
use crate::event::{CollectionStart, CollectionStyle, ScalarEvent, ScalarStyle};
use crate::mapper::NodeMapper;
use crate::node::{Mapping, Scalar, Sequence};
use crate::path::{NodePathSegment, display_path};
use crate::tags::TagName;
use crate::value::Value;

mod core;
mod failsafe;
pub(crate) mod grammar;
mod json;

pub use self::core::CoreSchema;
pub use self::failsafe::FailsafeSchema;
pub use self::json::JsonSchema;

/// Tag resolution policy. Implementations must be immutable after
/// construction so a single instance can serve concurrent loads.
pub trait Schema: Send + Sync {
    /// Mapper for a scalar whose tag is empty or `!`, or `None` to leave it unresolved.
    fn resolve_non_specific_scalar(
        &self,
        scalar: &ScalarEvent,
        path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper>;

    fn resolve_non_specific_mapping(
        &self,
        start: &CollectionStart,
        path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper>;

    fn resolve_non_specific_sequence(
        &self,
        start: &CollectionStart,
        path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper>;

    /// `Some(style)` if `tag` can be omitted when writing `scalar` in that style,
    /// so that reading it back under this schema yields `tag` again.
    fn is_tag_implicit_scalar(
        &self,
        tag: &TagName,
        scalar: &Scalar,
        path: &[NodePathSegment],
    ) -> Option<ScalarStyle>;

    fn is_tag_implicit_mapping(
        &self,
        tag: &TagName,
        mapping: &Mapping,
        path: &[NodePathSegment],
    ) -> Option<CollectionStyle>;

    fn is_tag_implicit_sequence(
        &self,
        tag: &TagName,
        sequence: &Sequence,
        path: &[NodePathSegment],
    ) -> Option<CollectionStyle>;

    /// Mapper for an explicit, specific tag.
    fn resolve_mapper(&self, tag: &TagName) -> Option<&dyn NodeMapper>;

    /// Mapper that will represent `native` at `path`. Failing here means the
    /// schema cannot dump this kind of value at all.
    fn resolve_child_mapper(
        &self,
        native: &Value,
        path: &[NodePathSegment],
    ) -> Result<&dyn NodeMapper, Error>;
}

/// Schema that resolves nothing: every node keeps the tag it was written with.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSchema;

impl NullSchema {
    pub fn instance() -> &'static NullSchema {
        static INSTANCE: NullSchema = NullSchema;
        &INSTANCE
    }
}

impl Schema for NullSchema {
    fn resolve_non_specific_scalar(
        &self,
        _: &ScalarEvent,
        _: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        None
    }

    fn resolve_non_specific_mapping(
        &self,
        _: &CollectionStart,
        _: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        None
    }

    fn resolve_non_specific_sequence(
        &self,
        _: &CollectionStart,
        _: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        None
    }

    fn is_tag_implicit_scalar(
        &self,
        _: &TagName,
        _: &Scalar,
        _: &[NodePathSegment],
    ) -> Option<ScalarStyle> {
        None
    }

    fn is_tag_implicit_mapping(
        &self,
        _: &TagName,
        _: &Mapping,
        _: &[NodePathSegment],
    ) -> Option<CollectionStyle> {
        None
    }

    fn is_tag_implicit_sequence(
        &self,
        _: &TagName,
        _: &Sequence,
        _: &[NodePathSegment],
    ) -> Option<CollectionStyle> {
        None
    }

    fn resolve_mapper(&self, _: &TagName) -> Option<&dyn NodeMapper> {
        None
    }

    fn resolve_child_mapper(
        &self,
        native: &Value,
        path: &[NodePathSegment],
    ) -> Result<&dyn NodeMapper, Error> {
        Err(unsupported(native, path))
    }
}

/// Untagged quoted scalars and `!`-tagged scalars are never resolved by content.
pub(crate) fn is_opted_out(scalar: &ScalarEvent) -> bool {
    scalar.effective_tag().is_non_specific()
}

/// Linear lookup in a schema's fixed mapper table.
pub(crate) fn find_mapper(
    table: &'static [&'static dyn NodeMapper],
    tag: &TagName,
) -> Option<&'static dyn NodeMapper> {
    table.iter().copied().find(|m| m.tag() == tag)
}

pub(crate) fn unsupported(native: &Value, path: &[NodePathSegment]) -> Error {
    Error::unrepresentable(format!("a {} value", native.kind()), display_path(path))
}

/// Style for an implicit `str` tag: non-plain styles are kept, plain text
/// must survive as plain or it is double-quoted.
pub(crate) fn implicit_str_style(scalar: &Scalar, plain_ok: bool) -> ScalarStyle {
    match scalar.style() {
        ScalarStyle::Plain if plain_ok => ScalarStyle::Plain,
        ScalarStyle::Plain => ScalarStyle::DoubleQuoted,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_schema_declines_everything() {
        let schema = NullSchema::instance();
        assert!(schema.resolve_non_specific_scalar(&ScalarEvent::plain("1"), &[]).is_none());
        assert!(schema.resolve_non_specific_mapping(&CollectionStart::default(), &[]).is_none());
        assert!(schema.resolve_mapper(&TagName::STR).is_none());
        let err = schema.resolve_child_mapper(&Value::Int(1), &[]).unwrap_err();
        assert!(matches!(err, Error::Unrepresentable { .. }));
    }

    #[test]
    fn schemas_are_shareable() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn Schema>();
        assert_send_sync::<CoreSchema>();
    }
}
