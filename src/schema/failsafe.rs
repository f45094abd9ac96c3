//! The YAML 1.2 failsafe schema.
//!
//! The strict variant makes every untagged scalar a string. The partial variant
//! follows YAML 1.2.2 §10.1.2 literally: only quoted or `!`-tagged scalars become
//! strings and plain scalars keep the `?` tag, leaving a partial representation.

use crate::error::Error;
use crate::event::{CollectionStart, CollectionStyle, ScalarEvent, ScalarStyle};
use crate::mapper::{MAP_MAPPER, NodeMapper, SEQ_MAPPER, STR_MAPPER};
use crate::node::{Mapping, Scalar, Sequence};
use crate::path::NodePathSegment;
use crate::quoting::is_plain_syntax_safe;
use crate::schema::{Schema, find_mapper, implicit_str_style, is_opted_out, unsupported};
use crate::tags::TagName;
use crate::value::Value;

static MAPPERS: [&dyn NodeMapper; 3] = [&STR_MAPPER, &MAP_MAPPER, &SEQ_MAPPER];

/// Resolves scalars to `str`, mappings to `map` and sequences to `seq`.
/// Native values other than strings, sequences and mappings cannot be represented.
#[derive(Clone, Copy, Debug)]
pub struct FailsafeSchema {
    partial: bool,
}

impl FailsafeSchema {
    /// Every untagged scalar resolves to `str`.
    pub const fn strict() -> Self {
        FailsafeSchema { partial: false }
    }

    /// Plain untagged scalars stay unresolved; strings are written quoted.
    pub const fn partial() -> Self {
        FailsafeSchema { partial: true }
    }

    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn instance() -> &'static FailsafeSchema {
        static INSTANCE: FailsafeSchema = FailsafeSchema::strict();
        &INSTANCE
    }
}

impl Default for FailsafeSchema {
    fn default() -> Self {
        Self::strict()
    }
}

impl Schema for FailsafeSchema {
    fn resolve_non_specific_scalar(
        &self,
        scalar: &ScalarEvent,
        _path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        if self.partial && !is_opted_out(scalar) {
            return None;
        }
        Some(&STR_MAPPER)
    }

    fn resolve_non_specific_mapping(
        &self,
        _start: &CollectionStart,
        _path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        Some(&MAP_MAPPER)
    }

    fn resolve_non_specific_sequence(
        &self,
        _start: &CollectionStart,
        _path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        Some(&SEQ_MAPPER)
    }

    fn is_tag_implicit_scalar(
        &self,
        tag: &TagName,
        scalar: &Scalar,
        _path: &[NodePathSegment],
    ) -> Option<ScalarStyle> {
        if *tag != TagName::STR {
            return None;
        }
        let plain_ok = !self.partial && is_plain_syntax_safe(scalar.value());
        Some(implicit_str_style(scalar, plain_ok))
    }

    fn is_tag_implicit_mapping(
        &self,
        tag: &TagName,
        mapping: &Mapping,
        _path: &[NodePathSegment],
    ) -> Option<CollectionStyle> {
        (*tag == TagName::MAP).then_some(mapping.style())
    }

    fn is_tag_implicit_sequence(
        &self,
        tag: &TagName,
        sequence: &Sequence,
        _path: &[NodePathSegment],
    ) -> Option<CollectionStyle> {
        (*tag == TagName::SEQ).then_some(sequence.style())
    }

    fn resolve_mapper(&self, tag: &TagName) -> Option<&dyn NodeMapper> {
        find_mapper(&MAPPERS, tag)
    }

    fn resolve_child_mapper(
        &self,
        native: &Value,
        path: &[NodePathSegment],
    ) -> Result<&dyn NodeMapper, Error> {
        match native {
            Value::String(_) => Ok(&STR_MAPPER),
            Value::Sequence(_) => Ok(&SEQ_MAPPER),
            Value::Mapping(_) => Ok(&MAP_MAPPER),
            other => Err(unsupported(other, path)),
        }
    }
}
