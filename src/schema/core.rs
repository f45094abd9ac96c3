//! The YAML 1.2 core schema, the recommended default.
//!
//! A superset of the JSON schema with more human-friendly spellings: `~` and
//! the empty string for null, capitalized booleans, octal and hexadecimal
//! integers, and `.inf` / `.nan` floats. Plain scalars that match none of these
//! are strings, so every node resolves.

use crate::error::Error;
use crate::event::{CollectionStart, CollectionStyle, ScalarEvent, ScalarStyle};
use crate::float_format::push_float_string;
use crate::mapper::{MAP_MAPPER, NodeMapper, SEQ_MAPPER, STR_MAPPER, ScalarMapper};
use crate::node::{Mapping, Scalar, Sequence};
use crate::path::NodePathSegment;
use crate::quoting::is_plain_syntax_safe;
use crate::schema::grammar::{
    ScalarClass, classify_core, is_core_null, parse_core_bool, parse_core_float, parse_core_int,
};
use crate::schema::{Schema, find_mapper, implicit_str_style, is_opted_out};
use crate::tags::TagName;
use crate::value::Value;

fn parse_null(s: &str) -> Option<Value> {
    is_core_null(s).then_some(Value::Null)
}

fn render_null(v: &Value) -> Option<String> {
    v.is_null().then(|| "null".to_owned())
}

fn parse_bool(s: &str) -> Option<Value> {
    parse_core_bool(s).map(Value::Bool)
}

fn render_bool(v: &Value) -> Option<String> {
    v.as_bool().map(|b| b.to_string())
}

fn parse_int(s: &str) -> Option<Value> {
    parse_core_int(s).map(Value::Int)
}

fn render_int(v: &Value) -> Option<String> {
    v.as_i64().map(|i| i.to_string())
}

fn parse_float(s: &str) -> Option<Value> {
    parse_core_float(s).map(Value::Float)
}

fn render_float(v: &Value) -> Option<String> {
    let f = v.as_f64()?;
    let mut s = String::new();
    push_float_string(&mut s, f);
    Some(s)
}

static NULL_MAPPER: ScalarMapper = ScalarMapper::new(TagName::NULL, parse_null, render_null);
static BOOL_MAPPER: ScalarMapper = ScalarMapper::new(TagName::BOOL, parse_bool, render_bool);
static INT_MAPPER: ScalarMapper = ScalarMapper::new(TagName::INT, parse_int, render_int);
static FLOAT_MAPPER: ScalarMapper = ScalarMapper::new(TagName::FLOAT, parse_float, render_float);

static MAPPERS: [&dyn NodeMapper; 7] = [
    &NULL_MAPPER,
    &BOOL_MAPPER,
    &INT_MAPPER,
    &FLOAT_MAPPER,
    &STR_MAPPER,
    &MAP_MAPPER,
    &SEQ_MAPPER,
];

fn class_mapper(class: ScalarClass) -> &'static dyn NodeMapper {
    match class {
        ScalarClass::Null => &NULL_MAPPER,
        ScalarClass::Bool => &BOOL_MAPPER,
        ScalarClass::Int => &INT_MAPPER,
        ScalarClass::Float => &FLOAT_MAPPER,
        ScalarClass::Str => &STR_MAPPER,
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CoreSchema;

impl CoreSchema {
    pub fn instance() -> &'static CoreSchema {
        static INSTANCE: CoreSchema = CoreSchema;
        &INSTANCE
    }
}

impl Schema for CoreSchema {
    fn resolve_non_specific_scalar(
        &self,
        scalar: &ScalarEvent,
        _path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        if is_opted_out(scalar) {
            return Some(&STR_MAPPER);
        }
        Some(class_mapper(classify_core(&scalar.value)))
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
        let class = classify_core(scalar.value());
        if *tag == TagName::STR {
            let plain_ok = class == ScalarClass::Str && is_plain_syntax_safe(scalar.value());
            return Some(implicit_str_style(scalar, plain_ok));
        }
        (class.tag() == *tag).then_some(ScalarStyle::Plain)
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
        _path: &[NodePathSegment],
    ) -> Result<&dyn NodeMapper, Error> {
        let mapper: &dyn NodeMapper = match native {
            Value::Null => &NULL_MAPPER,
            Value::Bool(_) => &BOOL_MAPPER,
            Value::Int(_) => &INT_MAPPER,
            Value::Float(_) => &FLOAT_MAPPER,
            Value::String(_) => &STR_MAPPER,
            Value::Sequence(_) => &SEQ_MAPPER,
            Value::Mapping(_) => &MAP_MAPPER,
        };
        Ok(mapper)
    }
}
