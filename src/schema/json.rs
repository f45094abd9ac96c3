//! The YAML 1.2 JSON schema.
//!
//! Plain scalars resolve only when they match the JSON grammar exactly; quoting
//! or a `!` tag makes a scalar a string. The lenient variant resolves any other
//! plain scalar to a string as well instead of leaving it untagged.

use crate::error::Error;
use crate::event::{CollectionStart, CollectionStyle, ScalarEvent, ScalarStyle};
use crate::float_format::finite_float_string;
use crate::mapper::{MAP_MAPPER, NodeMapper, SEQ_MAPPER, STR_MAPPER, ScalarMapper};
use crate::node::{Mapping, Scalar, Sequence};
use crate::path::{NodePathSegment, display_path};
use crate::quoting::is_plain_syntax_safe;
use crate::schema::grammar::{
    ScalarClass, classify_json, is_json_null, parse_json_bool, parse_json_float, parse_json_int,
};
use crate::schema::{Schema, find_mapper, implicit_str_style, is_opted_out};
use crate::tags::TagName;
use crate::value::Value;

fn parse_null(s: &str) -> Option<Value> {
    is_json_null(s).then_some(Value::Null)
}

fn render_null(v: &Value) -> Option<String> {
    v.is_null().then(|| "null".to_owned())
}

fn parse_bool(s: &str) -> Option<Value> {
    parse_json_bool(s).map(Value::Bool)
}

fn render_bool(v: &Value) -> Option<String> {
    v.as_bool().map(|b| b.to_string())
}

fn parse_int(s: &str) -> Option<Value> {
    parse_json_int(s).map(Value::Int)
}

fn render_int(v: &Value) -> Option<String> {
    v.as_i64().map(|i| i.to_string())
}

fn parse_float(s: &str) -> Option<Value> {
    parse_json_float(s).map(Value::Float)
}

fn render_float(v: &Value) -> Option<String> {
    v.as_f64().and_then(finite_float_string)
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

#[derive(Clone, Copy, Debug)]
pub struct JsonSchema {
    lenient: bool,
}

impl JsonSchema {
    /// Plain scalars outside the JSON grammar stay unresolved.
    pub const fn strict() -> Self {
        JsonSchema { lenient: false }
    }

    /// Plain scalars outside the JSON grammar resolve to `str`.
    pub const fn lenient() -> Self {
        JsonSchema { lenient: true }
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    pub fn instance() -> &'static JsonSchema {
        static INSTANCE: JsonSchema = JsonSchema::strict();
        &INSTANCE
    }
}

impl Default for JsonSchema {
    fn default() -> Self {
        Self::strict()
    }
}

impl Schema for JsonSchema {
    fn resolve_non_specific_scalar(
        &self,
        scalar: &ScalarEvent,
        _path: &[NodePathSegment],
    ) -> Option<&dyn NodeMapper> {
        if is_opted_out(scalar) {
            return Some(&STR_MAPPER);
        }
        match classify_json(&scalar.value) {
            Some(class) => Some(class_mapper(class)),
            None if self.lenient => Some(&STR_MAPPER),
            None => None,
        }
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
        let class = classify_json(scalar.value());
        if *tag == TagName::STR {
            // Strict JSON only yields `str` for quoted text.
            let plain_ok =
                self.lenient && class.is_none() && is_plain_syntax_safe(scalar.value());
            return Some(implicit_str_style(scalar, plain_ok));
        }
        match class {
            Some(class) if class.tag() == *tag => Some(ScalarStyle::Plain),
            _ => None,
        }
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
        let mapper: &dyn NodeMapper = match native {
            Value::Null => &NULL_MAPPER,
            Value::Bool(_) => &BOOL_MAPPER,
            Value::Int(_) => &INT_MAPPER,
            Value::Float(f) if f.is_finite() => &FLOAT_MAPPER,
            Value::Float(f) => {
                return Err(Error::unrepresentable(
                    format!("non-finite float {f}"),
                    display_path(path),
                ));
            }
            Value::String(_) => &STR_MAPPER,
            Value::Sequence(_) => &SEQ_MAPPER,
            Value::Mapping(_) => &MAP_MAPPER,
        };
        Ok(mapper)
    }
}
