//! Parse events consumed by the loader and produced by the serializer.
//!
//! This is the narrow interface to whatever scanner/parser produced the stream.
//! [`crate::live_events`] adapts `saphyr_parser`; any other parser can feed
//! [`crate::load_events`] directly.

use serde::{Deserialize, Serialize};

use crate::location::Location;
use crate::tags::TagName;

/// Presentation style of a scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    pub fn is_plain(self) -> bool {
        matches!(self, ScalarStyle::Plain)
    }
}

impl From<saphyr_parser::ScalarStyle> for ScalarStyle {
    fn from(style: saphyr_parser::ScalarStyle) -> Self {
        match style {
            saphyr_parser::ScalarStyle::Plain => ScalarStyle::Plain,
            saphyr_parser::ScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            saphyr_parser::ScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            saphyr_parser::ScalarStyle::Literal => ScalarStyle::Literal,
            saphyr_parser::ScalarStyle::Folded => ScalarStyle::Folded,
            #[allow(unreachable_patterns)]
            _ => ScalarStyle::Plain,
        }
    }
}

/// Presentation style of a mapping or sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollectionStyle {
    /// Let the emitter choose.
    #[default]
    Any,
    Block,
    Flow,
}

/// Anchor identity as reported by the parser. Only equality matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub struct ScalarEvent {
    pub value: String,
    pub style: ScalarStyle,
    /// [`TagName::EMPTY`] when the source carried no tag.
    pub tag: TagName,
    pub anchor: Option<AnchorId>,
    pub location: Location,
}

impl ScalarEvent {
    /// An untagged plain scalar.
    pub fn plain<S: Into<String>>(value: S) -> Self {
        Self {
            value: value.into(),
            style: ScalarStyle::Plain,
            tag: TagName::EMPTY,
            anchor: None,
            location: Location::UNKNOWN,
        }
    }

    pub fn with_style(mut self, style: ScalarStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_tag(mut self, tag: TagName) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_anchor(mut self, anchor: AnchorId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// The tag the node carries before resolution.
    ///
    /// Untagged non-plain scalars carry `!` (YAML 1.2, 6.9.1): quoting opts out of
    /// content-based resolution.
    pub fn effective_tag(&self) -> TagName {
        if self.tag.is_empty() && !self.style.is_plain() {
            TagName::NON_SPECIFIC
        } else {
            self.tag.clone()
        }
    }
}

/// Properties of a mapping or sequence start.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct CollectionStart {
    pub tag: TagName,
    pub anchor: Option<AnchorId>,
    pub style: CollectionStyle,
    pub location: Location,
}

impl CollectionStart {
    pub fn with_tag(mut self, tag: TagName) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_anchor(mut self, anchor: AnchorId) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_style(mut self, style: CollectionStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    StreamStart,
    StreamEnd,
    DocumentStart { location: Location },
    DocumentEnd { location: Location },
    Scalar(ScalarEvent),
    SequenceStart(CollectionStart),
    SequenceEnd { location: Location },
    MappingStart(CollectionStart),
    MappingEnd { location: Location },
    Alias { anchor: AnchorId, location: Location },
}

impl Event {
    pub fn location(&self) -> Location {
        match self {
            Event::StreamStart | Event::StreamEnd => Location::UNKNOWN,
            Event::DocumentStart { location }
            | Event::DocumentEnd { location }
            | Event::SequenceEnd { location }
            | Event::MappingEnd { location }
            | Event::Alias { location, .. } => *location,
            Event::Scalar(scalar) => scalar.location,
            Event::SequenceStart(start) | Event::MappingStart(start) => start.location,
        }
    }

    /// Short event name for "unexpected event" diagnostics.
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Event::StreamStart => "stream start",
            Event::StreamEnd => "stream end",
            Event::DocumentStart { .. } => "document start",
            Event::DocumentEnd { .. } => "document end",
            Event::Scalar(_) => "scalar",
            Event::SequenceStart(_) => "sequence start",
            Event::SequenceEnd { .. } => "sequence end",
            Event::MappingStart(_) => "mapping start",
            Event::MappingEnd { .. } => "mapping end",
            Event::Alias { .. } => "alias",
        }
    }
}
