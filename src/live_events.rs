//!
//! Live events: a thin adapter from `saphyr_parser::Parser` to [`Event`].
//!
//! Responsibilities
//! - Provide owned events for the loader.
//! - Translate parser tags into [`TagName`] (expanding `!!x` shorthands).
//! - Translate numeric anchor ids (0 meaning "none") into `Option<AnchorId>`.
//! - Track source locations for diagnostics.
//!
//! Unlike a replaying event source, aliases are passed through untouched: the
//! loader resolves them to the already-built node so the graph can share it.

use std::borrow::Cow;

use saphyr_parser::{Event as RawEvent, Parser, StrInput, Tag};

use crate::error::Error;
use crate::event::{AnchorId, CollectionStart, CollectionStyle, Event, ScalarEvent};
use crate::location::location_from_span;
use crate::tags::TagName;

/// Live event source that wraps `saphyr_parser::Parser`.
pub struct LiveEvents<'a> {
    /// Underlying streaming parser that produces raw events from the input.
    parser: Parser<'a, StrInput<'a>>,
    /// Set after the first scan error; the parser is not resumed past it.
    failed: bool,
}

impl<'a> LiveEvents<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            parser: Parser::new_from_str(input),
            failed: false,
        }
    }
}

fn anchor(id: usize) -> Option<AnchorId> {
    (id != 0).then_some(AnchorId(id))
}

/// The parser reports a bare `!` as an empty handle with suffix `!`; any other
/// tag is its resolved handle prefix followed by the suffix.
fn tag_name(tag: Option<Cow<'_, Tag>>) -> TagName {
    let Some(tag) = tag else {
        return TagName::EMPTY;
    };
    match (tag.handle.as_str(), tag.suffix.as_str()) {
        ("", "!") => TagName::NON_SPECIFIC,
        (handle, suffix) => TagName::new(format!("{handle}{suffix}")),
    }
}

impl Iterator for LiveEvents<'_> {
    type Item = Result<Event, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let (raw, span) = match self.parser.next()? {
                Ok(item) => item,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(Error::from_scan_error(err)));
                }
            };
            let location = location_from_span(&span);

            let ev = match raw {
                RawEvent::Nothing => continue,
                RawEvent::StreamStart => Event::StreamStart,
                RawEvent::StreamEnd => Event::StreamEnd,
                RawEvent::DocumentStart(_) => Event::DocumentStart { location },
                RawEvent::DocumentEnd => Event::DocumentEnd { location },
                RawEvent::Scalar(val, style, anchor_id, tag) => Event::Scalar(ScalarEvent {
                    value: val.into_owned(),
                    style: style.into(),
                    tag: tag_name(tag),
                    anchor: anchor(anchor_id),
                    location,
                }),
                RawEvent::SequenceStart(anchor_id, tag) => Event::SequenceStart(CollectionStart {
                    tag: tag_name(tag),
                    anchor: anchor(anchor_id),
                    style: CollectionStyle::Any,
                    location,
                }),
                RawEvent::SequenceEnd => Event::SequenceEnd { location },
                RawEvent::MappingStart(anchor_id, tag) => Event::MappingStart(CollectionStart {
                    tag: tag_name(tag),
                    anchor: anchor(anchor_id),
                    style: CollectionStyle::Any,
                    location,
                }),
                RawEvent::MappingEnd => Event::MappingEnd { location },
                RawEvent::Alias(anchor_id) => Event::Alias {
                    anchor: AnchorId(anchor_id),
                    location,
                },
            };
            return Some(Ok(ev));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ScalarStyle;

    fn events(input: &str) -> Vec<Event> {
        LiveEvents::new(input)
            .collect::<Result<Vec<_>, _>>()
            .expect("scan failed")
    }

    #[test]
    fn tags_are_expanded() {
        let evs = events("!!int 8\n");
        let scalar = evs
            .iter()
            .find_map(|e| match e {
                Event::Scalar(s) => Some(s),
                _ => None,
            })
            .expect("no scalar");
        assert_eq!(scalar.tag, TagName::INT);
        assert_eq!(scalar.value, "8");
    }

    #[test]
    fn quoted_scalar_reports_style_and_no_tag() {
        let evs = events("'null'\n");
        let scalar = evs
            .iter()
            .find_map(|e| match e {
                Event::Scalar(s) => Some(s),
                _ => None,
            })
            .expect("no scalar");
        assert!(scalar.tag.is_empty());
        assert_eq!(scalar.style, ScalarStyle::SingleQuoted);
        assert!(scalar.effective_tag().is_non_specific());
    }

    #[test]
    fn bare_exclamation_mark_is_non_specific() {
        let evs = events("- ! x\n- ! {a: b}\n- ! [a]\n");
        let tags: Vec<_> = evs
            .iter()
            .filter_map(|e| match e {
                Event::Scalar(s) if s.value == "x" => Some(s.tag.clone()),
                Event::MappingStart(start) => Some(start.tag.clone()),
                Event::SequenceStart(start) if !start.tag.is_empty() => Some(start.tag.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            tags,
            vec![TagName::NON_SPECIFIC, TagName::NON_SPECIFIC, TagName::NON_SPECIFIC]
        );
    }

    #[test]
    fn local_and_verbatim_tags_keep_their_text() {
        let evs = events("- !point 1\n- !<tag:yaml.org,2002:str> 2\n- !!str 3\n");
        let tags: Vec<_> = evs
            .iter()
            .filter_map(|e| match e {
                Event::Scalar(s) => Some(s.tag.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            tags,
            vec![TagName::new("!point"), TagName::STR, TagName::STR]
        );
    }

    #[test]
    fn anchors_and_aliases_keep_ids() {
        let evs = events("a: &x [1]\nb: *x\n");
        let anchored = evs.iter().find_map(|e| match e {
            Event::SequenceStart(start) => start.anchor,
            _ => None,
        });
        let alias = evs.iter().find_map(|e| match e {
            Event::Alias { anchor, .. } => Some(*anchor),
            _ => None,
        });
        assert!(anchored.is_some());
        assert_eq!(anchored, alias);
    }

    #[test]
    fn scan_error_stops_the_stream() {
        let mut it = LiveEvents::new("a: [1, 2\n");
        let mut saw_error = false;
        for item in it.by_ref() {
            if item.is_err() {
                saw_error = true;
            }
        }
        assert!(saw_error);
        assert!(it.next().is_none());
    }
}
