//! Defines error and its location
use std::fmt;

use saphyr_parser::ScanError;

use crate::budget::BudgetBreach;
use crate::location::Location;
use crate::tags::TagName;

/// Errors raised while loading a stream, constructing native values, or
/// representing native values as nodes.
#[derive(Debug)]
pub enum Error {
    /// Free-form error with optional source location (scanner failures end up here).
    Message {
        msg: String,
        location: Location,
    },
    /// Unexpected end of the event stream.
    Eof {
        location: Location,
    },
    /// Something else than the expected event was seen.
    Unexpected {
        expected: &'static str,
        found: &'static str,
        location: Location,
    },
    /// Alias references an anchor that was not defined earlier in the document.
    UnknownAnchor {
        id: usize,
        location: Location,
    },
    /// An explicit, specific tag that the active schema has no mapper for.
    UnknownTag {
        tag: TagName,
        location: Location,
    },
    /// An explicit tag was placed on a node of the wrong kind (`!!int` on a mapping).
    TagKindMismatch {
        tag: TagName,
        kind: &'static str,
        location: Location,
    },
    /// The same scalar key appears twice in one mapping.
    DuplicateKey {
        key: String,
        location: Location,
    },
    /// Scalar text does not parse as the type its tag names.
    InvalidScalar {
        tag: TagName,
        value: String,
        location: Location,
    },
    /// Constructing a native value reached a node that is still being constructed.
    RecursiveAlias {
        location: Location,
    },
    /// The schema cannot classify a native value for dumping. This is a
    /// configuration error, not a data error.
    Unrepresentable {
        what: String,
        path: String,
    },
    /// A YAML budget limit was exceeded.
    Budget {
        breach: BudgetBreach,
        location: Location,
    },
    /// Unexpected I/O error. This may happen only when loading from a reader.
    IOError {
        cause: std::io::Error,
    },
}

impl Error {
    /// Construct a `Message` error with no known location.
    pub(crate) fn msg<S: Into<String>>(s: S) -> Self {
        Error::Message {
            msg: s.into(),
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn eof() -> Self {
        Error::Eof {
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn unexpected(expected: &'static str, found: &'static str) -> Self {
        Error::Unexpected {
            expected,
            found,
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn unknown_anchor(id: usize) -> Self {
        Error::UnknownAnchor {
            id,
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn unknown_tag(tag: TagName) -> Self {
        Error::UnknownTag {
            tag,
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn invalid_scalar(tag: &TagName, value: &str) -> Self {
        Error::InvalidScalar {
            tag: tag.clone(),
            value: value.to_owned(),
            location: Location::UNKNOWN,
        }
    }

    pub(crate) fn unrepresentable<S: Into<String>>(what: S, path: String) -> Self {
        Error::Unrepresentable {
            what: what.into(),
            path,
        }
    }

    /// Attach/override a concrete location to this error and return it.
    pub(crate) fn with_location(mut self, set_location: Location) -> Self {
        match &mut self {
            Error::Message { location, .. }
            | Error::Eof { location }
            | Error::Unexpected { location, .. }
            | Error::UnknownAnchor { location, .. }
            | Error::UnknownTag { location, .. }
            | Error::TagKindMismatch { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::InvalidScalar { location, .. }
            | Error::RecursiveAlias { location }
            | Error::Budget { location, .. } => {
                *location = set_location;
            }
            // these errors do not support location
            Error::Unrepresentable { .. } | Error::IOError { .. } => {}
        }
        self
    }

    /// If the error has a known location, return it.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::Message { location, .. }
            | Error::Eof { location }
            | Error::Unexpected { location, .. }
            | Error::UnknownAnchor { location, .. }
            | Error::UnknownTag { location, .. }
            | Error::TagKindMismatch { location, .. }
            | Error::DuplicateKey { location, .. }
            | Error::InvalidScalar { location, .. }
            | Error::RecursiveAlias { location }
            | Error::Budget { location, .. } => {
                if location.is_known() {
                    Some(*location)
                } else {
                    None
                }
            }
            Error::Unrepresentable { .. } | Error::IOError { .. } => None,
        }
    }

    /// Map a `saphyr_parser::ScanError` into our error type with location.
    pub(crate) fn from_scan_error(err: ScanError) -> Self {
        let mark = err.marker();
        let location = Location::new(mark.line(), mark.col() + 1);
        Error::Message {
            msg: err.info().to_owned(),
            location,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Message { msg, location } => fmt_with_location(f, msg, location),
            Error::Eof { location } => fmt_with_location(f, "unexpected end of input", location),
            Error::Unexpected {
                expected,
                found,
                location,
            } => fmt_with_location(
                f,
                &format!("unexpected {found}: expected {expected}"),
                location,
            ),
            Error::UnknownAnchor { id, location } => fmt_with_location(
                f,
                &format!("alias references unknown anchor id {id}"),
                location,
            ),
            Error::UnknownTag { tag, location } => fmt_with_location(
                f,
                &format!("no mapper is registered for tag `{tag}`"),
                location,
            ),
            Error::TagKindMismatch {
                tag,
                kind,
                location,
            } => fmt_with_location(f, &format!("tag `{tag}` cannot be applied to a {kind}"), location),
            Error::DuplicateKey { key, location } => {
                fmt_with_location(f, &format!("duplicate mapping key: {key}"), location)
            }
            Error::InvalidScalar {
                tag,
                value,
                location,
            } => fmt_with_location(f, &format!("invalid `{tag}` scalar: `{value}`"), location),
            Error::RecursiveAlias { location } => fmt_with_location(
                f,
                "alias refers to a node that contains it; cannot build a native value",
                location,
            ),
            Error::Unrepresentable { what, path } => {
                write!(f, "schema cannot represent {what} at {path}")
            }
            Error::Budget { breach, location } => {
                fmt_with_location(f, &format!("YAML budget breached: {breach:?}"), location)
            }
            Error::IOError { cause } => write!(f, "IO error: {}", cause),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IOError { cause } => Some(cause),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(cause: std::io::Error) -> Self {
        Error::IOError { cause }
    }
}

/// Print a message optionally suffixed with "at line X, column Y".
fn fmt_with_location(f: &mut fmt::Formatter<'_>, msg: &str, location: &Location) -> fmt::Result {
    if location.is_known() {
        write!(
            f,
            "{msg} at line {}, column {}",
            location.row, location.column
        )
    } else {
        write!(f, "{msg}")
    }
}

/// Convert a budget breach report into a user-facing error.
pub(crate) fn budget_error(breach: BudgetBreach) -> Error {
    Error::Budget {
        breach,
        location: Location::UNKNOWN,
    }
}
