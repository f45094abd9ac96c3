//! Source location utilities.

use saphyr_parser::Span as ParserSpan;
use serde::{Deserialize, Serialize};

/// Row/column location within the source YAML document (1-indexed).
///
/// Nodes built from native values (rather than parsed text) carry [`Location::UNKNOWN`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub row: usize,
    pub column: usize,
}

impl Location {
    /// Sentinel meaning "no position available".
    pub const UNKNOWN: Self = Self { row: 0, column: 0 };

    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    pub const fn unknown() -> Self {
        Self::UNKNOWN
    }

    pub fn is_known(&self) -> bool {
        self.row != 0 && self.column != 0
    }
}

/// Convert a `saphyr_parser::Span` to a 1-indexed `Location`.
pub(crate) fn location_from_span(span: &ParserSpan) -> Location {
    let start = &span.start;
    Location::new(start.line(), start.col() + 1)
}
