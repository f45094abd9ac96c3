use serde::{Deserialize, Serialize};

use crate::budget::{Budget, BudgetReport};

/// Duplicate key handling policy for mappings.
///
/// Two keys are duplicates when both are scalars with the same resolved tag and
/// the same text. Collection keys are never compared.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateKeyPolicy {
    /// Error out on encountering a duplicate key.
    Error,
    /// First key wins: later duplicate pairs are dropped.
    FirstWins,
    /// Last key wins: the later pair replaces the earlier one in its position.
    LastWins,
    /// Keep every pair as written.
    Keep,
}

/// What to do with an explicit tag the active schema has no mapper for.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownTagPolicy {
    /// Fail the load: the author asked for a type the schema cannot provide.
    Error,
    /// Keep the tag on the node; constructing a native value from it fails later.
    Preserve,
}

/// Loader configuration options.
///
/// ```rust
/// use saphyr_repr::options::DuplicateKeyPolicy;
/// use saphyr_repr::{from_str_with_options, CoreSchema};
///
/// let options = saphyr_repr::options! {
///     budget: Some(saphyr_repr::budget! {
///         max_documents: 2,
///     }),
///     duplicate_keys: DuplicateKeyPolicy::LastWins,
/// };
///
/// let doc = from_str_with_options("a: 1\na: 2\n", CoreSchema::instance(), options).unwrap();
/// assert_eq!(doc.root().get("a").and_then(|n| n.scalar_value()), Some("2"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct Options {
    /// Optional YAML budget enforced while events are consumed.
    pub budget: Option<Budget>,
    /// Optional callback invoked with the final budget report after loading.
    /// It is invoked both when loading is successful and when budget was breached.
    #[serde(skip)]
    pub budget_report: Option<fn(&BudgetReport)>,
    /// Policy for duplicate keys.
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Policy for explicit tags with no mapper in the active schema.
    pub unknown_tags: UnknownTagPolicy,
    /// Upper bound on decoded bytes read by the reader-based entry points.
    pub max_reader_input_bytes: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            budget: Some(Budget::default()),
            budget_report: None,
            duplicate_keys: DuplicateKeyPolicy::Error,
            unknown_tags: UnknownTagPolicy::Error,
            max_reader_input_bytes: Some(256 * 1024 * 1024),
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("budget", &self.budget)
            .field(
                "budget_report",
                &if self.budget_report.is_some() { "set" } else { "none" },
            )
            .field("duplicate_keys", &self.duplicate_keys)
            .field("unknown_tags", &self.unknown_tags)
            .field("max_reader_input_bytes", &self.max_reader_input_bytes)
            .finish()
    }
}
