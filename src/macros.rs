//! Public macros for constructing option structs without relying on struct literal syntax.
//!
//! These macros keep call sites ergonomic while allowing the option structs to
//! grow new fields without breaking callers.

/// Construct [`crate::Options`] from `Default` and a list of field assignments.
///
/// ```rust
/// use saphyr_repr::options::UnknownTagPolicy;
///
/// let options = saphyr_repr::options! {
///     unknown_tags: UnknownTagPolicy::Preserve,
///     budget: None,
/// };
/// assert!(options.budget.is_none());
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut opt = $crate::Options::default();
        $(
            opt.$field = $value;
        )*
        opt
    }};
}

/// Construct [`crate::Budget`] from `Default` and a list of field assignments.
///
/// ```rust
/// let budget = saphyr_repr::budget! {
///     max_depth: 16,
///     max_nodes: 1_000,
/// };
/// assert_eq!(budget.max_depth, 16);
/// ```
#[macro_export]
macro_rules! budget {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut b = $crate::Budget::default();
        $(
            b.$field = $value;
        )*
        b
    }};
}
