//! YAML tag names.
//!
//! A [`TagName`] is an immutable tag URI compared and hashed by its canonical
//! string. Two values are reserved:
//! - [`TagName::EMPTY`]: no tag was given at all (`?`), so a schema may infer one;
//! - [`TagName::NON_SPECIFIC`]: the `!` marker, which opts a node out of
//!   content-based resolution.

use std::borrow::Cow;
use std::fmt;

pub(crate) const CORE_PREFIX: &str = "tag:yaml.org,2002:";

const TAG_STR_CANONICAL: &str = "tag:yaml.org,2002:str";
const TAG_MAP_CANONICAL: &str = "tag:yaml.org,2002:map";
const TAG_SEQ_CANONICAL: &str = "tag:yaml.org,2002:seq";
const TAG_NULL_CANONICAL: &str = "tag:yaml.org,2002:null";
const TAG_BOOL_CANONICAL: &str = "tag:yaml.org,2002:bool";
const TAG_INT_CANONICAL: &str = "tag:yaml.org,2002:int";
const TAG_FLOAT_CANONICAL: &str = "tag:yaml.org,2002:float";

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TagName(Option<Cow<'static, str>>);

impl TagName {
    /// No tag present in the source; the schema infers one.
    pub const EMPTY: TagName = TagName(None);
    /// The `!` non-specific tag.
    pub const NON_SPECIFIC: TagName = TagName(Some(Cow::Borrowed("!")));

    pub const STR: TagName = TagName::from_static(TAG_STR_CANONICAL);
    pub const MAP: TagName = TagName::from_static(TAG_MAP_CANONICAL);
    pub const SEQ: TagName = TagName::from_static(TAG_SEQ_CANONICAL);
    pub const NULL: TagName = TagName::from_static(TAG_NULL_CANONICAL);
    pub const BOOL: TagName = TagName::from_static(TAG_BOOL_CANONICAL);
    pub const INT: TagName = TagName::from_static(TAG_INT_CANONICAL);
    pub const FLOAT: TagName = TagName::from_static(TAG_FLOAT_CANONICAL);

    /// Wrap a canonical tag without normalization. Usable in `const` context.
    pub const fn from_static(canonical: &'static str) -> Self {
        TagName(Some(Cow::Borrowed(canonical)))
    }

    /// Build a tag from the text a parser reported.
    ///
    /// `!!x` and the `tag:yaml.org,2002:!x` spelling some parsers produce are both
    /// expanded to `tag:yaml.org,2002:x`. The empty string is [`TagName::EMPTY`].
    pub fn new<S: Into<Cow<'static, str>>>(tag: S) -> Self {
        let tag = tag.into();
        if tag.is_empty() {
            return TagName::EMPTY;
        }
        if tag == "!" {
            return TagName::NON_SPECIFIC;
        }
        if let Some(suffix) = tag.strip_prefix("!!") {
            return TagName(Some(Cow::Owned(format!("{CORE_PREFIX}{suffix}"))));
        }
        if let Some(suffix) = tag
            .strip_prefix(CORE_PREFIX)
            .and_then(|rest| rest.strip_prefix('!'))
        {
            return TagName(Some(Cow::Owned(format!("{CORE_PREFIX}{suffix}"))));
        }
        TagName(Some(tag))
    }

    /// True when no tag was given at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// True for the `!` marker.
    pub fn is_non_specific(&self) -> bool {
        matches!(&self.0, Some(t) if t == "!")
    }

    /// True for every tag that names a concrete type.
    pub fn is_specific(&self) -> bool {
        !self.is_empty() && !self.is_non_specific()
    }

    /// Canonical string, or `None` for [`TagName::EMPTY`].
    pub fn value(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// `!!suffix` for tags in the `tag:yaml.org,2002:` namespace.
    pub fn shorthand(&self) -> Option<String> {
        self.value()?
            .strip_prefix(CORE_PREFIX)
            .map(|suffix| format!("!!{suffix}"))
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("?"),
            Some(t) => f.write_str(t),
        }
    }
}

impl fmt::Debug for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TagName({self})")
    }
}

impl From<&str> for TagName {
    fn from(value: &str) -> Self {
        TagName::new(value.to_owned())
    }
}

impl From<String> for TagName {
    fn from(value: String) -> Self {
        TagName::new(value)
    }
}
