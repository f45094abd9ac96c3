//! Plain-style safety of scalar text.

/// Returns true if `s` can be written as a plain scalar and read back as the same
/// text, in both block and flow context. Only the syntax is checked here; whether
/// the text would resolve to another type is up to the schema.
#[inline]
pub(crate) fn is_plain_syntax_safe(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    let bytes = s.as_bytes();
    if bytes[0].is_ascii_whitespace()
        || bytes[bytes.len() - 1].is_ascii_whitespace()
        || matches!(
            bytes[0],
            b'-' | b'?'
                | b':'
                | b'['
                | b']'
                | b'{'
                | b'}'
                | b'#'
                | b'&'
                | b'*'
                | b'!'
                | b'|'
                | b'>'
                | b'\''
                | b'"'
                | b'%'
                | b'@'
                | b'`'
                | b','
        )
    {
        return false;
    }

    // Document markers.
    if s.starts_with("...") {
        return false;
    }

    // A colon is fine inside text, but not before a space or at the end.
    if s.contains(": ") || s.ends_with(':') || s.contains(" #") {
        return false;
    }

    // Flow indicators would end the scalar inside `[..]` or `{..}`.
    if contains_any_or_is_control(s, &[',', '[', ']', '{', '}', '\n', '\t']) {
        return false;
    }
    true
}

fn contains_any_or_is_control(string: &str, values: &[char]) -> bool {
    string
        .chars()
        .any(|x| values.iter().any(|v| &x == v || x.is_control()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinary_words_are_plain() {
        for s in ["plain", "two words", "a:b", "x-y", "3 items", "a#b"] {
            assert!(is_plain_syntax_safe(s), "{s}");
        }
    }

    #[test]
    fn indicators_and_whitespace_need_quotes() {
        for s in [
            "", " lead", "trail ", "- item", "key: v", "end:", "a #c", "[x]", "a,b", "*ref",
            "multi\nline", "...",
        ] {
            assert!(!is_plain_syntax_safe(s), "{s:?}");
        }
    }
}
