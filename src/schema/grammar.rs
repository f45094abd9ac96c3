//! Lexical grammars of the JSON and Core schemas, plus the value parsers
//! behind their scalar mappers.
//!
//! Matching is an exact, whole-string test; resolution tries null, bool, int,
//! float in that order and the first match wins.

use crate::tags::TagName;

/// Content-based classification of a plain scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScalarClass {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

impl ScalarClass {
    pub(crate) fn tag(self) -> TagName {
        match self {
            ScalarClass::Null => TagName::NULL,
            ScalarClass::Bool => TagName::BOOL,
            ScalarClass::Int => TagName::INT,
            ScalarClass::Float => TagName::FLOAT,
            ScalarClass::Str => TagName::STR,
        }
    }
}

fn count_digits(bytes: &[u8], radix: u32) -> usize {
    bytes
        .iter()
        .take_while(|b| (**b as char).is_digit(radix))
        .count()
}

/// `([eE][-+]?[0-9]+)?` anchored at `i` and running to the end of `bytes`.
fn exponent_to_end(bytes: &[u8], mut i: usize) -> bool {
    if i == bytes.len() {
        return true;
    }
    if !matches!(bytes[i], b'e' | b'E') {
        return false;
    }
    i += 1;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }
    let digits = count_digits(&bytes[i..], 10);
    digits > 0 && i + digits == bytes.len()
}

/// `-?(0|[1-9][0-9]*)`: returns the index just past the integer part.
fn json_integer_part(bytes: &[u8]) -> Option<usize> {
    let mut i = usize::from(bytes.first() == Some(&b'-'));
    match bytes.get(i) {
        Some(b'0') => Some(i + 1),
        Some(b'1'..=b'9') => {
            i += 1;
            Some(i + count_digits(&bytes[i..], 10))
        }
        _ => None,
    }
}

// JSON schema

pub(crate) fn is_json_null(s: &str) -> bool {
    s == "null"
}

pub(crate) fn parse_json_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

pub(crate) fn is_json_int(s: &str) -> bool {
    let bytes = s.as_bytes();
    json_integer_part(bytes) == Some(bytes.len())
}

/// `-?(0|[1-9][0-9]*)(\.[0-9]*)?([eE][-+]?[0-9]+)?`
pub(crate) fn is_json_float(s: &str) -> bool {
    let bytes = s.as_bytes();
    let Some(mut i) = json_integer_part(bytes) else {
        return false;
    };
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        i += count_digits(&bytes[i..], 10);
    }
    exponent_to_end(bytes, i)
}

pub(crate) fn classify_json(s: &str) -> Option<ScalarClass> {
    if is_json_null(s) {
        Some(ScalarClass::Null)
    } else if parse_json_bool(s).is_some() {
        Some(ScalarClass::Bool)
    } else if is_json_int(s) {
        Some(ScalarClass::Int)
    } else if is_json_float(s) {
        Some(ScalarClass::Float)
    } else {
        None
    }
}

pub(crate) fn parse_json_int(s: &str) -> Option<i64> {
    if !is_json_int(s) {
        return None;
    }
    s.parse::<i64>().ok()
}

pub(crate) fn parse_json_float(s: &str) -> Option<f64> {
    if !is_json_float(s) {
        return None;
    }
    s.parse::<f64>().ok()
}

// Core schema

pub(crate) fn is_core_null(s: &str) -> bool {
    matches!(s, "null" | "Null" | "NULL" | "~" | "")
}

pub(crate) fn parse_core_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Radix and digits of a Core integer: `[-+]?[0-9]+`, `0o[0-7]+` or `0x[0-9a-fA-F]+`.
fn core_int_parts(s: &str) -> Option<(bool, u32, &str)> {
    if let Some(digits) = s.strip_prefix("0o") {
        return (!digits.is_empty() && count_digits(digits.as_bytes(), 8) == digits.len())
            .then_some((false, 8, digits));
    }
    if let Some(digits) = s.strip_prefix("0x") {
        return (!digits.is_empty() && count_digits(digits.as_bytes(), 16) == digits.len())
            .then_some((false, 16, digits));
    }
    let (neg, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    (!digits.is_empty() && count_digits(digits.as_bytes(), 10) == digits.len())
        .then_some((neg, 10, digits))
}

pub(crate) fn is_core_int(s: &str) -> bool {
    core_int_parts(s).is_some()
}

/// `[-+]?(\.[0-9]+|[0-9]+(\.[0-9]*)?)([eE][-+]?[0-9]+)?`, `[-+]?\.(inf|Inf|INF)`
/// or `\.(nan|NaN|NAN)`.
pub(crate) fn is_core_float(s: &str) -> bool {
    let bytes = s.as_bytes();
    let signed = matches!(bytes.first(), Some(b'+' | b'-'));
    let unsigned = if signed { &s[1..] } else { s };
    if matches!(unsigned, ".inf" | ".Inf" | ".INF") {
        return true;
    }
    if matches!(s, ".nan" | ".NaN" | ".NAN") {
        return true;
    }
    let mut i = usize::from(signed);
    let whole = count_digits(&bytes[i..], 10);
    i += whole;
    if whole == 0 {
        if bytes.get(i) != Some(&b'.') {
            return false;
        }
        i += 1;
        let fraction = count_digits(&bytes[i..], 10);
        if fraction == 0 {
            return false;
        }
        i += fraction;
    } else if bytes.get(i) == Some(&b'.') {
        i += 1;
        i += count_digits(&bytes[i..], 10);
    }
    exponent_to_end(bytes, i)
}

pub(crate) fn classify_core(s: &str) -> ScalarClass {
    if is_core_null(s) {
        ScalarClass::Null
    } else if parse_core_bool(s).is_some() {
        ScalarClass::Bool
    } else if is_core_int(s) {
        ScalarClass::Int
    } else if is_core_float(s) {
        ScalarClass::Float
    } else {
        ScalarClass::Str
    }
}

fn parse_digits_u128(digits: &str, radix: u32) -> Option<u128> {
    let mut val: u128 = 0;
    for c in digits.chars() {
        let d = c.to_digit(radix)?;
        val = val.checked_mul(radix as u128)?;
        val = val.checked_add(d as u128)?;
    }
    Some(val)
}

/// Value of a Core integer, normalized to decimal. `None` if the text does not
/// match the grammar or the value does not fit an `i64`.
pub(crate) fn parse_core_int(s: &str) -> Option<i64> {
    let (neg, radix, digits) = core_int_parts(s)?;
    let magnitude = parse_digits_u128(digits, radix)?;
    let magnitude = i128::try_from(magnitude).ok()?;
    let value = if neg { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

pub(crate) fn parse_core_float(s: &str) -> Option<f64> {
    if !is_core_float(s) {
        return None;
    }
    match s {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => Some(f64::NAN),
        _ => s.parse::<f64>().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_grammar_is_strict() {
        for s in ["0", "-0", "42", "-17"] {
            assert_eq!(classify_json(s), Some(ScalarClass::Int), "{s}");
        }
        for s in ["0.", "12e03", "-1.5E+2", "3.25"] {
            assert_eq!(classify_json(s), Some(ScalarClass::Float), "{s}");
        }
        for s in [
            "", "Null", "True", "+1", "01", ".5", "0x1F", "0x3A", "0o10", "+12e03", "1e", "~",
            ".inf", "-.Inf", ".nan",
        ] {
            assert_eq!(classify_json(s), None, "{s}");
        }
        assert_eq!(classify_json("null"), Some(ScalarClass::Null));
        assert_eq!(classify_json("false"), Some(ScalarClass::Bool));
    }

    #[test]
    fn core_grammar_spellings() {
        for s in ["", "~", "null", "Null", "NULL"] {
            assert_eq!(classify_core(s), ScalarClass::Null, "{s:?}");
        }
        for s in ["true", "True", "TRUE", "false", "FALSE"] {
            assert_eq!(classify_core(s), ScalarClass::Bool, "{s}");
        }
        for s in ["0", "+12", "-7", "0o14", "0x3A", "007"] {
            assert_eq!(classify_core(s), ScalarClass::Int, "{s}");
        }
        for s in ["1.", ".5", "+12e03", "-2E+05", ".inf", "-.Inf", ".NaN"] {
            assert_eq!(classify_core(s), ScalarClass::Float, "{s}");
        }
        for s in ["tRue", "nULL", "0o8", "0X1F", "-0x1", "+.nan", ".", "1e", "1_000", "inf"] {
            assert_eq!(classify_core(s), ScalarClass::Str, "{s}");
        }
    }

    #[test]
    fn core_ints_normalize_to_decimal() {
        assert_eq!(parse_core_int("0o10"), Some(8));
        assert_eq!(parse_core_int("0x3A"), Some(58));
        assert_eq!(parse_core_int("-12"), Some(-12));
        assert_eq!(parse_core_int("+12"), Some(12));
        assert_eq!(parse_core_int("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_core_int("9223372036854775808"), None);
        assert_eq!(parse_core_int("0x"), None);
    }

    #[test]
    fn core_float_values() {
        assert_eq!(parse_core_float("+12e03"), Some(12000.0));
        assert_eq!(parse_core_float(".5"), Some(0.5));
        assert_eq!(parse_core_float("1."), Some(1.0));
        assert_eq!(parse_core_float("-.INF"), Some(f64::NEG_INFINITY));
        assert!(parse_core_float(".nan").is_some_and(f64::is_nan));
        assert_eq!(parse_core_float("abc"), None);
    }

    #[test]
    fn json_values() {
        assert_eq!(parse_json_int("-17"), Some(-17));
        assert_eq!(parse_json_int("017"), None);
        assert_eq!(parse_json_float("12e03"), Some(12000.0));
        assert_eq!(parse_json_float(".5"), None);
    }
}
