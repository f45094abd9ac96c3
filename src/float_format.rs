//! Float rendering that always yields a valid YAML float spelling.

use num_traits::float::FloatCore;
use zmij::Float;

/// Format as float string, make changes to be sure valid YAML float.
///
/// Finite values always carry a `.` so the text matches both the JSON and the
/// Core float grammars and never the integer ones.
pub(crate) fn push_float_string<F: Float + FloatCore>(target: &mut String, f: F) {
    if f.is_nan() {
        target.push_str(".nan");
    } else if f.is_infinite() {
        if f.is_sign_positive() {
            target.push_str(".inf");
        } else {
            target.push_str("-.inf");
        }
    } else {
        let mut buf = zmij::Buffer::new();
        // Branches .is_nan and .is_infinite are already covered above
        let s = buf.format_finite(f);
        if !s.as_bytes().contains(&b'.') {
            if let Some(exp_pos) = s.find('e').or_else(|| s.find('E')) {
                // Has exponent but no decimal: insert .0 before the e
                // "4e-6" -> "4.0e-6"
                target.push_str(&s[..exp_pos]);
                target.push_str(".0");
                target.push_str(&s[exp_pos..]);
            } else {
                // No decimal and no exponent: append .0
                target.push_str(s);
                target.push_str(".0");
            }
        } else {
            target.push_str(s);
        }
    }
}

/// Render a float, or `None` when the value has no finite spelling.
pub(crate) fn finite_float_string(f: f64) -> Option<String> {
    if !f.is_finite() {
        return None;
    }
    let mut s = String::new();
    push_float_string(&mut s, f);
    Some(s)
}
