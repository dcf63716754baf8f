//! Format specs for template tokens.
//!
//! Grammar: `:` then optional width/precision (`8`, `.3`, `8.3`) then a
//! type specifier in `{s,d,f,e,b}`. Numeric output is right-aligned into
//! the width, strings left-aligned; scientific notation uses a sign and a
//! two-digit exponent (`6.230e+01`).

use crate::base::{DpmlError, Result};
use crate::model::Value;

/// Apply a `:[width][.precision][sdfeb]` spec to a value.
pub fn format_with_spec(value: &Value, spec: &str) -> Result<String> {
    let invalid = || DpmlError::InvalidFormat {
        spec: spec.to_string(),
    };
    let body = spec.strip_prefix(':').ok_or_else(invalid)?;
    let letter_at = body
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(invalid)?;
    let (numbers, letters) = body.split_at(letter_at);
    let conversion = letters.chars().next().ok_or_else(invalid)?;
    let (width, precision) = parse_width_precision(numbers).ok_or_else(invalid)?;

    let rendered = match (conversion, value) {
        ('s', v) => return Ok(pad_left_aligned(&v.to_string(), width)),
        ('d', Value::Int(i)) => i.to_string(),
        ('b', Value::Bool(b)) => b.to_string(),
        ('f', Value::Float(x)) => format!("{:.*}", precision.unwrap_or(6), x),
        ('f', Value::Int(i)) => format!("{:.*}", precision.unwrap_or(6), *i as f64),
        ('e', Value::Float(x)) => format_exponential(*x, precision.unwrap_or(6)),
        ('e', Value::Int(i)) => format_exponential(*i as f64, precision.unwrap_or(6)),
        _ => return Err(invalid()),
    };
    Ok(pad_right_aligned(&rendered, width))
}

fn parse_width_precision(numbers: &str) -> Option<(Option<usize>, Option<usize>)> {
    if numbers.is_empty() {
        return Some((None, None));
    }
    let (width_str, precision_str) = match numbers.split_once('.') {
        Some((w, p)) => (w, Some(p)),
        None => (numbers, None),
    };
    let width = if width_str.is_empty() {
        None
    } else {
        Some(width_str.parse().ok()?)
    };
    let precision = match precision_str {
        Some(p) if !p.is_empty() => Some(p.parse().ok()?),
        Some(_) => None,
        None => None,
    };
    Some((width, precision))
}

fn pad_right_aligned(text: &str, width: Option<usize>) -> String {
    match width {
        Some(width) if width > text.chars().count() => {
            format!("{}{}", " ".repeat(width - text.chars().count()), text)
        }
        _ => text.to_string(),
    }
}

fn pad_left_aligned(text: &str, width: Option<usize>) -> String {
    match width {
        Some(width) if width > text.chars().count() => {
            format!("{}{}", text, " ".repeat(width - text.chars().count()))
        }
        _ => text.to_string(),
    }
}

/// Scientific notation with a signed two-digit exponent.
pub fn format_exponential(x: f64, precision: usize) -> String {
    if x == 0.0 {
        return format!("{:.precision$}e+00", 0.0);
    }
    let mut exponent = x.abs().log10().floor() as i32;
    let mantissa = x / 10f64.powi(exponent);
    let mut rounded: f64 = format!("{mantissa:.precision$}")
        .parse()
        .unwrap_or(mantissa);
    if rounded.abs() >= 10.0 {
        rounded /= 10.0;
        exponent += 1;
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{rounded:.precision$}e{sign}{:02}", exponent.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fmt_float;
    use rstest::rstest;

    #[rstest]
    #[case(62.3, 3, "6.230e+01")]
    #[case(0.00123, 2, "1.23e-03")]
    #[case(9.999, 1, "1.0e+01")]
    #[case(1.0, 3, "1.000e+00")]
    fn test_exponential(#[case] x: f64, #[case] precision: usize, #[case] expected: &str) {
        assert_eq!(format_exponential(x, precision), expected);
    }

    #[test]
    fn test_spec_forms() {
        assert_eq!(
            format_with_spec(&Value::Str("Tina".into()), ":s").unwrap(),
            "Tina"
        );
        assert_eq!(format_with_spec(&Value::Int(30), ":d").unwrap(), "30");
        assert_eq!(
            format_with_spec(&Value::Float(62.3), ":.3e").unwrap(),
            "6.230e+01"
        );
        assert_eq!(
            format_with_spec(&Value::Float(2.5), ":8.2f").unwrap(),
            "    2.50"
        );
        assert_eq!(
            format_with_spec(&Value::Bool(true), ":b").unwrap(),
            "true"
        );
    }

    #[test]
    fn test_spec_type_mismatch() {
        assert!(format_with_spec(&Value::Str("x".into()), ":d").is_err());
    }

    #[test]
    fn test_plain_float_keeps_decimal() {
        assert_eq!(fmt_float(177.0), "177.0");
    }
}
