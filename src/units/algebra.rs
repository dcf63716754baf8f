//! Dimensional algebra: operations, token recognition, expression parsing
//! and value conversion.

use crate::base::{DpmlError, Result};
use crate::model::Value;
use crate::units::registry::UnitRegistry;
use crate::units::unit::{DECIMAL_SLOT, Unit};

/// Normalize the magnitude into `[1, 10)`, moving excess powers of ten into
/// the decimal slot. Applied after every operation.
fn rebase(mut unit: Unit) -> Unit {
    if !(unit.magnitude > 0.0 && unit.magnitude.is_finite()) {
        return unit;
    }
    let exp = unit.magnitude.log10().floor() as i32;
    if exp != 0 {
        unit.magnitude /= 10f64.powi(exp);
        unit.base[DECIMAL_SLOT] += exp;
    }
    unit
}

pub fn multiply(a: &Unit, b: &Unit) -> Unit {
    let mut base = a.base;
    for (slot, exp) in base.iter_mut().zip(b.base.iter()) {
        *slot += exp;
    }
    rebase(Unit::new(a.magnitude * b.magnitude, base))
}

pub fn divide(a: &Unit, b: &Unit) -> Unit {
    let mut base = a.base;
    for (slot, exp) in base.iter_mut().zip(b.base.iter()) {
        *slot -= exp;
    }
    rebase(Unit::new(a.magnitude / b.magnitude, base))
}

pub fn power(unit: &Unit, exponent: i32) -> Unit {
    let mut base = unit.base;
    for slot in base.iter_mut() {
        *slot *= exponent;
    }
    rebase(Unit::new(unit.magnitude.powi(exponent), base))
}

/// Whether a token is a plain number (`360`, `1.5`, `1.6021773e-19`).
fn is_number(token: &str) -> bool {
    let (mantissa, exponent) = match token.split_once('e') {
        Some((m, e)) => (m, Some(e)),
        None => (token, None),
    };
    if mantissa.is_empty() || !mantissa.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return false;
    }
    if !mantissa.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    match exponent {
        Some(e) => {
            !e.is_empty() && e.chars().all(|c| c.is_ascii_digit() || c == '+' || c == '-')
        }
        None => true,
    }
}

/// Parse a single unit token: either a number, or prefix + symbol + signed
/// integer exponent, recognized right to left.
pub fn parse_token(registry: &UnitRegistry, token: &str) -> Result<Unit> {
    if is_number(token) {
        let magnitude: f64 = token.parse().map_err(|_| DpmlError::UnknownUnit {
            token: token.to_string(),
        })?;
        let mut unit = rebase(Unit::dimensionless(magnitude));
        unit.symbol = Some(token.into());
        return Ok(unit);
    }
    let chars: Vec<char> = token.chars().collect();

    // signed integer exponent tail
    let mut sym_end = chars.len();
    while sym_end > 0 && matches!(chars[sym_end - 1], '0'..='9' | '+' | '-') {
        sym_end -= 1;
    }
    let exponent: Option<i32> = if sym_end < chars.len() {
        let tail: String = chars[sym_end..].iter().collect();
        Some(tail.parse().map_err(|_| DpmlError::UnknownUnit {
            token: token.to_string(),
        })?)
    } else {
        None
    };

    // longest suffix matching a registered symbol
    let mut sym_start = sym_end;
    while sym_start > 0 {
        let candidate: String = chars[sym_start - 1..sym_end].iter().collect();
        if registry.any_symbol_has_suffix(&candidate) {
            sym_start -= 1;
        } else {
            break;
        }
    }
    let symbol: String = chars[sym_start..sym_end].iter().collect();
    let base_unit = registry
        .lookup(&symbol)
        .ok_or_else(|| DpmlError::UnknownUnit {
            token: token.to_string(),
        })?;

    // the remainder must be a known prefix
    let prefix: String = chars[..sym_start].iter().collect();
    let mut unit = if prefix.is_empty() {
        base_unit.clone()
    } else {
        let prefix_unit = registry
            .prefix(&prefix)
            .ok_or_else(|| DpmlError::UnknownPrefix {
                prefix: prefix.clone(),
                token: token.to_string(),
            })?;
        multiply(prefix_unit, base_unit)
    };
    if let Some(exp) = exponent {
        unit = power(&unit, exp);
    }
    unit.arbitrary = base_unit.arbitrary;
    unit.symbol = Some(token.into());
    Ok(unit)
}

/// Parse a unit expression: tokens combined by `*`, `/` and parentheses.
///
/// Division re-associates so that `a/b/c` means `a/(b*c)`; everything after
/// the first `/` ends up in the denominator unless parenthesized back out.
pub fn parse_expression(registry: &UnitRegistry, expr: &str) -> Result<Unit> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err(DpmlError::UnknownUnit {
            token: expr.to_string(),
        });
    }
    expression_inner(registry, trimmed, trimmed)
}

fn expression_inner(registry: &UnitRegistry, input: &str, original: &str) -> Result<Unit> {
    if input.matches('(').count() != input.matches(')').count() {
        return Err(DpmlError::UnbalancedParen {
            expr: original.to_string(),
        });
    }
    let chars: Vec<char> = input.chars().collect();
    if chars.is_empty() {
        return Err(DpmlError::UnknownUnit {
            token: original.to_string(),
        });
    }
    let mut left = String::new();
    let mut symbol = chars[0];
    let mut index = 1;
    while index < chars.len() {
        match symbol {
            '*' => {
                let right: String = chars[index..].iter().collect();
                return Ok(multiply(
                    &expression_inner(registry, &left, original)?,
                    &expression_inner(registry, &right, original)?,
                ));
            }
            '/' => {
                let mut right: String = chars[index..].iter().collect();
                // Re-associate chained divisions: the last `/` becomes the
                // outermost one, so kg/m/s2 divides kg by m*s2.
                if right.contains('/') {
                    let mut parts: Vec<String> =
                        right.split('/').map(str::to_string).collect();
                    right = parts.pop().unwrap_or_default();
                    parts.insert(0, left);
                    left = parts.join("/");
                }
                return Ok(divide(
                    &expression_inner(registry, &left, original)?,
                    &expression_inner(registry, &right, original)?,
                ));
            }
            '(' => {
                let mut depth = 1usize;
                symbol = chars[index];
                index += 1;
                while depth > 0 {
                    match symbol {
                        '(' => depth += 1,
                        ')' => depth -= 1,
                        other => left.push(other),
                    }
                    if index >= chars.len() {
                        return expression_inner(registry, &left, original);
                    }
                    symbol = chars[index];
                    index += 1;
                }
            }
            other => {
                left.push(other);
                symbol = chars[index];
                index += 1;
            }
        }
    }
    left.push(symbol);
    let mut unit = parse_token(registry, left.trim())?;
    unit.symbol = Some(original.into());
    Ok(unit)
}

/// Convert a scalar between two unit expressions.
pub fn convert(registry: &UnitRegistry, value: f64, from: &str, to: &str) -> Result<f64> {
    let conversion = conversion_fn(registry, from, to)?;
    Ok(conversion(value))
}

/// Convert a typed value between two unit expressions, element-wise for
/// arrays. Non-numeric values pass through untouched.
pub fn convert_value(registry: &UnitRegistry, value: &Value, from: &str, to: &str) -> Result<Value> {
    let conversion = conversion_fn(registry, from, to)?;
    Ok(value.map_numeric(&conversion))
}

fn conversion_fn(
    registry: &UnitRegistry,
    from: &str,
    to: &str,
) -> Result<impl Fn(f64) -> f64 + Copy> {
    let unit1 = parse_expression(registry, from)?;
    let unit2 = parse_expression(registry, to)?;
    let factor = divide(&unit1, &unit2);
    if !factor.is_physically_dimensionless() {
        return Err(DpmlError::DimensionMismatch {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    let linear = factor.scale();
    let arb1 = unit1.arbitrary;
    let arb2 = unit2.arbitrary;
    let scale1 = unit1.scale();
    let scale2 = unit2.scale();
    Ok(move |value: f64| {
        if arb1.is_none() && arb2.is_none() {
            return value * linear;
        }
        let base = match arb1 {
            Some(a) => a.to_base(value, scale1),
            None => value * scale1,
        };
        match arb2 {
            Some(a) => a.from_base(base, scale2),
            None => base / scale2,
        }
    })
}

/// Define and register a custom unit from a `name@unit DEFINITION` node.
/// The definition is a magnitude and/or unit expression (`550 nm`); the unit
/// becomes addressable as `[name]`.
pub fn define_custom(registry: &mut UnitRegistry, name: &str, definition: &str) -> Result<()> {
    let joined = definition
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("*");
    let mut unit = parse_expression(registry, &joined)?;
    unit.symbol = Some(format!("[{name}]").into());
    unit.name = Some(name.into());
    unit.definition = Some(joined.into());
    unit.arbitrary = None;
    registry.register(unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::approx_eq;
    use crate::units::unit::NUM_PHYSICAL;

    fn registry() -> UnitRegistry {
        UnitRegistry::new()
    }

    #[test]
    fn test_operations_match_component_arithmetic() {
        let a = Unit::new(2.0, [1, 2, 3, 4, 5, 6, 7, 8, 0]);
        let b = Unit::new(4.0, [2, 3, 4, 5, 6, 7, 8, 9, 0]);
        let product = multiply(&a, &b);
        assert!(approx_eq(product.scale(), 8.0));
        assert_eq!(&product.base[..NUM_PHYSICAL], &[3, 5, 7, 9, 11, 13, 15, 17]);
        let quotient = divide(&b, &a);
        assert!(approx_eq(quotient.scale(), 2.0));
        assert_eq!(&quotient.base[..NUM_PHYSICAL], &[1, 1, 1, 1, 1, 1, 1, 1]);
        let cube = power(&a, 3);
        assert!(approx_eq(cube.scale(), 8.0));
        assert_eq!(&cube.base[..NUM_PHYSICAL], &[3, 6, 9, 12, 15, 18, 21, 24]);
    }

    #[test]
    fn test_rebase_into_unit_interval() {
        let unit = rebase(Unit::dimensionless(360.0));
        assert!(approx_eq(unit.magnitude, 3.6));
        assert_eq!(unit.base[DECIMAL_SLOT], 2);
        let unit = rebase(Unit::dimensionless(0.2));
        assert!(approx_eq(unit.magnitude, 2.0));
        assert_eq!(unit.base[DECIMAL_SLOT], -1);
    }

    #[test]
    fn test_multiply_then_divide_is_identity() {
        let reg = registry();
        let a = parse_expression(&reg, "kg*m2/s2").unwrap();
        let b = parse_expression(&reg, "cm/min").unwrap();
        let round_trip = divide(&multiply(&a, &b), &b);
        assert!(round_trip.approx_eq(&a));
    }

    #[test]
    fn test_token_prefix_and_exponent() {
        let reg = registry();
        let m = reg.lookup("m").unwrap().clone();
        assert!(parse_token(&reg, "m").unwrap().approx_eq(&m));
        assert!(parse_token(&reg, "m-2").unwrap().approx_eq(&power(&m, -2)));
        let mm = multiply(reg.prefix("m").unwrap(), &m);
        assert!(parse_token(&reg, "mm").unwrap().approx_eq(&mm));
        let km2 = power(&multiply(reg.prefix("k").unwrap(), &m), 2);
        assert!(parse_token(&reg, "km2").unwrap().approx_eq(&km2));
        let uohm3 = power(
            &multiply(reg.prefix("u").unwrap(), reg.lookup("Ohm").unwrap()),
            3,
        );
        assert!(parse_token(&reg, "uOhm3").unwrap().approx_eq(&uohm3));
        let pi = reg.lookup("[pi]").unwrap().clone();
        assert!(parse_token(&reg, "[pi]").unwrap().approx_eq(&pi));
    }

    #[test]
    fn test_token_unknown_prefix() {
        let reg = registry();
        let err = parse_token(&reg, "Brahms").unwrap_err();
        assert!(matches!(
            err,
            DpmlError::UnknownPrefix { ref prefix, .. } if prefix == "Brahm"
        ));
    }

    #[test]
    fn test_expression_forms() {
        let reg = registry();
        let cases = [
            ("N", "kg*m/s2"),        // basic operations
            ("Pa", "kg/(s2*m)"),     // parentheses in denominator
            ("J", "(kg*m2)/s2"),     // parentheses in numerator
            ("W", "kg*(m2/s3)"),     // fraction in parentheses
            ("A", "C*s-1"),          // negative exponents
            ("V", "kg*(m2/(s2*C))"), // nested parentheses
            ("Ohm", "((kg*m2)/s)/C2"), // multiple fractions with parentheses
            ("S", "s*C2/kg/m2"),     // chained divisions
            ("deg", "2*[pi]*rad/360"), // numbers and constants
        ];
        for (symbol, expr) in cases {
            let expected = reg.lookup(symbol).unwrap();
            let parsed = parse_expression(&reg, expr).unwrap();
            assert!(
                parsed.approx_eq(expected),
                "{symbol} != {expr}: {parsed:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn test_every_derived_definition_reduces_to_its_vector() {
        let reg = registry();
        for unit in reg.derived_units() {
            let Some(definition) = unit.definition.clone() else {
                continue;
            };
            let parsed = parse_expression(&reg, &definition).unwrap();
            assert!(
                parsed.approx_eq(unit),
                "{:?}: {} reduces to {:?}",
                unit.symbol,
                definition,
                parsed
            );
        }
    }

    #[test]
    fn test_unbalanced_parentheses() {
        let reg = registry();
        assert!(matches!(
            parse_expression(&reg, "kg*(m2/s2"),
            Err(DpmlError::UnbalancedParen { .. })
        ));
    }

    #[test]
    fn test_conversions() {
        let reg = registry();
        let cases = [
            (1.0, "m", 1e-3, "km"),
            (1.0, "kJ", 1e3, "J"),
            (1.0, "eV", 1.6021773e-4, "fJ"),
            (1.0, "erg", 624.150636, "GeV"),
            (1.0, "deg", 0.017453293, "rad"),
            (2.0, "[ppth]", 0.2, "%"),
            (1.0, "Cel", 274.15, "K"),
            (1.0, "kCel", 1273.15, "K"),
            (1e3, "K", 726.85, "Cel"),
            (1.0, "kK", 0.72685, "kCel"),
        ];
        for (value, from, expected, to) in cases {
            let converted = convert(&reg, value, from, to).unwrap();
            assert!(
                approx_eq(converted, expected),
                "{value} {from} -> {to}: {converted} != {expected}"
            );
        }
    }

    #[test]
    fn test_conversion_round_trip() {
        let reg = registry();
        for (from, to) in [("km/h", "m/s"), ("erg", "J"), ("Cel", "K"), ("deg", "'")] {
            let there = convert(&reg, 12.5, from, to).unwrap();
            let back = convert(&reg, there, to, from).unwrap();
            assert!(approx_eq(back, 12.5), "{from}<->{to}: {back}");
        }
    }

    #[test]
    fn test_incompatible_dimensions_rejected() {
        let reg = registry();
        assert!(matches!(
            convert(&reg, 1.0, "m", "s"),
            Err(DpmlError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_custom_unit_definition() {
        let mut reg = registry();
        define_custom(&mut reg, "lambda", "550 nm").unwrap();
        let converted = convert(&reg, 2.0, "[lambda]", "nm").unwrap();
        assert!(approx_eq(converted, 1100.0));
        let err = define_custom(&mut reg, "lambda", "1 m").unwrap_err();
        assert!(matches!(err, DpmlError::DuplicateUnit { .. }));
    }
}
