//! Units end-to-end: custom unit declarations, conversions through node
//! modifications and the convertibility contract.

use dpml::base::approx_eq;
use dpml::units::{divide, multiply, parse_expression};
use dpml::{Dpml, DpmlError, Unit, UnitRegistry, Value, convert};

#[test]
fn test_base_units_close_under_multiplication() {
    let registry = UnitRegistry::new();
    let mut product = Unit::dimensionless(1.0);
    for unit in registry.base_units() {
        product = multiply(&product, unit);
    }
    assert!(approx_eq(product.magnitude, 1.0));
    assert!(product.physical().iter().all(|&e| e == 1));
}

#[test]
fn test_custom_unit_declaration() {
    let mut dpml = Dpml::from_text(
        "lambda@unit 550 nm\n\
         wave float = 2 [lambda]\n\
         wave = 1100 nm",
    );
    dpml.initialize().unwrap();
    assert_eq!(dpml.data()["wave"], Value::Float(2.0));
}

#[test]
fn test_duplicate_custom_unit() {
    let mut dpml = Dpml::from_text("m@unit 2 km");
    // collides with the [name] namespace only, so this one is fine
    dpml.initialize().unwrap();
    let mut dpml = Dpml::from_text("x@unit 1 m\nx@unit 2 m");
    assert!(matches!(
        dpml.initialize().unwrap_err(),
        DpmlError::DuplicateUnit { .. }
    ));
}

#[test]
fn test_convert_between_expressions() {
    let registry = UnitRegistry::new();
    let converted = convert(&registry, 1.0, "kg*m2/s2", "erg").unwrap();
    assert!(approx_eq(converted, 1e7));
    let converted = convert(&registry, 90.0, "km/h", "m/s").unwrap();
    assert!(approx_eq(converted, 25.0));
}

#[test]
fn test_convertibility_follows_physical_dimension() {
    let registry = UnitRegistry::new();
    // same physical sub-vector: convertible both ways, round trip stable
    let a = parse_expression(&registry, "W/m2").unwrap();
    let b = parse_expression(&registry, "erg/s/cm2").unwrap();
    assert_eq!(a.physical(), b.physical());
    let there = convert(&registry, 3.25, "W/m2", "erg/s/cm2").unwrap();
    let back = convert(&registry, there, "erg/s/cm2", "W/m2").unwrap();
    assert!(approx_eq(back, 3.25));
    // different physical sub-vector: rejected
    assert!(matches!(
        convert(&registry, 1.0, "W/m2", "W"),
        Err(DpmlError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_division_reassociation_in_node_units() {
    let registry = UnitRegistry::new();
    // kg/m/s2 reads as kg/(m*s2)
    let chained = parse_expression(&registry, "kg/m/s2").unwrap();
    let explicit = parse_expression(&registry, "kg/(m*s2)").unwrap();
    assert!(chained.approx_eq(&explicit));
    let quotient = divide(
        &parse_expression(&registry, "kg").unwrap(),
        &multiply(
            &parse_expression(&registry, "m").unwrap(),
            &parse_expression(&registry, "s2").unwrap(),
        ),
    );
    assert!(chained.approx_eq(&quotient));
}

#[test]
fn test_temperature_modification_chain() {
    let mut dpml = Dpml::from_text(
        "temp float = 300 K\n\
         temp = 26.85 Cel",
    );
    dpml.initialize().unwrap();
    let Value::Float(temp) = dpml.data()["temp"] else {
        panic!("expected float");
    };
    assert!(approx_eq(temp, 300.0));
}

#[test]
fn test_unknown_prefix_in_node_units() {
    let mut dpml = Dpml::from_text("name str = Johannes Brahms");
    assert!(matches!(
        dpml.initialize().unwrap_err(),
        DpmlError::UnknownPrefix { ref prefix, .. } if prefix == "Brahm"
    ));
}
