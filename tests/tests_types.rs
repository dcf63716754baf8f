//! Declarations: names, scalar types, options, dimensions, defined flags,
//! string quoting and escapes.

use dpml::{Dpml, DpmlError, Value};

fn parse(code: &str) -> indexmap::IndexMap<String, Value> {
    let mut dpml = Dpml::from_text(code);
    dpml.initialize().expect("parse should succeed");
    dpml.data()
}

fn parse_err(code: &str) -> DpmlError {
    let mut dpml = Dpml::from_text(code);
    dpml.initialize().expect_err("parse should fail")
}

#[test]
fn test_names() {
    let data = parse("very-long.node23_NAME int = 1");
    assert_eq!(data["very-long.node23_NAME"], Value::Int(1));
    assert!(matches!(
        parse_err("wrong$name int = 3"),
        DpmlError::MalformedLine { .. }
    ));
}

#[test]
fn test_scalar_types() {
    let data = parse(
        "adult bool = true\n\
         age int = 20 a\n\
         weight float = 63.3 kg\n\
         name str = 'Laura'",
    );
    assert_eq!(data["adult"], Value::Bool(true));
    assert_eq!(data["age"], Value::Int(20));
    assert_eq!(data["weight"], Value::Float(63.3));
    assert_eq!(data["name"], Value::Str("Laura".into()));
}

#[test]
fn test_options_allow_declared_values() {
    let data = parse(
        "coordinates int = 1\n  \
           = 1  # linear\n  \
           = 2  # cylindrical\n  \
           = 3  # spherical\n\
         assets str = none\n  \
           = house\n  \
           = car",
    );
    assert_eq!(data["coordinates"], Value::Int(1));
    assert_eq!(data["assets"], Value::Null);
}

#[test]
fn test_defined_flag_rejects_null_with_options() {
    let err = parse_err(
        "length float! = none cm\n  \
           = 12 cm\n  \
           = 34 cm",
    );
    assert!(matches!(
        err,
        DpmlError::UndefinedRequired { ref name, .. } if name == "length"
    ));
}

#[test]
fn test_bool_rejects_options() {
    let err = parse_err(
        "deposition bool = true\n  \
           = true\n  \
           = false",
    );
    assert!(matches!(err, DpmlError::OptionUnsupported { kind: "bool", .. }));
}

#[test]
fn test_dimensions() {
    let data = parse(
        "counts int[3] = [4234,34,2]\n\
         lengths float[2:][2] = [[4234,34],[234,34]] cm\n\
         colleagues str[:] = [\"John\",\"Patricia\",\"Lena\"]\n\
         logic bool[2] = [true,false]",
    );
    let Value::Array(counts) = &data["counts"] else {
        panic!("expected array");
    };
    assert_eq!(counts.shape, vec![3]);
    assert_eq!(counts.elems[0], Value::Int(4234));
    let Value::Array(lengths) = &data["lengths"] else {
        panic!("expected array");
    };
    assert_eq!(lengths.shape, vec![2, 2]);
    assert_eq!(lengths.elems[3], Value::Float(34.0));
    let Value::Array(colleagues) = &data["colleagues"] else {
        panic!("expected array");
    };
    assert_eq!(colleagues.elems[1], Value::Str("Patricia".into()));
    let Value::Array(logic) = &data["logic"] else {
        panic!("expected array");
    };
    assert_eq!(logic.elems, vec![Value::Bool(true), Value::Bool(false)]);
}

#[test]
fn test_dimension_bounds_violations() {
    for (code, size, bound) in [
        ("counts int[2] = [4234,34,2]", 3, "> 2"),
        ("counts int[2] = [4234]", 1, "< 2"),
        ("counts int[:2] = [4234,34,2]", 3, "> 2"),
        ("counts int[2:] = [4234]", 1, "< 2"),
    ] {
        let err = parse_err(code);
        match err {
            DpmlError::DimensionOutOfRange {
                size: s, bound: b, ..
            } => {
                assert_eq!(s, size, "{code}");
                assert_eq!(b, bound, "{code}");
            }
            other => panic!("{code}: unexpected error {other:?}"),
        }
    }
    let err = parse_err("counts int[2][3:] = [[234,4234],[234,34]]");
    assert!(matches!(
        err,
        DpmlError::DimensionOutOfRange { axis: 1, size: 2, .. }
    ));
}

#[test]
fn test_defined_flag() {
    let data = parse("debts bool = None\nchildren int! = 3");
    assert_eq!(data["debts"], Value::Null);
    assert_eq!(data["children"], Value::Int(3));
    assert!(matches!(
        parse_err("counts int! = none"),
        DpmlError::UndefinedRequired { .. }
    ));
}

#[test]
fn test_strings_and_escapes() {
    let data = parse(
        "country str = Canada              # strings without whitespace\n\
         name str = \"Johannes Brahms\"      # strings with a whitespace\n\
         counts int[3] = \"[0, 1, 2]\"       # arrays with whitespaces\n\
         answers bool[2] = \"[true, false]\"\n\
         names str[2] = '[\"Jolana\", \"Anastasia\"]'\n\
         girl_friend str = \"\\\"l'amie\\\"\"    # escaping of double quotes\n\
         boy_friend str = '\"l\\'ami\"'       # escaping of single quotes\n\
         hashtag str = '#nocomment'        # comment\n\
         anticommutator str = '{a,b}'      # this is not an import",
    );
    assert_eq!(data["country"], Value::Str("Canada".into()));
    assert_eq!(data["name"], Value::Str("Johannes Brahms".into()));
    let Value::Array(counts) = &data["counts"] else {
        panic!("expected array");
    };
    assert_eq!(counts.elems, vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
    assert_eq!(data["girl_friend"], Value::Str("\"l'amie\"".into()));
    assert_eq!(data["boy_friend"], Value::Str("\"l'ami\"".into()));
    assert_eq!(data["hashtag"], Value::Str("#nocomment".into()));
    assert_eq!(data["anticommutator"], Value::Str("{a,b}".into()));
}

#[test]
fn test_unknown_type_keyword() {
    assert!(matches!(
        parse_err("name unknown = 3"),
        DpmlError::UnknownType { .. }
    ));
}

#[test]
fn test_invalid_casts() {
    assert!(matches!(
        parse_err("count int = 3.5"),
        DpmlError::InvalidCast { .. }
    ));
    assert!(matches!(
        parse_err("flag bool = yes"),
        DpmlError::InvalidCast { .. }
    ));
}
