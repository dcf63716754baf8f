//! Static unit catalogue: base units, SI prefixes, derived units,
//! dimensionless numbers and arbitrary units.
//!
//! Slot order of the base vectors: length, mass, time, temperature, charge,
//! luminous intensity, amount, angle, decimal exponent. The definition
//! column of a derived unit must reduce to its stored vector; the registry
//! tests verify that.

use crate::units::arbitrary::{ArbitraryScale, CELSIUS, DECIBEL, FAHRENHEIT};
use crate::units::unit::BaseVector;

/// `(magnitude, base, symbol, name)`
pub(super) type BaseRow = (f64, BaseVector, &'static str, &'static str);

/// `(decimal exponent, symbol, name)`
pub(super) type PrefixRow = (i32, &'static str, &'static str);

/// `(magnitude, base, symbol, definition, name)`
pub(super) type DerivedRow = (
    f64,
    BaseVector,
    &'static str,
    Option<&'static str>,
    &'static str,
);

/// `(base, symbol, name, conversion)`
pub(super) type ArbitraryRow = (
    BaseVector,
    &'static str,
    &'static str,
    &'static (dyn ArbitraryScale + Sync),
);

pub(super) const BASE_UNITS: &[BaseRow] = &[
    (1.0, [1, 0, 0, 0, 0, 0, 0, 0, 0], "m", "metre"),
    (1.0, [0, 1, 0, 0, 0, 0, 0, 0, 0], "g", "gram"),
    (1.0, [0, 0, 1, 0, 0, 0, 0, 0, 0], "s", "second"),
    (1.0, [0, 0, 0, 1, 0, 0, 0, 0, 0], "K", "kelvin"),
    (1.0, [0, 0, 0, 0, 1, 0, 0, 0, 0], "C", "coulomb"),
    (1.0, [0, 0, 0, 0, 0, 1, 0, 0, 0], "cd", "candela"),
    (1.0, [0, 0, 0, 0, 0, 0, 1, 0, 0], "mol", "mole"),
    (1.0, [0, 0, 0, 0, 0, 0, 0, 1, 0], "rad", "radian"),
];

pub(super) const PREFIXES: &[PrefixRow] = &[
    (24, "Y", "yotta"),
    (21, "Z", "zetta"),
    (18, "E", "exa"),
    (15, "P", "peta"),
    (12, "T", "tera"),
    (9, "G", "giga"),
    (6, "M", "mega"),
    (3, "k", "kilo"),
    (2, "h", "hecto"),
    (1, "da", "deka"),
    (-1, "d", "deci"),
    (-2, "c", "centi"),
    (-3, "m", "milli"),
    (-6, "u", "micro"),
    (-9, "n", "nano"),
    (-12, "p", "pico"),
    (-15, "f", "femto"),
    (-18, "a", "atto"),
    (-21, "z", "zepto"),
    (-24, "y", "yocto"),
];

#[rustfmt::skip]
pub(super) const DERIVED_UNITS: &[DerivedRow] = &[
    // SI derived units                 L   M   T   K   Q  cd mol rad dec
    (1.0,       [ 0,  0,  0,  0,  0,  0,  0,  2,   0], "sr",  Some("rad2"),           "steradian"),
    (1.0,       [ 0,  0, -1,  0,  0,  0,  0,  0,   0], "Hz",  Some("s-1"),            "hertz"),
    (1.0,       [ 1,  1, -2,  0,  0,  0,  0,  0,   3], "N",   Some("kg*m/s2"),        "newton"),
    (1.0,       [-1,  1, -2,  0,  0,  0,  0,  0,   3], "Pa",  Some("N/m2"),           "pascal"),
    (1.0,       [ 2,  1, -2,  0,  0,  0,  0,  0,   3], "J",   Some("N*m"),            "joule"),
    (1.0,       [ 2,  1, -3,  0,  0,  0,  0,  0,   3], "W",   Some("J/s"),            "watt"),
    (1.0,       [ 0,  0, -1,  0,  1,  0,  0,  0,   0], "A",   Some("C/s"),            "ampere"),
    (1.0,       [ 2,  1, -2,  0, -1,  0,  0,  0,   3], "V",   Some("J/C"),            "volt"),
    (1.0,       [-2, -1,  2,  0,  2,  0,  0,  0,  -3], "F",   Some("C/V"),            "farad"),
    (1.0,       [ 2,  1, -1,  0, -2,  0,  0,  0,   3], "Ohm", Some("V/A"),            "ohm"),
    (1.0,       [-2, -1,  1,  0,  2,  0,  0,  0,  -3], "S",   Some("Ohm-1"),          "siemens"),
    (1.0,       [ 2,  1, -1,  0, -1,  0,  0,  0,   3], "Wb",  Some("V*s"),            "weber"),
    (1.0,       [ 0,  1, -1,  0, -1,  0,  0,  0,   3], "T",   Some("Wb/m2"),          "tesla"),
    (1.0,       [ 2,  1,  0,  0, -2,  0,  0,  0,   3], "H",   Some("Wb/A"),           "henry"),
    (1.0,       [ 0,  0,  0,  0,  0,  1,  0,  2,   0], "lm",  Some("cd*sr"),          "lumen"),
    (1.0,       [-2,  0,  0,  0,  0,  1,  0,  2,   0], "lx",  Some("lm/m2"),          "lux"),
    (1.0,       [ 0,  0, -1,  0,  0,  0,  0,  0,   0], "Bq",  Some("s-1"),            "becquerel"),
    (1.0,       [ 2,  0, -2,  0,  0,  0,  0,  0,   0], "Gy",  Some("J/kg"),           "gray"),
    (1.0,       [ 2,  0, -2,  0,  0,  0,  0,  0,   0], "Sv",  Some("J/kg"),           "sievert"),
    // CGS units
    (1.0,       [ 1,  1, -2,  0,  0,  0,  0,  0,  -2], "dyn", Some("g*cm/s2"),        "dyne"),
    (1.0,       [ 2,  1, -2,  0,  0,  0,  0,  0,  -4], "erg", Some("dyn*cm"),         "erg"),
    (1.0,       [ 0,  1, -1,  0, -1,  0,  0,  0,  -1], "G",   Some("T/10000"),        "gauss"),
    // accepted non-SI units
    (1.6021773, [ 2,  1, -2,  0,  0,  0,  0,  0, -16], "eV",  Some("1.6021773e-19*J"), "electronvolt"),
    (1.7453293, [ 0,  0,  0,  0,  0,  0,  0,  1,  -2], "deg", Some("2*[pi]*rad/360"), "degree"),
    (2.9088821, [ 0,  0,  0,  0,  0,  0,  0,  1,  -4], "'",   Some("deg/60"),         "arcminute"),
    (4.8481368, [ 0,  0,  0,  0,  0,  0,  0,  1,  -6], "''",  Some("deg/3600"),       "arcsecond"),
    (6.0,       [ 0,  0,  1,  0,  0,  0,  0,  0,   1], "min", Some("60*s"),           "minute"),
    (3.6,       [ 0,  0,  1,  0,  0,  0,  0,  0,   3], "h",   Some("3600*s"),         "hour"),
    (8.64,      [ 0,  0,  1,  0,  0,  0,  0,  0,   4], "day", Some("24*h"),           "day"),
    (3.1557,    [ 0,  0,  1,  0,  0,  0,  0,  0,   7], "a",   Some("3.1557e7*s"),     "year"),
    (1.0,       [ 3,  0,  0,  0,  0,  0,  0,  0,  -3], "L",   Some("1e-3*m3"),        "litre"),
    (1.0,       [-1,  1, -2,  0,  0,  0,  0,  0,   8], "bar", Some("1e5*Pa"),         "bar"),
    (1.01325,   [-1,  1, -2,  0,  0,  0,  0,  0,   8], "atm", Some("1.01325e5*Pa"),   "atmosphere"),
    // dimensionless numbers and ratios
    (3.1415927, [ 0,  0,  0,  0,  0,  0,  0,  0,   0], "[pi]",    None,               "pi"),
    (2.7182818, [ 0,  0,  0,  0,  0,  0,  0,  0,   0], "[euler]", None,               "euler number"),
    (6.0221367, [ 0,  0,  0,  0,  0,  0,  0,  0,  23], "[N_A]",   None,               "avogadro number"),
    (1.0,       [ 0,  0,  0,  0,  0,  0,  0,  0,  -2], "%",       Some("1e-2"),       "percent"),
    (1.0,       [ 0,  0,  0,  0,  0,  0,  0,  0,  -3], "[ppth]",  Some("1e-3"),       "promille"),
    (1.0,       [ 0,  0,  0,  0,  0,  0,  0,  0,  -6], "[ppm]",   Some("1e-6"),       "parts per million"),
];

pub(super) static ARBITRARY_UNITS: &[ArbitraryRow] = &[
    ([0, 0, 0, 1, 0, 0, 0, 0, 0], "Cel", "degree celsius", &CELSIUS),
    ([0, 0, 0, 1, 0, 0, 0, 0, 0], "degF", "degree fahrenheit", &FAHRENHEIT),
    ([0, 0, 0, 0, 0, 0, 0, 0, 0], "dB", "decibel", &DECIBEL),
];
