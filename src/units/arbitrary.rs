//! Arbitrary (non-linear) units.
//!
//! An arbitrary unit converts to the base unit of its physical dimension
//! through a function rather than a multiplicative factor: temperature
//! scales carry an affine offset, decibels a logarithm. The `scale`
//! parameter is the linear factor accumulated from prefixes and exponents
//! (`kCel` passes 1000).

/// Conversion hook between an arbitrary unit and the base unit of its
/// dimension.
pub trait ArbitraryScale {
    /// Short label for diagnostics.
    fn label(&self) -> &'static str;
    /// Value in this unit (times `scale`) → value in the base unit.
    fn to_base(&self, value: f64, scale: f64) -> f64;
    /// Value in the base unit → value in this unit (divided by `scale`).
    fn from_base(&self, value: f64, scale: f64) -> f64;
}

/// Degrees Celsius against kelvin.
pub struct Celsius;

impl ArbitraryScale for Celsius {
    fn label(&self) -> &'static str {
        "Cel"
    }

    fn to_base(&self, value: f64, scale: f64) -> f64 {
        value * scale + 273.15
    }

    fn from_base(&self, value: f64, scale: f64) -> f64 {
        (value - 273.15) / scale
    }
}

/// Degrees Fahrenheit against kelvin.
pub struct Fahrenheit;

impl ArbitraryScale for Fahrenheit {
    fn label(&self) -> &'static str {
        "degF"
    }

    fn to_base(&self, value: f64, scale: f64) -> f64 {
        (value * scale + 459.67) * 5.0 / 9.0
    }

    fn from_base(&self, value: f64, scale: f64) -> f64 {
        (value * 9.0 / 5.0 - 459.67) / scale
    }
}

/// Decibels against a plain power ratio.
pub struct Decibel;

impl ArbitraryScale for Decibel {
    fn label(&self) -> &'static str {
        "dB"
    }

    fn to_base(&self, value: f64, scale: f64) -> f64 {
        10f64.powf(value * scale / 10.0)
    }

    fn from_base(&self, value: f64, scale: f64) -> f64 {
        10.0 * value.log10() / scale
    }
}

pub(super) static CELSIUS: Celsius = Celsius;
pub(super) static FAHRENHEIT: Fahrenheit = Fahrenheit;
pub(super) static DECIBEL: Decibel = Decibel;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::approx_eq;

    #[test]
    fn test_celsius_round_trip() {
        assert!(approx_eq(CELSIUS.to_base(1.0, 1.0), 274.15));
        assert!(approx_eq(CELSIUS.from_base(274.15, 1.0), 1.0));
        assert!(approx_eq(CELSIUS.to_base(1.0, 1e3), 1273.15));
    }

    #[test]
    fn test_fahrenheit_freezing_point() {
        assert!(approx_eq(FAHRENHEIT.to_base(32.0, 1.0), 273.15));
        assert!(approx_eq(FAHRENHEIT.from_base(273.15, 1.0), 32.0));
    }

    #[test]
    fn test_decibel_ratio() {
        assert!(approx_eq(DECIBEL.to_base(30.0, 1.0), 1000.0));
        assert!(approx_eq(DECIBEL.from_base(1000.0, 1.0), 30.0));
    }
}
