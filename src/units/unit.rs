//! The unit record: magnitude and base-dimension exponent vector.

use std::fmt;

use smol_str::SmolStr;

use crate::base::approx_eq;
use crate::units::arbitrary::ArbitraryScale;

/// Base dimension slots, in order: length, mass, time, temperature, charge,
/// luminous intensity, amount, angle, decimal order of magnitude.
pub const NUM_SLOTS: usize = 9;
/// Slots that carry physical dimension (everything but the decimal slot).
pub const NUM_PHYSICAL: usize = 8;
/// Index of the decimal order-of-magnitude slot.
pub const DECIMAL_SLOT: usize = 8;

/// Integer exponents per base dimension plus the decimal slot.
pub type BaseVector = [i32; NUM_SLOTS];

/// A unit value: `magnitude × 10^base[DECIMAL_SLOT] × Π dimᵢ^base[i]`.
#[derive(Clone)]
pub struct Unit {
    pub magnitude: f64,
    pub base: BaseVector,
    /// Symbol as written in source (`kJ`, `[lambda]`, ...).
    pub symbol: Option<SmolStr>,
    /// Definition expression for derived and custom units.
    pub definition: Option<SmolStr>,
    pub name: Option<SmolStr>,
    /// Non-linear conversion hook; only set on arbitrary units and preserved
    /// through prefix/exponent application, never through `*` or `/`.
    pub arbitrary: Option<&'static (dyn ArbitraryScale + Sync)>,
}

impl Unit {
    pub fn new(magnitude: f64, base: BaseVector) -> Self {
        Self {
            magnitude,
            base,
            symbol: None,
            definition: None,
            name: None,
            arbitrary: None,
        }
    }

    pub fn dimensionless(magnitude: f64) -> Self {
        Self::new(magnitude, [0; NUM_SLOTS])
    }

    /// Full linear scale of the unit relative to its base dimensions:
    /// magnitude with the decimal slot folded back in.
    pub fn scale(&self) -> f64 {
        self.magnitude * 10f64.powi(self.base[DECIMAL_SLOT])
    }

    /// The physical-dimension sub-vector (decimal slot excluded).
    pub fn physical(&self) -> &[i32] {
        &self.base[..NUM_PHYSICAL]
    }

    pub fn is_physically_dimensionless(&self) -> bool {
        self.physical().iter().all(|&e| e == 0)
    }

    /// Equality up to the relative float tolerance on the magnitude.
    pub fn approx_eq(&self, other: &Unit) -> bool {
        approx_eq(self.magnitude, other.magnitude) && self.base == other.base
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("magnitude", &self.magnitude)
            .field("base", &self.base)
            .field("symbol", &self.symbol)
            .field("arbitrary", &self.arbitrary.map(|a| a.label()))
            .finish()
    }
}
