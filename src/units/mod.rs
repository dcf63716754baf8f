//! Dimensional-units engine.
//!
//! A unit is a scalar magnitude plus a fixed-length vector of integer
//! exponents, one slot per base physical dimension and a final slot for the
//! decimal order of magnitude. Keeping powers of ten in their own slot makes
//! prefix arithmetic exact; after every operation the magnitude is rebased
//! into `[1, 10)`.
//!
//! Division in unit expressions is scientific-convention: `kg/m/s2` means
//! `kg/(m*s2)` — everything after the first `/` divides, and further `/`
//! re-associate so the last one stays outermost.

mod algebra;
mod arbitrary;
mod registry;
mod tables;
mod unit;

pub use algebra::{
    convert, convert_value, define_custom, divide, multiply, parse_expression, parse_token, power,
};
pub use arbitrary::ArbitraryScale;
pub use registry::UnitRegistry;
pub use unit::{BaseVector, DECIMAL_SLOT, NUM_PHYSICAL, NUM_SLOTS, Unit};
