//! Data model: the [`Node`] record, its kind tag and the typed [`Value`] sum.

mod node;
mod value;

pub use node::{DimBound, Node, NodeKind};
pub(crate) use node::cast_value;
pub use value::{Array, Value};
pub(crate) use value::fmt_float;
