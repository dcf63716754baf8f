//! Typed values carried by nodes.
//!
//! `Value` is a tagged sum over the DPML scalar types plus n-dimensional
//! arrays of them. Arrays are stored flattened together with their shape so
//! dimension bounds can be checked without walking nested vectors.

use std::fmt;

use crate::base::approx_eq;

/// A typed node value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value (`none`, `None` or empty raw text).
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Array(Array),
}

/// An n-dimensional rectangular array of scalar values, flattened in
/// row-major order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Array {
    pub elems: Vec<Value>,
    pub shape: Vec<usize>,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human-readable name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Array(_) => "array",
        }
    }

    /// Equality with relative float tolerance, applied element-wise to
    /// arrays. Used for option matching and `==` comparisons.
    pub fn approx_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => approx_eq(*a, *b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.shape == b.shape
                    && a.elems.len() == b.elems.len()
                    && a.elems.iter().zip(&b.elems).all(|(x, y)| x.approx_eq(y))
            }
            _ => false,
        }
    }

    /// Apply a scalar transformation to every float in the value. Integer
    /// values are converted through `f64` and rounded back; this is how unit
    /// conversion factors are applied to numeric nodes.
    pub fn map_numeric(&self, f: impl Fn(f64) -> f64 + Copy) -> Value {
        match self {
            Value::Float(x) => Value::Float(f(*x)),
            Value::Int(x) => Value::Int(f(*x as f64).round() as i64),
            Value::Array(a) => Value::Array(Array {
                elems: a.elems.iter().map(|v| v.map_numeric(f)).collect(),
                shape: a.shape.clone(),
            }),
            other => other.clone(),
        }
    }
}

/// Format a float the way the DPML text syntax writes them back: shortest
/// round-trip representation, always with a decimal part.
pub(crate) fn fmt_float(x: f64) -> String {
    let mut s = format!("{x}");
    if !s.contains('.') && !s.contains('e') && !s.contains("inf") && !s.contains("NaN") {
        s.push_str(".0");
    }
    s
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "none"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{}", fmt_float(*x)),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(a) => write!(f, "{a}"),
        }
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(0, &mut self.elems.iter()))
    }
}

impl Array {
    fn render<'a>(&self, axis: usize, elems: &mut impl Iterator<Item = &'a Value>) -> String {
        if axis == self.shape.len() {
            return elems
                .next()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "none".into());
        }
        let parts: Vec<String> = (0..self.shape[axis])
            .map(|_| self.render(axis + 1, elems))
            .collect();
        format!("[{}]", parts.join(", "))
    }
}
