//! The node record.
//!
//! A [`Node`] is born at a source line, mutated only during the
//! interpretation pass (value cast, unit conversion, modification, option
//! accumulation) and immutable once the interpreter finishes. Structural
//! kinds (`empty`, `group`, `option`, `condition`, `import`, `unit`) never
//! reach the finalized list.

use crate::base::{DpmlError, Location, Result};
use crate::model::value::{Array, Value};
use crate::units::{UnitRegistry, convert_value, parse_expression};

/// Per-axis size bounds: `(min, max)`, either end unbounded when `None`.
pub type DimBound = (Option<usize>, Option<usize>);

/// Discriminates the node variants produced by the line classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Bool,
    Int,
    Float,
    Str,
    Table,
    Empty,
    Group,
    Option,
    Mod,
    Condition,
    Import,
    Unit,
}

impl NodeKind {
    /// Map a source-level type keyword to its kind.
    pub fn from_keyword(kw: &str) -> Option<NodeKind> {
        match kw {
            "bool" => Some(NodeKind::Bool),
            "int" => Some(NodeKind::Int),
            "float" => Some(NodeKind::Float),
            "str" => Some(NodeKind::Str),
            "table" => Some(NodeKind::Table),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Bool => "bool",
            NodeKind::Int => "int",
            NodeKind::Float => "float",
            NodeKind::Str => "str",
            NodeKind::Table => "table",
            NodeKind::Empty => "empty",
            NodeKind::Group => "group",
            NodeKind::Option => "option",
            NodeKind::Mod => "mod",
            NodeKind::Condition => "condition",
            NodeKind::Import => "import",
            NodeKind::Unit => "unit",
        }
    }

    /// Kinds that carry a value into the finalized list.
    pub fn is_value_kind(&self) -> bool {
        matches!(
            self,
            NodeKind::Bool
                | NodeKind::Int
                | NodeKind::Float
                | NodeKind::Str
                | NodeKind::Table
                | NodeKind::Mod
        )
    }

    /// Only enumerable scalar kinds accept option lists.
    pub fn supports_options(&self) -> bool {
        matches!(self, NodeKind::Int | NodeKind::Float | NodeKind::Str)
    }
}

/// A single declaration, modification or structural marker.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Dotted path; filled in by the interpreter's hierarchy pass.
    pub name: Option<String>,
    /// Columns of leading whitespace in the source line.
    pub indent: usize,
    pub value_raw: Option<String>,
    pub value: Value,
    /// Unit expression; canonical for the node after conversions.
    pub units: Option<String>,
    pub defined: bool,
    pub dimension: Option<Vec<DimBound>>,
    /// Allowed values; a leading `Null` marks the implicit option of a
    /// non-`defined` node.
    pub options: Vec<Value>,
    /// The raw value names an import path rather than a literal.
    pub is_import: bool,
    pub source: String,
    pub line: usize,
}

impl Node {
    pub fn new(kind: NodeKind, source: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            name: None,
            indent: 0,
            value_raw: None,
            value: Value::Null,
            units: None,
            defined: false,
            dimension: None,
            options: Vec::new(),
            is_import: false,
            source: source.into(),
            line,
        }
    }

    /// A synthetic boolean node, used by the expression evaluator for
    /// literals and defined-checks.
    pub fn bool_literal(value: bool, source: impl Into<String>, line: usize) -> Self {
        let mut node = Node::new(NodeKind::Bool, source, line);
        node.value_raw = Some(if value { "true" } else { "false" }.to_string());
        node.value = Value::Bool(value);
        node
    }

    pub fn loc(&self) -> Location {
        Location::new(self.source.clone(), self.line)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Last segment of the dotted path.
    pub fn short_name(&self) -> &str {
        let name = self.display_name();
        name.rsplit('.').next().unwrap_or(name)
    }

    /// Cast the raw text into the declared type, then run the defined,
    /// dimension and option checks. Nodes without raw text (table columns)
    /// keep their pre-built value and only run the checks.
    pub fn set_value(&mut self, units: &UnitRegistry) -> Result<()> {
        if let Some(raw) = self.value_raw.clone() {
            self.value = cast_value(
                self.kind,
                self.dimension.as_deref(),
                &raw,
                self.loc(),
                self.display_name(),
            )?;
        }
        if let Some(expr) = &self.units {
            parse_expression(units, expr)?;
        }
        self.check_defined()?;
        self.check_dimension()?;
        self.check_options()
    }

    /// Apply a later assignment to this node: type check, cast into this
    /// node's type, convert into its declared units, revalidate options.
    pub fn modify_from(&mut self, other: &Node, units: &UnitRegistry) -> Result<()> {
        if other.kind != NodeKind::Mod && other.kind != self.kind {
            return Err(DpmlError::TypeChangeRejected {
                loc: other.loc(),
                name: self.display_name().to_string(),
                from: self.kind.type_name(),
                to: other.kind.type_name(),
            });
        }
        let mut value = match &other.value_raw {
            Some(raw) => cast_value(
                self.kind,
                self.dimension.as_deref(),
                raw,
                other.loc(),
                self.display_name(),
            )?,
            None => other.value.clone(),
        };
        match (&other.units, &self.units) {
            (Some(from), Some(to)) if from != to => {
                value = convert_value(units, &value, from, to)?;
            }
            (Some(_), None) => self.units = other.units.clone(),
            _ => {}
        }
        self.value = value;
        self.check_defined()?;
        self.check_dimension()?;
        self.check_options()
    }

    /// Attach an option line to this node, casting and unit-converting the
    /// option value into the host's type and units.
    pub fn add_option(&mut self, option: &Node, units: &UnitRegistry) -> Result<()> {
        if !self.kind.supports_options() {
            return Err(DpmlError::OptionUnsupported {
                loc: option.loc(),
                kind: self.kind.type_name(),
            });
        }
        let raw = option.value_raw.as_deref().unwrap_or("");
        let mut value = cast_value(self.kind, None, raw, option.loc(), self.display_name())?;
        if let (Some(from), Some(to)) = (&option.units, &self.units) {
            if from != to {
                value = convert_value(units, &value, from, to)?;
            }
        }
        if self.options.is_empty() && !self.defined {
            self.options.push(Value::Null);
        }
        self.options.push(value);
        Ok(())
    }

    fn check_defined(&self) -> Result<()> {
        if self.defined && self.value.is_null() {
            return Err(DpmlError::UndefinedRequired {
                loc: self.loc(),
                name: self.display_name().to_string(),
            });
        }
        Ok(())
    }

    fn check_dimension(&self) -> Result<()> {
        let Some(dims) = &self.dimension else {
            return Ok(());
        };
        if self.value.is_null() {
            return Ok(());
        }
        let empty: &[usize] = &[];
        let shape: &[usize] = match &self.value {
            Value::Array(a) => &a.shape,
            _ => empty,
        };
        for (axis, (min, max)) in dims.iter().enumerate() {
            let size = shape.get(axis).copied().unwrap_or(0);
            if let Some(min) = min {
                if size < *min {
                    return Err(self.dimension_error(axis, size, format!("< {min}")));
                }
            }
            if let Some(max) = max {
                if size > *max {
                    return Err(self.dimension_error(axis, size, format!("> {max}")));
                }
            }
        }
        Ok(())
    }

    fn dimension_error(&self, axis: usize, size: usize, bound: String) -> DpmlError {
        DpmlError::DimensionOutOfRange {
            loc: self.loc(),
            name: self.display_name().to_string(),
            axis,
            size,
            bound,
        }
    }

    fn check_options(&self) -> Result<()> {
        if self.options.is_empty() {
            return Ok(());
        }
        if self.options.iter().any(|o| o.approx_eq(&self.value)) {
            return Ok(());
        }
        let allowed: Vec<String> = self.options.iter().map(|o| o.to_string()).collect();
        Err(DpmlError::OptionViolation {
            loc: self.loc(),
            name: self.display_name().to_string(),
            value: self.value.to_string(),
            options: allowed.join(", "),
        })
    }
}

/// Cast raw text into a typed value. Declared dimensions switch the raw
/// format to a bracketed nested array literal.
pub(crate) fn cast_value(
    kind: NodeKind,
    dimension: Option<&[DimBound]>,
    raw: &str,
    loc: Location,
    name: &str,
) -> Result<Value> {
    if matches!(raw, "none" | "None" | "") {
        return Ok(Value::Null);
    }
    match kind {
        NodeKind::Mod => Ok(Value::Str(raw.to_string())),
        NodeKind::Bool | NodeKind::Int | NodeKind::Float | NodeKind::Str => {
            if dimension.is_some() {
                cast_array(kind, raw, &loc, name)
            } else {
                cast_scalar(kind, raw, &loc, name)
            }
        }
        _ => Err(invalid_cast(kind, raw, loc, name)),
    }
}

fn cast_scalar(kind: NodeKind, raw: &str, loc: &Location, name: &str) -> Result<Value> {
    let trimmed = raw.trim();
    match kind {
        NodeKind::Bool => match trimmed {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(invalid_cast(kind, raw, loc.clone(), name)),
        },
        NodeKind::Int => trimmed
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| invalid_cast(kind, raw, loc.clone(), name)),
        NodeKind::Float => trimmed
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| invalid_cast(kind, raw, loc.clone(), name)),
        NodeKind::Str => Ok(Value::Str(raw.to_string())),
        _ => Err(invalid_cast(kind, raw, loc.clone(), name)),
    }
}

fn cast_array(kind: NodeKind, raw: &str, loc: &Location, name: &str) -> Result<Value> {
    let json: serde_json::Value = serde_json::from_str(raw.trim())
        .map_err(|_| invalid_cast(kind, raw, loc.clone(), name))?;
    if !json.is_array() {
        return Err(invalid_cast(kind, raw, loc.clone(), name));
    }
    let mut array = Array::default();
    walk_json(kind, &json, 0, &mut array, loc, name, raw)?;
    Ok(Value::Array(array))
}

/// Depth-first walk collecting shape and flattened elements; ragged nesting
/// is rejected.
fn walk_json(
    kind: NodeKind,
    json: &serde_json::Value,
    depth: usize,
    array: &mut Array,
    loc: &Location,
    name: &str,
    raw: &str,
) -> Result<()> {
    match json {
        serde_json::Value::Array(items) => {
            if array.shape.len() == depth {
                array.shape.push(items.len());
            } else if array.shape[depth] != items.len() {
                return Err(invalid_cast(kind, raw, loc.clone(), name));
            }
            for item in items {
                walk_json(kind, item, depth + 1, array, loc, name, raw)?;
            }
            Ok(())
        }
        scalar => {
            if depth != array.shape.len() {
                return Err(invalid_cast(kind, raw, loc.clone(), name));
            }
            array.elems.push(cast_json_scalar(kind, scalar).ok_or_else(|| {
                invalid_cast(kind, raw, loc.clone(), name)
            })?);
            Ok(())
        }
    }
}

fn cast_json_scalar(kind: NodeKind, json: &serde_json::Value) -> Option<Value> {
    match kind {
        NodeKind::Bool => json.as_bool().map(Value::Bool),
        NodeKind::Int => json.as_i64().map(Value::Int),
        NodeKind::Float => json.as_f64().map(Value::Float),
        NodeKind::Str => json.as_str().map(|s| Value::Str(s.to_string())),
        _ => None,
    }
}

fn invalid_cast(kind: NodeKind, raw: &str, loc: Location, name: &str) -> DpmlError {
    DpmlError::InvalidCast {
        loc,
        name: name.to_string(),
        raw: raw.to_string(),
        kind: kind.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::new("test", 1)
    }

    #[test]
    fn test_cast_scalars() {
        assert_eq!(
            cast_value(NodeKind::Bool, None, "true", loc(), "n").unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            cast_value(NodeKind::Int, None, "20", loc(), "n").unwrap(),
            Value::Int(20)
        );
        assert_eq!(
            cast_value(NodeKind::Float, None, "63.3", loc(), "n").unwrap(),
            Value::Float(63.3)
        );
        assert_eq!(
            cast_value(NodeKind::Str, None, "Laura", loc(), "n").unwrap(),
            Value::Str("Laura".into())
        );
    }

    #[test]
    fn test_cast_null_sentinels() {
        for raw in ["none", "None", ""] {
            assert!(cast_value(NodeKind::Int, None, raw, loc(), "n")
                .unwrap()
                .is_null());
        }
    }

    #[test]
    fn test_cast_rejects_mismatched_scalar() {
        assert!(cast_value(NodeKind::Int, None, "3.5", loc(), "n").is_err());
        assert!(cast_value(NodeKind::Bool, None, "yes", loc(), "n").is_err());
    }

    #[test]
    fn test_cast_nested_array() {
        let dims: &[DimBound] = &[(Some(2), Some(2)), (Some(2), Some(2))];
        let value =
            cast_value(NodeKind::Float, Some(dims), "[[4234,34],[234,34]]", loc(), "n").unwrap();
        let Value::Array(a) = value else {
            panic!("expected array")
        };
        assert_eq!(a.shape, vec![2, 2]);
        assert_eq!(a.elems[0], Value::Float(4234.0));
    }

    #[test]
    fn test_cast_ragged_array_rejected() {
        let dims: &[DimBound] = &[(None, None), (None, None)];
        assert!(cast_value(NodeKind::Int, Some(dims), "[[1,2],[3]]", loc(), "n").is_err());
    }
}
