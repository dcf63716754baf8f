//! Table expansion.
//!
//! A `table` node's value is a header (one `name type [units]` line per
//! column), a blank line, then whitespace-separated rows. Each column
//! becomes a single array node of the declared type with a fixed dimension
//! equal to the row count.

use crate::base::{DpmlError, Location, Result};
use crate::model::{Array, Node, NodeKind, Value, cast_value};
use crate::parser::LineScanner;

struct Column {
    name: String,
    kind: NodeKind,
    units: Option<String>,
    cells: Vec<Value>,
}

/// Expand a table node into one array node per column.
pub fn expand_table(table: &Node) -> Result<Vec<Node>> {
    let text = table.value_raw.as_deref().unwrap_or_default();
    let mut lines = text.lines();

    let mut columns: Vec<Column> = Vec::new();
    for line in lines.by_ref() {
        if line.trim().is_empty() {
            break;
        }
        let mut scanner = LineScanner::new(line, table.line, &table.source);
        scanner.read_name(true)?;
        scanner.read_type()?;
        scanner.read_units();
        let Some(kind) = scanner.type_kind else {
            return Err(malformed_row(table, line));
        };
        if !scanner.is_empty() || kind == NodeKind::Table {
            return Err(malformed_row(table, line));
        }
        columns.push(Column {
            name: scanner.name.clone().unwrap_or_default(),
            kind,
            units: scanner.units.clone(),
            cells: Vec::new(),
        });
    }

    for line in lines {
        let row = line.trim();
        if row.is_empty() {
            continue;
        }
        let cells: Vec<&str> = row.split_whitespace().collect();
        if cells.len() != columns.len() {
            return Err(malformed_row(table, row));
        }
        for (column, cell) in columns.iter_mut().zip(cells) {
            let value = cast_value(
                column.kind,
                None,
                cell,
                Location::new(table.source.clone(), table.line),
                &column.name,
            )?;
            column.cells.push(value);
        }
    }

    let rows = columns.first().map_or(0, |c| c.cells.len());
    tracing::debug!(
        table = table.display_name(),
        columns = columns.len(),
        rows,
        "expanding table"
    );
    Ok(columns
        .into_iter()
        .map(|column| {
            let mut node = Node::new(column.kind, table.source.clone(), table.line);
            node.name = Some(format!("{}.{}", table.display_name(), column.name));
            node.indent = table.indent;
            node.units = column.units;
            node.dimension = Some(vec![(Some(rows), Some(rows))]);
            node.value = Value::Array(Array {
                elems: column.cells,
                shape: vec![rows],
            });
            node
        })
        .collect())
}

fn malformed_row(table: &Node, line: &str) -> DpmlError {
    DpmlError::MalformedLine {
        loc: Location::new(table.source.clone(), table.line),
        code: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_expands_into_columns() {
        let mut table = Node::new(NodeKind::Table, "test", 1);
        table.name = Some("outputs".to_string());
        table.value_raw = Some(
            "time float s\nsnapshot int\nintensity float W/m2\n\n\
             0.234 0 2.34\n1.355 1 9.4\n2.535 2 3.4\n3.255 3 2.3\n4.455 4 23.4"
                .to_string(),
        );
        let nodes = expand_table(&table).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].display_name(), "outputs.time");
        assert_eq!(nodes[1].kind, NodeKind::Int);
        assert_eq!(nodes[2].units.as_deref(), Some("W/m2"));
        let Value::Array(a) = &nodes[0].value else {
            panic!("expected array");
        };
        assert_eq!(a.shape, vec![5]);
        assert_eq!(a.elems[0], Value::Float(0.234));
        assert_eq!(nodes[0].dimension, Some(vec![(Some(5), Some(5))]));
    }

    #[test]
    fn test_table_rejects_short_rows() {
        let mut table = Node::new(NodeKind::Table, "test", 1);
        table.name = Some("t".to_string());
        table.value_raw = Some("x int\ny int\n\n1 2\n3".to_string());
        assert!(expand_table(&table).is_err());
    }
}
