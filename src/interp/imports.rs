//! Import targets and node queries.
//!
//! An import target has the form `[filename][?query]`. With a filename, a
//! fresh interpreter parses that file (inheriting the reader and a clone of
//! the unit table) and the query runs against its output; without one, the
//! query runs against the current node list. File imports are depth-bounded
//! so cyclic includes fail instead of recursing forever.

use std::sync::Arc;

use crate::base::{DpmlError, Result, SourceReader};
use crate::interp::interpreter::Dpml;
use crate::model::Node;
use crate::units::UnitRegistry;

/// Maximum file-import recursion depth.
pub const MAX_IMPORT_DEPTH: usize = 64;

/// Select nodes by query: `*` (all), `prefix.*` (descendants, prefix
/// stripped) or an exact dotted path (parent prefix stripped).
pub fn query_nodes(nodes: &[Node], query: &str) -> Vec<Node> {
    if query == "*" {
        return nodes.to_vec();
    }
    let mut out = Vec::new();
    if query.ends_with(".*") {
        let stem = &query[..query.len() - 1]; // keeps the trailing dot
        for node in nodes {
            if node.display_name().starts_with(stem) {
                let mut node = node.clone();
                node.name = Some(node.display_name()[stem.len()..].to_string());
                out.push(node);
            }
        }
    } else {
        for node in nodes {
            if node.display_name() == query {
                let mut selected = node.clone();
                selected.name = Some(node.short_name().to_string());
                out.push(selected);
            }
        }
    }
    out
}

/// Resolve an import-or-local target with an optional cardinality check.
pub fn request(
    path: &str,
    count: Option<&[usize]>,
    local: &[Node],
    units: &UnitRegistry,
    reader: &Arc<dyn SourceReader>,
    depth: usize,
) -> Result<Vec<Node>> {
    let (filename, query) = match path.split_once('?') {
        Some((filename, query)) => (filename, query),
        None => (path, "*"),
    };
    let nodes = if filename.is_empty() {
        if local.is_empty() {
            return Err(DpmlError::NoLocalNodes {
                path: path.to_string(),
            });
        }
        query_nodes(local, query)
    } else {
        if depth + 1 > MAX_IMPORT_DEPTH {
            return Err(DpmlError::ImportDepthExceeded {
                path: path.to_string(),
                limit: MAX_IMPORT_DEPTH,
            });
        }
        tracing::debug!(filename, query, depth, "resolving file import");
        let mut child = Dpml::child(Arc::clone(reader), units.clone(), depth + 1);
        child.load(filename)?;
        child.initialize()?;
        child.query(query)
    };
    if let Some(expected) = count {
        if !expected.contains(&nodes.len()) {
            return Err(DpmlError::ImportCardinality {
                path: path.to_string(),
                expected: expected.to_vec(),
                found: nodes.len(),
            });
        }
    }
    Ok(nodes)
}
