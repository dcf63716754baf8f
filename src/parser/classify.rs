//! Deterministic dispatch of a scanned line into a node variant.
//!
//! Recognition order matters and mirrors the grammar table: empty line,
//! import, custom unit, comment-only, option, condition, then named forms
//! (group, mod, typed value). A line that matches no form is malformed.

use crate::base::Result;
use crate::model::{Node, NodeKind};
use crate::parser::blocks::RawLine;
use crate::parser::escape::{decode, encode};
use crate::parser::line::LineScanner;

/// Classify one folded logical line into a node.
pub fn classify_line(raw: &RawLine, source: &str) -> Result<Node> {
    let encoded = encode(&raw.text);
    let mut s = LineScanner::new(&encoded, raw.line, source);

    if s.is_empty() {
        return Ok(build(NodeKind::Empty, &s));
    }
    s.read_indent();

    if is_import_line(s.rest()) {
        let name_len = s.rest().find(|c: char| !is_name_char(c)).unwrap_or(0);
        if name_len > 0 {
            s.read_name(true)?;
            s.skip_whitespace();
        }
        s.read_import();
        s.read_comment();
        require_empty(&s)?;
        let mut node = build(NodeKind::Import, &s);
        let path = node.value_raw.clone().unwrap_or_default();
        node.name = Some(match &s.name {
            Some(name) => format!("{name}.{{{path}}}"),
            None => format!("{{{path}}}"),
        });
        return Ok(node);
    }

    if s.read_unit_def()? {
        s.read_comment();
        require_empty(&s)?;
        return Ok(build(NodeKind::Unit, &s));
    }

    s.read_comment();
    if s.comment.is_some() && s.is_empty() {
        return Ok(build(NodeKind::Empty, &s));
    }

    if s.rest().starts_with('=') {
        s.read_value(true)?;
        s.read_units();
        s.read_comment();
        require_empty(&s)?;
        return Ok(build(NodeKind::Option, &s));
    }

    if s.read_condition()? {
        s.read_comment();
        require_empty(&s)?;
        return Ok(build(NodeKind::Condition, &s));
    }

    s.read_name(true)?;
    s.read_comment();
    if s.is_empty() {
        return Ok(build(NodeKind::Group, &s));
    }

    if s.rest().trim_start().starts_with('=') {
        s.read_value(true)?;
        s.read_units();
        s.read_comment();
        require_empty(&s)?;
        return Ok(build(NodeKind::Mod, &s));
    }

    s.read_type()?;
    s.read_defined();
    s.read_dimension()?;
    s.read_value(true)?;
    s.read_units();
    s.read_comment();
    require_empty(&s)?;
    let kind = s.type_kind.ok_or_else(|| s.malformed())?;
    Ok(build(kind, &s))
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}

/// `NAME {path}` or `{path}` with a closing brace further on.
fn is_import_line(rest: &str) -> bool {
    let name_len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
    let after = rest[name_len..].trim_start();
    after.starts_with('{') && after.contains('}')
}

fn require_empty(s: &LineScanner<'_>) -> Result<()> {
    if s.is_empty() {
        Ok(())
    } else {
        Err(s.malformed())
    }
}

fn build(kind: NodeKind, s: &LineScanner<'_>) -> Node {
    let mut node = Node::new(kind, s.source, s.line);
    node.indent = s.indent;
    node.name = s.name.clone();
    node.value_raw = s.value.as_deref().map(decode);
    node.units = s.units.clone();
    node.defined = s.defined;
    node.dimension = s.dimension.clone();
    node.is_import = s.is_import;
    node
}
