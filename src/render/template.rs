//! Template substitution.
//!
//! Scans the template for `{` and tries to read a `{{path}[:format]}`
//! token: the inner braces are an import reference resolved to exactly one
//! node, the optional spec formats its value. A `{` that does not open a
//! valid token is emitted as-is.

use std::sync::Arc;

use crate::base::{Result, SourceReader};
use crate::interp::request;
use crate::model::Node;
use crate::parser::LineScanner;
use crate::render::format::format_with_spec;
use crate::units::UnitRegistry;

pub fn render_template(
    template: &str,
    nodes: &[Node],
    units: &UnitRegistry,
    reader: &Arc<dyn SourceReader>,
    depth: usize,
) -> Result<String> {
    let mut out = String::new();
    let mut rest = template;
    while let Some(brace) = rest.find('{') {
        out.push_str(&rest[..brace]);
        let candidate = &rest[brace + 1..];
        let mut scanner = LineScanner::new(candidate, 0, "template");
        scanner.read_import();
        scanner.read_format();
        if scanner.is_import && scanner.rest().starts_with('}') {
            let path = scanner.value.clone().unwrap_or_default();
            let mut resolved = request(&path, Some(&[1]), nodes, units, reader, depth)?;
            let node = resolved.remove(0);
            match &scanner.format {
                Some(spec) => out.push_str(&format_with_spec(&node.value, spec)?),
                None => out.push_str(&node.value.to_string()),
            }
            rest = &candidate[scanner.consumed() + 1..];
        } else {
            out.push('{');
            rest = candidate;
        }
    }
    out.push_str(rest);
    Ok(out)
}
