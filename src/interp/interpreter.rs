//! The DPML interpreter.
//!
//! `initialize` runs the full pipeline: fold blocks, classify every line,
//! then consume the node queue while maintaining an indent/parent stack for
//! hierarchical names and a case stack for conditional blocks. Imports and
//! tables expand in place by pushing replacement nodes to the front of the
//! queue; later assignments to an existing name apply modification
//! semantics instead of appending.

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::base::{DpmlError, FsReader, Result, SourceReader, SourceWriter};
use crate::interp::expr::Evaluator;
use crate::interp::imports::{query_nodes, request};
use crate::interp::table::expand_table;
use crate::model::{Node, NodeKind, Value};
use crate::parser::{RawLine, classify_line, fold_blocks};
use crate::render::render_template;
use crate::units::{UnitRegistry, define_custom};

/// One parse: pending source buffer, finalized node list and the
/// instance-owned unit table. Not safe for concurrent use; independent
/// instances are isolated.
pub struct Dpml {
    lines: Vec<String>,
    source: String,
    nodes: Vec<Node>,
    units: UnitRegistry,
    reader: Arc<dyn SourceReader>,
    writer: Arc<dyn SourceWriter>,
    depth: usize,
}

impl Dpml {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            source: "inline".to_string(),
            nodes: Vec::new(),
            units: UnitRegistry::new(),
            reader: Arc::new(FsReader),
            writer: Arc::new(FsReader),
            depth: 0,
        }
    }

    pub fn from_text(code: &str) -> Self {
        let mut dpml = Self::new();
        dpml.lines = code.split('\n').map(str::to_string).collect();
        dpml
    }

    pub fn with_reader(mut self, reader: Arc<dyn SourceReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_writer(mut self, writer: Arc<dyn SourceWriter>) -> Self {
        self.writer = writer;
        self
    }

    /// Child interpreter for a file import: shares the reader, clones the
    /// unit table, one level deeper.
    pub(crate) fn child(reader: Arc<dyn SourceReader>, units: UnitRegistry, depth: usize) -> Self {
        let mut dpml = Self::new();
        dpml.reader = reader;
        dpml.units = units;
        dpml.depth = depth;
        dpml
    }

    /// Append file contents to the pending source buffer.
    pub fn load(&mut self, path: &str) -> Result<()> {
        self.source = path.to_string();
        let content = self.reader.read(path)?;
        self.lines.extend(content.split('\n').map(str::to_string));
        Ok(())
    }

    /// Seed nodes and units from another instance, for local queries.
    pub fn use_nodes(&mut self, nodes: Vec<Node>, units: UnitRegistry) {
        self.nodes = nodes;
        self.units = units;
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    /// Run the pipeline to completion.
    pub fn initialize(&mut self) -> Result<()> {
        let raw: Vec<RawLine> = std::mem::take(&mut self.lines)
            .into_iter()
            .enumerate()
            .map(|(index, text)| RawLine {
                text,
                line: index + 1,
            })
            .collect();
        tracing::debug!(source = %self.source, lines = raw.len(), "initializing");
        let folded = fold_blocks(raw, &self.source)?;
        let mut queue: VecDeque<Node> = VecDeque::with_capacity(folded.len());
        for line in &folded {
            queue.push_back(classify_line(line, &self.source)?);
        }

        let mut results: Vec<Node> = Vec::new();
        let mut indents: Vec<i64> = vec![-1];
        let mut parents: Vec<String> = Vec::new();
        let mut case_names: Vec<String> = vec![String::new()];
        let mut case_counts: Vec<u32> = vec![0];

        while let Some(mut node) = queue.pop_front() {
            // Step 1: per-kind expansion before naming.
            match node.kind {
                NodeKind::Import => {
                    let expanded = self.expand_import(&node, &results)?;
                    for replacement in expanded.into_iter().rev() {
                        queue.push_front(replacement);
                    }
                    continue;
                }
                NodeKind::Table => {
                    if node.is_import {
                        self.fill_import(&mut node, &results)?;
                    }
                    let expanded = expand_table(&node)?;
                    for replacement in expanded.into_iter().rev() {
                        queue.push_front(replacement);
                    }
                    continue;
                }
                NodeKind::Bool | NodeKind::Int | NodeKind::Float | NodeKind::Str
                | NodeKind::Mod
                    if node.is_import =>
                {
                    self.fill_import(&mut node, &results)?;
                }
                NodeKind::Condition
                    if node.display_name().ends_with("@case") =>
                {
                    let expr = node.value_raw.clone().unwrap_or_default();
                    let evaluator = Evaluator {
                        nodes: &results,
                        units: &self.units,
                        reader: &self.reader,
                        depth: self.depth,
                    };
                    node.value = Value::Bool(evaluator.eval(&expr)?);
                }
                NodeKind::Unit => {
                    let name = node.display_name().trim_end_matches("@unit").to_string();
                    let definition = node.value_raw.clone().unwrap_or_default();
                    define_custom(&mut self.units, &name, &definition)?;
                }
                _ => {}
            }

            // Step 2: hierarchical naming through the indent/parent stack.
            if let Some(short) = node.name.clone() {
                let indent = node.indent as i64;
                while indent <= *indents.last().unwrap_or(&-1) {
                    indents.pop();
                    parents.pop();
                }
                parents.push(short);
                indents.push(indent);
                node.name = Some(parents.join("."));
            }

            // Step 3: dispatch by kind.
            match node.kind {
                NodeKind::Option => {
                    let Some(host) = results.last_mut() else {
                        return Err(DpmlError::MalformedLine {
                            loc: node.loc(),
                            code: node.value_raw.unwrap_or_default(),
                        });
                    };
                    host.add_option(&node, &self.units)?;
                }
                NodeKind::Empty | NodeKind::Group | NodeKind::Unit => continue,
                NodeKind::Condition => {
                    self.update_case_stack(&node, &mut case_names, &mut case_counts)?;
                }
                _ => {
                    let casename = case_names.last().cloned().unwrap_or_default();
                    if !casename.is_empty() {
                        if *case_counts.last().unwrap_or(&0) > 1 {
                            // a previous case already satisfied this block
                            continue;
                        }
                        if !node.display_name().starts_with(&casename) {
                            case_names.pop();
                            case_counts.pop();
                        }
                        let stripped = node
                            .display_name()
                            .replace("@case.", "")
                            .replace("@else.", "");
                        node.name = Some(stripped);
                    }
                    node.set_value(&self.units)?;
                    if let Some(existing) =
                        results.iter_mut().find(|n| n.name == node.name)
                    {
                        existing.modify_from(&node, &self.units)?;
                    } else {
                        if node.kind == NodeKind::Mod {
                            return Err(DpmlError::UndefinedNodeModified {
                                loc: node.loc(),
                                name: node.display_name().to_string(),
                            });
                        }
                        results.push(node);
                    }
                }
            }
        }
        tracing::debug!(source = %self.source, nodes = results.len(), "finalized");
        self.nodes = results;
        Ok(())
    }

    /// Expand an import node: resolve the target, re-root every imported
    /// node under the import node's name and indent.
    fn expand_import(&self, import: &Node, results: &[Node]) -> Result<Vec<Node>> {
        let path = import.value_raw.clone().unwrap_or_default();
        let imported = request(
            &path,
            None,
            results,
            &self.units,
            &self.reader,
            self.depth,
        )?;
        let name = import.display_name().to_string();
        let prefix = match name.rfind(".{") {
            Some(index) => &name[..index],
            None => "",
        };
        let mut out = Vec::with_capacity(imported.len());
        for mut node in imported {
            let short = node.display_name().to_string();
            node.source = import.source.clone();
            node.line = import.line;
            node.indent = import.indent;
            node.name = Some(if prefix.is_empty() {
                short
            } else {
                format!("{prefix}.{short}")
            });
            out.push(node);
        }
        Ok(out)
    }

    /// Fill an import-valued node: a `?` query copies the target node's raw
    /// value (and units, when absent); a bare path reads the file verbatim.
    fn fill_import(&self, node: &mut Node, results: &[Node]) -> Result<()> {
        let path = node.value_raw.clone().unwrap_or_default();
        if path.contains('?') {
            let imported = request(
                &path,
                Some(&[1]),
                results,
                &self.units,
                &self.reader,
                self.depth,
            )?;
            let target = &imported[0];
            if target.value_raw.is_some() {
                node.value_raw = target.value_raw.clone();
            } else {
                node.value_raw = None;
                node.value = target.value.clone();
            }
            if node.units.is_none() {
                node.units = target.units.clone();
            }
        } else {
            node.value_raw = Some(self.reader.read(&path)?);
        }
        node.is_import = false;
        Ok(())
    }

    fn update_case_stack(
        &self,
        node: &Node,
        case_names: &mut Vec<String>,
        case_counts: &mut Vec<u32>,
    ) -> Result<()> {
        let name = node.display_name().to_string();
        let casename = case_names.last().cloned().unwrap_or_default();
        if name.ends_with("@case") {
            if format!("{casename}case") != name {
                case_names.push(name[..name.len() - 4].to_string());
                case_counts.push(0);
            }
            let satisfied = matches!(node.value, Value::Bool(true));
            if satisfied || case_counts.last() == Some(&1) {
                if let Some(count) = case_counts.last_mut() {
                    *count += 1;
                }
            }
        } else if name == format!("{casename}else") {
            if let Some(count) = case_counts.last_mut() {
                *count += 1;
            }
        } else if name == format!("{casename}end") {
            if case_names.len() <= 1 {
                return Err(DpmlError::InvalidCondition {
                    loc: node.loc(),
                    name,
                });
            }
            case_names.pop();
            case_counts.pop();
        } else {
            return Err(DpmlError::InvalidCondition {
                loc: node.loc(),
                name,
            });
        }
        Ok(())
    }

    /// Select finalized nodes: `*`, `prefix.*` or an exact dotted path.
    pub fn query(&self, query: &str) -> Vec<Node> {
        query_nodes(&self.nodes, query)
    }

    /// Resolve an import-or-local target with an optional cardinality
    /// constraint.
    pub fn request(&self, path: &str, count: Option<&[usize]>) -> Result<Vec<Node>> {
        request(
            path,
            count,
            &self.nodes,
            &self.units,
            &self.reader,
            self.depth,
        )
    }

    /// Evaluate a boolean expression against the finalized nodes.
    pub fn expression(&self, expr: &str) -> Result<bool> {
        let evaluator = Evaluator {
            nodes: &self.nodes,
            units: &self.units,
            reader: &self.reader,
            depth: self.depth,
        };
        evaluator.eval(expr)
    }

    /// Render a template string by substituting `{{path}[:format]}` tokens.
    pub fn template(&self, template: &str) -> Result<String> {
        render_template(
            template,
            &self.nodes,
            &self.units,
            &self.reader,
            self.depth,
        )
    }

    /// Render a template file, optionally writing the result out.
    pub fn template_file(&self, path: &str, output: Option<&str>) -> Result<String> {
        let template = self.reader.read(path)?;
        let rendered = self.template(&template)?;
        if let Some(output) = output {
            self.writer.write(output, &rendered)?;
        }
        Ok(rendered)
    }

    /// Flat view: fully-qualified name → value, in insertion order.
    pub fn data(&self) -> IndexMap<String, Value> {
        self.nodes
            .iter()
            .map(|node| (node.display_name().to_string(), node.value.clone()))
            .collect()
    }

    /// Human-readable dump of the finalized nodes (diagnostic only).
    pub fn display(&self) {
        for node in &self.nodes {
            print!(
                "{} | {} | {} | {:?} | {:?}",
                node.display_name(),
                node.indent,
                node.kind.type_name(),
                node.value,
                node.units,
            );
            if !node.options.is_empty() {
                print!(" | {:?}", node.options);
            }
            println!();
        }
    }
}

impl Default for Dpml {
    fn default() -> Self {
        Self::new()
    }
}
