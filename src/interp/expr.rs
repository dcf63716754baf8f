//! Boolean expression evaluator.
//!
//! Grammar (precedence low → high): `||`, `&&`, unary `~` (boolean
//! negation) and `!` (defined-check), comparisons
//! `== != >= <= > <`, parentheses. Operands are `true`/`false`, `{path}`
//! node references resolved through import semantics, or inline literals
//! with optional units.
//!
//! `&&` and `||` short-circuit during a left-to-right sweep that splits the
//! expression at top-level operators; comparisons convert the two sides
//! into a common type and the left side's units before comparing.

use std::sync::Arc;

use logos::Logos;

use crate::base::{DpmlError, Result, SourceReader, approx_eq};
use crate::interp::imports::request;
use crate::model::{Node, Value, cast_value};
use crate::units::{UnitRegistry, convert_value};

/// Token stream for the top-level sweep. Only the structural tokens matter;
/// everything between them is recovered as operand text via source spans.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum ExprToken {
    #[token("||")]
    OrOr,
    #[token("&&")]
    AndAnd,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    /// A `{path}` node reference; kept opaque so its content never splits.
    #[regex(r"\{[^}]*\}")]
    Reference,
    #[regex(r"[ \t\r\n]+")]
    Whitespace,
    #[regex(r"[^|&(){}\s]+")]
    Atom,
    #[token("|")]
    Pipe,
    #[token("&")]
    Amp,
    #[token("}")]
    RBrace,
}

#[derive(Debug)]
enum Operand {
    /// A comparison or bare boolean operand.
    Leaf(String),
    /// A parenthesized subexpression (with any prefix text folded in),
    /// evaluated recursively.
    Nested(String),
}

/// A resolved comparison operand: a typed node or an anonymous literal.
enum Resolved {
    Known(Node),
    Anon { raw: String, units: Option<String> },
}

#[derive(Clone, Copy)]
enum CmpOp {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
}

const COMPARISONS: [(&str, CmpOp); 6] = [
    ("==", CmpOp::Eq),
    ("!=", CmpOp::Ne),
    (">=", CmpOp::Ge),
    ("<=", CmpOp::Le),
    (">", CmpOp::Gt),
    ("<", CmpOp::Lt),
];

/// Evaluates expressions against a node list and unit table.
pub struct Evaluator<'a> {
    pub nodes: &'a [Node],
    pub units: &'a UnitRegistry,
    pub reader: &'a Arc<dyn SourceReader>,
    pub depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn eval(&self, expr: &str) -> Result<bool> {
        if expr.matches('(').count() != expr.matches(')').count() {
            return Err(DpmlError::UnbalancedParen {
                expr: expr.to_string(),
            });
        }
        self.eval_expr(expr)
    }

    fn eval_expr(&self, expr: &str) -> Result<bool> {
        let groups = split_operands(expr)?;
        for group in groups {
            let mut all = true;
            for operand in group {
                let value = match &operand {
                    Operand::Leaf(text) => self.eval_comparison(text)?,
                    Operand::Nested(text) => self.eval_expr(text)?,
                };
                if !value {
                    all = false;
                    break;
                }
            }
            if all {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn eval_comparison(&self, text: &str) -> Result<bool> {
        let text = text.trim();
        for (symbol, op) in COMPARISONS {
            let Some(index) = find_outside_braces(text, symbol) else {
                continue;
            };
            let lhs = &text[..index];
            let rhs = &text[index + symbol.len()..];
            let left = self
                .eval_operand(lhs)?
                .ok_or_else(|| unresolved(lhs))?;
            let right = self
                .eval_operand(rhs)?
                .ok_or_else(|| unresolved(rhs))?;
            return self.compare(left, right, op, text);
        }
        let node = self
            .eval_operand(text)?
            .ok_or_else(|| unresolved(text))?;
        match node {
            Resolved::Known(node) => match node.value {
                Value::Bool(b) => Ok(b),
                _ => Err(DpmlError::NonBoolExpression {
                    expr: text.to_string(),
                }),
            },
            Resolved::Anon { .. } => Err(DpmlError::NonBoolExpression {
                expr: text.to_string(),
            }),
        }
    }

    /// Resolve one operand: `~` negates a boolean, `!` turns existence into
    /// a boolean, `{path}` resolves through the import engine, `true` and
    /// `false` are literals, anything else is an anonymous value with
    /// optional units. Returns `None` for a reference that matched nothing.
    fn eval_operand(&self, text: &str) -> Result<Option<Resolved>> {
        let mut rest = text.trim();
        if rest.is_empty() {
            return Ok(None);
        }
        let mut negate = false;
        let mut defined = false;
        if let Some(stripped) = rest.strip_prefix('~') {
            negate = true;
            rest = stripped.trim_start();
        }
        if let Some(stripped) = rest.strip_prefix('!') {
            defined = true;
            rest = stripped.trim_start();
        }

        let mut scanner = crate::parser::LineScanner::new(rest, 0, "expression");
        scanner.read_value(false)?;
        let resolved = if scanner.is_import {
            let path = scanner.value.clone().unwrap_or_default();
            let nodes = request(
                &path,
                Some(&[0, 1]),
                self.nodes,
                self.units,
                self.reader,
                self.depth,
            )?;
            if defined {
                Resolved::Known(Node::bool_literal(!nodes.is_empty(), "expression", 0))
            } else {
                match nodes.into_iter().next() {
                    Some(node) => Resolved::Known(node),
                    None => return Ok(None),
                }
            }
        } else {
            let raw = scanner.value.clone().unwrap_or_default();
            match raw.as_str() {
                "true" => Resolved::Known(Node::bool_literal(true, "expression", 0)),
                "false" => Resolved::Known(Node::bool_literal(false, "expression", 0)),
                _ => {
                    scanner.read_units();
                    Resolved::Anon {
                        raw,
                        units: scanner.units.clone(),
                    }
                }
            }
        };

        if negate {
            let Resolved::Known(mut node) = resolved else {
                return Err(DpmlError::NonBoolExpression {
                    expr: text.to_string(),
                });
            };
            let Value::Bool(b) = node.value else {
                return Err(DpmlError::NonBoolExpression {
                    expr: text.to_string(),
                });
            };
            node.value = Value::Bool(!b);
            return Ok(Some(Resolved::Known(node)));
        }
        Ok(Some(resolved))
    }

    /// Cast the unknown side to the known side's type, convert the
    /// right-hand side's units into the left-hand side's, then compare.
    fn compare(&self, left: Resolved, right: Resolved, op: CmpOp, expr: &str) -> Result<bool> {
        let invalid = || DpmlError::InvalidComparison {
            expr: expr.to_string(),
        };
        let (lv, rv) = match (&left, &right) {
            (Resolved::Known(a), Resolved::Known(b)) => {
                if a.kind != b.kind {
                    return Err(invalid());
                }
                let mut rv = b.value.clone();
                if let (Some(from), Some(to)) = (&b.units, &a.units) {
                    if from != to {
                        rv = convert_value(self.units, &rv, from, to)?;
                    }
                }
                (a.value.clone(), rv)
            }
            (Resolved::Known(a), Resolved::Anon { raw, units }) => {
                let mut rv = cast_value(a.kind, None, raw, a.loc(), a.display_name())?;
                if let (Some(from), Some(to)) = (units, &a.units) {
                    if from != to {
                        rv = convert_value(self.units, &rv, from, to)?;
                    }
                }
                (a.value.clone(), rv)
            }
            (Resolved::Anon { raw, units }, Resolved::Known(b)) => {
                let mut lv = cast_value(b.kind, None, raw, b.loc(), b.display_name())?;
                if let (Some(from), Some(to)) = (units, &b.units) {
                    if from != to {
                        lv = convert_value(self.units, &lv, from, to)?;
                    }
                }
                (lv, b.value.clone())
            }
            (Resolved::Anon { .. }, Resolved::Anon { .. }) => return Err(invalid()),
        };
        compare_values(&lv, &rv, op).ok_or_else(invalid)
    }
}

fn unresolved(text: &str) -> DpmlError {
    DpmlError::UnresolvedNode {
        path: text.trim().to_string(),
    }
}

/// Compare two values of equal type; float equality is tolerant. `None`
/// marks an unsupported combination.
fn compare_values(left: &Value, right: &Value, op: CmpOp) -> Option<bool> {
    match op {
        CmpOp::Eq => Some(left.approx_eq(right)),
        CmpOp::Ne => Some(!left.approx_eq(right)),
        _ => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Some(match op {
                CmpOp::Ge => a >= b,
                CmpOp::Le => a <= b,
                CmpOp::Gt => a > b,
                CmpOp::Lt => a < b,
                _ => unreachable!(),
            }),
            (Value::Float(a), Value::Float(b)) => Some(match op {
                CmpOp::Ge => a > b || approx_eq(*a, *b),
                CmpOp::Le => a < b || approx_eq(*a, *b),
                CmpOp::Gt => *a > *b,
                CmpOp::Lt => *a < *b,
                _ => unreachable!(),
            }),
            (Value::Str(a), Value::Str(b)) => Some(match op {
                CmpOp::Ge => a >= b,
                CmpOp::Le => a <= b,
                CmpOp::Gt => a > b,
                CmpOp::Lt => a < b,
                _ => unreachable!(),
            }),
            _ => None,
        },
    }
}

/// Find a comparison operator outside any `{...}` reference.
fn find_outside_braces(text: &str, symbol: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && text[index..].starts_with(symbol) => return Some(index),
            _ => {}
        }
    }
    None
}

/// Sweep the expression left to right, splitting at top-level `||` and `&&`
/// and folding parenthesized spans (plus any prefix text) into nested
/// operands.
fn split_operands(expr: &str) -> Result<Vec<Vec<Operand>>> {
    let mut groups: Vec<Vec<Operand>> = Vec::new();
    let mut current: Vec<Operand> = Vec::new();
    let mut buffer = String::new();
    let mut nested: Option<String> = None;

    let mut lexer = ExprToken::lexer(expr);
    while let Some(token) = lexer.next() {
        let token = token.map_err(|()| DpmlError::NonBoolExpression {
            expr: expr.to_string(),
        })?;
        match token {
            ExprToken::OrOr | ExprToken::AndAnd => {
                current.push(take_operand(&mut buffer, &mut nested, expr)?);
                if token == ExprToken::OrOr {
                    groups.push(std::mem::take(&mut current));
                }
            }
            ExprToken::LParen => {
                let start = lexer.span().end;
                let mut depth = 1usize;
                let mut end = start;
                for inner in lexer.by_ref() {
                    match inner {
                        Ok(ExprToken::LParen) => depth += 1,
                        Ok(ExprToken::RParen) => {
                            depth -= 1;
                            if depth == 0 {
                                end = lexer.span().start;
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                if depth != 0 {
                    return Err(DpmlError::UnbalancedParen {
                        expr: expr.to_string(),
                    });
                }
                // Fold any prefix text into the subexpression, matching the
                // sweep's concatenation semantics for forms like `~(...)`.
                let mut sub = std::mem::take(&mut buffer).trim_start().to_string();
                sub.push_str(&expr[start..end]);
                if nested.replace(sub).is_some() {
                    return Err(DpmlError::NonBoolExpression {
                        expr: expr.to_string(),
                    });
                }
            }
            ExprToken::RParen => {
                return Err(DpmlError::UnbalancedParen {
                    expr: expr.to_string(),
                });
            }
            _ => {
                if nested.is_some() && !lexer.slice().trim().is_empty() {
                    return Err(DpmlError::NonBoolExpression {
                        expr: expr.to_string(),
                    });
                }
                if nested.is_none() {
                    buffer.push_str(lexer.slice());
                }
            }
        }
    }
    current.push(take_operand(&mut buffer, &mut nested, expr)?);
    groups.push(current);
    Ok(groups)
}

fn take_operand(
    buffer: &mut String,
    nested: &mut Option<String>,
    expr: &str,
) -> Result<Operand> {
    if let Some(sub) = nested.take() {
        buffer.clear();
        return Ok(Operand::Nested(sub));
    }
    let text = std::mem::take(buffer);
    if text.trim().is_empty() {
        return Err(DpmlError::NonBoolExpression {
            expr: expr.to_string(),
        });
    }
    Ok(Operand::Leaf(text))
}
