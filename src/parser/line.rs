//! The left-to-right line scanner.
//!
//! Extracts structural fields from a single (already folded and
//! marker-encoded) logical line: indent, name, type keyword, defined flag,
//! dimension bounds, value, units, comment, format spec. Each `read_*`
//! method consumes a recognized prefix of the remaining text; the
//! classifier decides which sequence of reads applies.

use crate::base::{DpmlError, Location, Result};
use crate::model::{DimBound, NodeKind};
use crate::parser::escape::decode;

const TYPE_KEYWORDS: [&str; 5] = ["bool", "int", "float", "str", "table"];

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-'
}

fn is_unit_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn prefix_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.find(|c| !pred(c)).unwrap_or(s.len())
}

fn whitespace_len(s: &str) -> usize {
    prefix_len(s, char::is_whitespace)
}

/// Scanner state over one logical line.
pub struct LineScanner<'a> {
    code: &'a str,
    rest: &'a str,
    pub line: usize,
    pub source: &'a str,
    pub indent: usize,
    pub name: Option<String>,
    pub type_kind: Option<NodeKind>,
    pub value: Option<String>,
    pub is_import: bool,
    pub defined: bool,
    pub units: Option<String>,
    pub comment: Option<String>,
    pub dimension: Option<Vec<DimBound>>,
    pub format: Option<String>,
}

impl<'a> LineScanner<'a> {
    pub fn new(code: &'a str, line: usize, source: &'a str) -> Self {
        Self {
            code,
            rest: code,
            line,
            source,
            indent: 0,
            name: None,
            type_kind: None,
            value: None,
            is_import: false,
            defined: false,
            units: None,
            comment: None,
            dimension: None,
            format: None,
        }
    }

    pub fn rest(&self) -> &str {
        self.rest
    }

    /// Bytes consumed so far; the template renderer uses this to advance.
    pub fn consumed(&self) -> usize {
        self.code.len() - self.rest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rest.trim().is_empty()
    }

    pub fn loc(&self) -> Location {
        Location::new(self.source, self.line)
    }

    pub fn malformed(&self) -> DpmlError {
        DpmlError::MalformedLine {
            loc: self.loc(),
            code: decode(self.code),
        }
    }

    fn strip(&mut self, bytes: usize) {
        self.rest = &self.rest[bytes..];
    }

    pub fn skip_whitespace(&mut self) {
        let len = whitespace_len(self.rest);
        self.strip(len);
    }

    pub fn read_indent(&mut self) {
        let len = whitespace_len(self.rest);
        self.indent = self.rest[..len].chars().count();
        self.strip(len);
    }

    /// Node names use `[A-Za-z0-9_.-]+`; unit names restrict to
    /// `[A-Za-z0-9_]+`.
    pub fn read_name(&mut self, path: bool) -> Result<()> {
        let len = if path {
            prefix_len(self.rest, is_name_char)
        } else {
            prefix_len(self.rest, is_unit_name_char)
        };
        if len == 0 {
            return Err(self.malformed());
        }
        self.name = Some(self.rest[..len].to_string());
        self.strip(len);
        if !self.is_empty() && !self.rest.starts_with(' ') {
            return Err(self.malformed());
        }
        Ok(())
    }

    pub fn read_type(&mut self) -> Result<()> {
        let ws = whitespace_len(self.rest);
        if ws > 0 {
            let after = &self.rest[ws..];
            for keyword in TYPE_KEYWORDS {
                if after.starts_with(keyword) {
                    self.type_kind = NodeKind::from_keyword(keyword);
                    self.strip(ws + keyword.len());
                    return Ok(());
                }
            }
        }
        Err(DpmlError::UnknownType {
            loc: self.loc(),
            code: decode(self.code),
        })
    }

    pub fn read_defined(&mut self) {
        if self.rest.starts_with('!') {
            self.defined = true;
            self.strip(1);
        }
    }

    /// One or more `[N]` / `[N:M]` segments, either endpoint optional.
    pub fn read_dimension(&mut self) -> Result<()> {
        while self.rest.starts_with('[') {
            let Some(close) = self.rest.find(']') else {
                break;
            };
            let inner = &self.rest[1..close];
            if inner.is_empty() || !inner.chars().all(|c| c.is_ascii_digit() || c == ':') {
                break;
            }
            let bound = if let Some((min, max)) = inner.split_once(':') {
                if max.contains(':') {
                    return Err(self.malformed());
                }
                (self.parse_bound(min)?, self.parse_bound(max)?)
            } else {
                let n = self.parse_bound(inner)?;
                (n, n)
            };
            self.dimension.get_or_insert_with(Vec::new).push(bound);
            self.strip(close + 1);
        }
        Ok(())
    }

    fn parse_bound(&self, text: &str) -> Result<Option<usize>> {
        if text.is_empty() {
            return Ok(None);
        }
        text.parse().map(Some).map_err(|_| self.malformed())
    }

    /// `{path}` reference; sets the import flag and captures the path.
    pub fn read_import(&mut self) {
        if !self.rest.starts_with('{') {
            return;
        }
        let Some(close) = self.rest.find('}') else {
            return;
        };
        self.is_import = true;
        self.value = Some(self.rest[1..close].to_string());
        self.strip(close + 1);
    }

    /// Value after an optional `=`: an import reference, a quoted or
    /// triple-quoted literal, or a bare token ending at whitespace or `#`.
    pub fn read_value(&mut self, equal_sign: bool) -> Result<()> {
        if equal_sign {
            let ws = whitespace_len(self.rest);
            if !self.rest[ws..].starts_with('=') {
                return Err(self.malformed());
            }
            self.strip(ws + 1);
            let ws = whitespace_len(self.rest);
            self.strip(ws);
        }
        self.read_import();
        if self.value.is_some() {
            return Ok(());
        }
        if let Some(body) = self.rest.strip_prefix("\"\"\"") {
            let Some(close) = body.rfind("\"\"\"") else {
                return Err(self.malformed());
            };
            self.value = Some(body[..close].to_string());
            self.strip(3 + close + 3);
            return Ok(());
        }
        for quote in ['"', '\''] {
            if let Some(body) = self.rest.strip_prefix(quote) {
                let Some(close) = body.find(quote) else {
                    return Err(self.malformed());
                };
                self.value = Some(body[..close].to_string());
                self.strip(1 + close + 1);
                return Ok(());
            }
        }
        let len = prefix_len(self.rest, |c| !c.is_whitespace() && c != '#');
        if len == 0 {
            return Err(self.malformed());
        }
        self.value = Some(self.rest[..len].to_string());
        self.strip(len);
        Ok(())
    }

    /// Unit expression following the value, separated by whitespace.
    pub fn read_units(&mut self) {
        let ws = whitespace_len(self.rest);
        if ws == 0 {
            return;
        }
        let after = &self.rest[ws..];
        let len = prefix_len(after, |c| !c.is_whitespace() && c != '#' && c != '=');
        if len == 0 {
            return;
        }
        self.units = Some(after[..len].to_string());
        self.strip(ws + len);
    }

    pub fn read_comment(&mut self) {
        let ws = whitespace_len(self.rest);
        if let Some(body) = self.rest[ws..].strip_prefix('#') {
            self.comment = Some(body.trim_start().to_string());
            self.rest = "";
        }
    }

    /// Template format spec `:[width][.precision][sdfeb]`.
    pub fn read_format(&mut self) {
        let Some(body) = self.rest.strip_prefix(':') else {
            return;
        };
        let digits = prefix_len(body, |c| c.is_ascii_digit() || c == '.');
        let letters = prefix_len(&body[digits..], |c| "sdfeb".contains(c));
        if letters == 0 {
            return;
        }
        self.format = Some(self.rest[..1 + digits + letters].to_string());
        self.strip(1 + digits + letters);
    }

    /// `NAME@case EXPR`, `NAME@else` or `NAME@end`. Returns whether the
    /// line is a condition.
    pub fn read_condition(&mut self) -> Result<bool> {
        let len = prefix_len(self.rest, is_name_char);
        let after = &self.rest[len..];
        if let Some(tail) = after.strip_prefix("@case") {
            let ws = whitespace_len(tail);
            if ws == 0 {
                return Ok(false);
            }
            let name = self.rest[..len + 5].to_string();
            let body = &tail[ws..];
            let (expr, consumed) = if let Some(block) = body.strip_prefix("\"\"\"") {
                match block.rfind("\"\"\"") {
                    Some(close) => (block[..close].to_string(), 3 + close + 3),
                    None => return Err(self.malformed()),
                }
            } else {
                let expr_len = prefix_len(body, |c| c != '#');
                (body[..expr_len].to_string(), expr_len)
            };
            if expr.trim().is_empty() {
                return Err(DpmlError::InvalidCondition {
                    loc: self.loc(),
                    name,
                });
            }
            self.value = Some(expr.trim().to_string());
            self.name = Some(name);
            self.strip(len + 5 + ws + consumed);
            return Ok(true);
        }
        for keyword in ["@else", "@end"] {
            if after.starts_with(keyword) {
                self.name = Some(self.rest[..len + keyword.len()].to_string());
                self.strip(len + keyword.len());
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// `NAME@unit DEFINITION` custom-unit line. Returns whether it matched.
    pub fn read_unit_def(&mut self) -> Result<bool> {
        let len = prefix_len(self.rest, is_unit_name_char);
        let after = &self.rest[len..];
        let Some(tail) = after.strip_prefix("@unit") else {
            return Ok(false);
        };
        let ws = whitespace_len(tail);
        if ws == 0 {
            return Err(self.malformed());
        }
        let body = &tail[ws..];
        let def_len = prefix_len(body, |c| c != '#');
        let definition = body[..def_len].trim();
        if definition.is_empty() {
            return Err(self.malformed());
        }
        self.name = Some(self.rest[..len + 5].to_string());
        self.value = Some(definition.to_string());
        self.strip(len + 5 + ws + def_len);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(code: &str) -> LineScanner<'_> {
        LineScanner::new(code, 1, "test")
    }

    #[test]
    fn test_typed_value_line() {
        let mut s = scan("  weight float! = 63.3 kg  # body weight");
        s.read_indent();
        s.read_name(true).unwrap();
        s.read_type().unwrap();
        s.read_defined();
        s.read_dimension().unwrap();
        s.read_value(true).unwrap();
        s.read_units();
        s.read_comment();
        assert_eq!(s.indent, 2);
        assert_eq!(s.name.as_deref(), Some("weight"));
        assert_eq!(s.type_kind, Some(NodeKind::Float));
        assert!(s.defined);
        assert_eq!(s.value.as_deref(), Some("63.3"));
        assert_eq!(s.units.as_deref(), Some("kg"));
        assert_eq!(s.comment.as_deref(), Some("body weight"));
        assert!(s.is_empty());
    }

    #[test]
    fn test_dimension_bounds() {
        let mut s = scan("lengths float[2:][2] = [[1,2],[3,4]] cm");
        s.read_name(true).unwrap();
        s.read_type().unwrap();
        s.read_defined();
        s.read_dimension().unwrap();
        assert_eq!(
            s.dimension,
            Some(vec![(Some(2), None), (Some(2), Some(2))])
        );
    }

    #[test]
    fn test_quoted_value_stops_at_quote() {
        let mut s = scan("name str = \"Johannes Brahms\"");
        s.read_name(true).unwrap();
        s.read_type().unwrap();
        s.read_value(true).unwrap();
        assert_eq!(s.value.as_deref(), Some("Johannes Brahms"));
    }

    #[test]
    fn test_import_value() {
        let mut s = scan("matrix int[3][4] = {blocks/matrix.txt}");
        s.read_name(true).unwrap();
        s.read_type().unwrap();
        s.read_defined();
        s.read_dimension().unwrap();
        s.read_value(true).unwrap();
        assert!(s.is_import);
        assert_eq!(s.value.as_deref(), Some("blocks/matrix.txt"));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let mut s = scan("wrong$name int = 3");
        assert!(s.read_name(true).is_err());
    }

    #[test]
    fn test_condition_forms() {
        let mut s = scan("@case {?size} > 1 m  # c");
        assert!(s.read_condition().unwrap());
        assert_eq!(s.name.as_deref(), Some("@case"));
        assert_eq!(s.value.as_deref(), Some("{?size} > 1 m"));

        let mut s = scan("plant.@else");
        assert!(s.read_condition().unwrap());
        assert_eq!(s.name.as_deref(), Some("plant.@else"));

        let mut s = scan("leaf int = 3");
        assert!(!s.read_condition().unwrap());
    }

    #[test]
    fn test_unit_definition_line() {
        let mut s = scan("lambda@unit 550 nm");
        assert!(s.read_unit_def().unwrap());
        assert_eq!(s.name.as_deref(), Some("lambda@unit"));
        assert_eq!(s.value.as_deref(), Some("550 nm"));
    }
}
