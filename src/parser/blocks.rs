//! Triple-quoted block folding.
//!
//! A line containing an odd number of `"""` fences opens a block; all
//! following lines are appended verbatim (with embedded newlines) up to the
//! next line containing a fence, whose leading whitespace is stripped. A
//! line with an even fence count is self-contained, which makes folding
//! idempotent over already-folded input.

use crate::base::{DpmlError, Location, Result};

const FENCE: &str = "\"\"\"";

/// A physical source line with its 1-based number; after folding, a logical
/// line that may carry embedded newlines.
#[derive(Debug, Clone)]
pub struct RawLine {
    pub text: String,
    pub line: usize,
}

/// Merge triple-quoted multi-line literals into single logical lines.
pub fn fold_blocks(lines: Vec<RawLine>, source: &str) -> Result<Vec<RawLine>> {
    let mut out = Vec::with_capacity(lines.len());
    let mut iter = lines.into_iter();
    while let Some(mut line) = iter.next() {
        if line.text.matches(FENCE).count() % 2 == 1 {
            let mut block: Vec<String> = Vec::new();
            let mut closed = false;
            for sub in iter.by_ref() {
                if sub.text.contains(FENCE) {
                    line.text.push_str(&block.join("\n"));
                    line.text.push_str(sub.text.trim_start());
                    closed = true;
                    break;
                }
                block.push(sub.text);
            }
            if !closed {
                return Err(DpmlError::UnterminatedBlock {
                    loc: Location::new(source, line.line),
                });
            }
        }
        out.push(line);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<RawLine> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| RawLine {
                text: t.to_string(),
                line: i + 1,
            })
            .collect()
    }

    #[test]
    fn test_fold_multiline_block() {
        let folded = fold_blocks(
            lines(&["text str = \"\"\"", "first", "second", "\"\"\""]),
            "test",
        )
        .unwrap();
        assert_eq!(folded.len(), 1);
        assert_eq!(folded[0].text, "text str = \"\"\"first\nsecond\"\"\"");
    }

    #[test]
    fn test_fold_keeps_indented_close() {
        let folded = fold_blocks(lines(&["t str = \"\"\"", "body", "  \"\"\"  # c"]), "test")
            .unwrap();
        assert_eq!(folded[0].text, "t str = \"\"\"body\"\"\"  # c");
    }

    #[test]
    fn test_fold_is_idempotent() {
        let once = fold_blocks(lines(&["t str = \"\"\"", "a", "b", "\"\"\""]), "test").unwrap();
        let twice = fold_blocks(once.clone(), "test").unwrap();
        assert_eq!(once[0].text, twice[0].text);
    }

    #[test]
    fn test_unterminated_block() {
        let err = fold_blocks(lines(&["t str = \"\"\"", "body"]), "test").unwrap_err();
        assert!(matches!(err, DpmlError::UnterminatedBlock { .. }));
    }
}
