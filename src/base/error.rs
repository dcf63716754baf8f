//! Error types for parsing, interpretation, unit algebra and rendering.
//!
//! Every error that originates at a source line carries a [`Location`] so
//! callers can point at the offending line. Errors abort the current public
//! operation; no partial results are returned.

use std::fmt;

use thiserror::Error;

/// Provenance of a node or error: source label (file path or `inline`) and
/// 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Location {
    pub source: String,
    pub line: usize,
}

impl Location {
    pub fn new(source: impl Into<String>, line: usize) -> Self {
        Self {
            source: source.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, DpmlError>;

/// All failure modes of the DPML core.
#[derive(Debug, Error)]
pub enum DpmlError {
    /// A line does not match any grammar form.
    #[error("{loc}: line does not match any DPML form: {code:?}")]
    MalformedLine { loc: Location, code: String },

    /// An opening `"""` fence has no closing fence.
    #[error("{loc}: block structure is not properly terminated")]
    UnterminatedBlock { loc: Location },

    /// Unrecognized type keyword.
    #[error("{loc}: type keyword not recognized in: {code:?}")]
    UnknownType { loc: Location, code: String },

    /// A unit token has an unrecognized prefix.
    #[error("unit prefix '{prefix}' is not available in: {token}")]
    UnknownPrefix { prefix: String, token: String },

    /// A unit token does not resolve to a registered symbol.
    #[error("unit symbol is not recognized: {token}")]
    UnknownUnit { token: String },

    /// Conversion between units of different physical dimension.
    #[error("units '{from}' and '{to}' cannot be converted")]
    DimensionMismatch { from: String, to: String },

    /// Unbalanced parentheses in a unit or boolean expression.
    #[error("unbalanced parentheses in: {expr}")]
    UnbalancedParen { expr: String },

    /// A raw value is not coercible to the declared type.
    #[error("{loc}: cannot cast value '{raw}' of node '{name}' to {kind}")]
    InvalidCast {
        loc: Location,
        name: String,
        raw: String,
        kind: &'static str,
    },

    /// A node marked with `!` ended up with a null value.
    #[error("{loc}: value of node '{name}' must be defined")]
    UndefinedRequired { loc: Location, name: String },

    /// An array shape violates the declared dimension bounds.
    #[error("{loc}: node '{name}' has invalid dimension: dim({axis})={size} {bound}")]
    DimensionOutOfRange {
        loc: Location,
        name: String,
        axis: usize,
        size: usize,
        bound: String,
    },

    /// A value is not a member of the node's option list.
    #[error("{loc}: value '{value}' of node '{name}' does not match any option: [{options}]")]
    OptionViolation {
        loc: Location,
        name: String,
        value: String,
        options: String,
    },

    /// A modification targets a name that was never declared.
    #[error("{loc}: modifying undefined node: {name}")]
    UndefinedNodeModified { loc: Location, name: String },

    /// A typed redefinition tried to change the declared type.
    #[error("{loc}: datatype {from} of node '{name}' cannot be changed to {to}")]
    TypeChangeRejected {
        loc: Location,
        name: String,
        from: &'static str,
        to: &'static str,
    },

    /// Options attached to a node kind that does not accept them.
    #[error("{loc}: node '{kind}' does not support options")]
    OptionUnsupported { loc: Location, kind: &'static str },

    /// Malformed `@case`/`@else`/`@end` sequence.
    #[error("{loc}: invalid condition: {name}")]
    InvalidCondition { loc: Location, name: String },

    /// An import resolved to an unexpected number of nodes.
    #[error("path '{path}' returned invalid number of nodes: {found} not in {expected:?}")]
    ImportCardinality {
        path: String,
        expected: Vec<usize>,
        found: usize,
    },

    /// A local query ran before any nodes were available.
    #[error("local nodes are not available for import: {path}")]
    NoLocalNodes { path: String },

    /// A node reference in an expression or template resolved to nothing.
    #[error("node reference cannot be resolved: {path}")]
    UnresolvedNode { path: String },

    /// A bare operand expression did not evaluate to a boolean.
    #[error("expression does not evaluate to a boolean: {expr}")]
    NonBoolExpression { expr: String },

    /// Operand types cannot be compared.
    #[error("invalid comparison: {expr}")]
    InvalidComparison { expr: String },

    /// A custom unit collides with an existing symbol.
    #[error("unit '{symbol}' already exists")]
    DuplicateUnit { symbol: String },

    /// File imports recursed past the configured depth bound.
    #[error("import recursion depth exceeded ({limit}) at: {path}")]
    ImportDepthExceeded { path: String, limit: usize },

    /// Invalid or unsupported format specifier in a template token.
    #[error("invalid format specifier: {spec}")]
    InvalidFormat { spec: String },

    /// The reader failed to supply file contents.
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The writer failed to persist rendered output.
    #[error("cannot write '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}
