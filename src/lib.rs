//! # dpml
//!
//! Core library for DPML (Dimensional Parameter Markup Language):
//! declarative parameter files with typed, optionally dimensional values,
//! physical units, defaults, option lists, hierarchical grouping,
//! conditional branches, template substitution and cross-file inclusion.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! render    → template substitution, value formatting
//!   ↓
//! interp    → interpreter core, imports/queries, expression evaluator
//!   ↓
//! parser    → block folder, line scanner, node classification
//!   ↓
//! units     → unit table, dimensional algebra, arbitrary units
//!   ↓
//! model     → Node record, Value sum type, casting and checks
//!   ↓
//! base      → error taxonomy, locations, reader/writer traits
//! ```
//!
//! ## Example
//!
//! ```
//! use dpml::Dpml;
//!
//! let mut dpml = Dpml::from_text("size float = 70 cm\nsize = 1 m");
//! dpml.initialize().unwrap();
//! assert_eq!(dpml.data()["size"], dpml::Value::Float(100.0));
//! ```

/// Foundation types: errors, locations, reader/writer traits
pub mod base;

/// Data model: Node record, kinds, typed values
pub mod model;

/// Dimensional-units engine: registry, algebra, arbitrary units
pub mod units;

/// Line-oriented parser: blocks, escapes, scanner, classification
pub mod parser;

/// Interpreter: pipeline, imports, tables, expression evaluator
pub mod interp;

/// Template rendering and value formatting
pub mod render;

// Re-export the public surface
pub use base::{DpmlError, FsReader, Location, Result, SourceReader, SourceWriter};
pub use interp::{Dpml, MAX_IMPORT_DEPTH};
pub use model::{Array, DimBound, Node, NodeKind, Value};
pub use units::{Unit, UnitRegistry, convert};
