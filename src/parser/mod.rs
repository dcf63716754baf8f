//! Line-oriented parser: escape encoding, block folding, the left-to-right
//! line scanner and node classification.
//!
//! ```text
//! Source text
//!     ↓ split into RawLines
//! fold_blocks  → triple-quoted blocks merged into single logical lines
//!     ↓ encode  (escaped quotes / newlines → opaque markers)
//! LineScanner  → structural fields of one line
//!     ↓
//! classify_line → Node variant (decode markers back)
//! ```

mod blocks;
mod classify;
mod escape;
mod line;

pub use blocks::{RawLine, fold_blocks};
pub use classify::classify_line;
pub use escape::{decode, encode};
pub use line::LineScanner;
