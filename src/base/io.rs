//! Reader/writer seams.
//!
//! The core never touches the filesystem directly: imports and template
//! loads go through [`SourceReader`], rendered output through
//! [`SourceWriter`]. [`FsReader`] is the `std::fs` implementation used by
//! default.

use super::error::{DpmlError, Result};

/// Supplies file contents for `load`, imports and template files.
pub trait SourceReader {
    fn read(&self, path: &str) -> Result<String>;
}

/// Persists rendered template output.
pub trait SourceWriter {
    fn write(&self, path: &str, content: &str) -> Result<()>;
}

/// Filesystem-backed reader/writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read(&self, path: &str) -> Result<String> {
        std::fs::read_to_string(path).map_err(|source| DpmlError::Read {
            path: path.to_string(),
            source,
        })
    }
}

impl SourceWriter for FsReader {
    fn write(&self, path: &str, content: &str) -> Result<()> {
        std::fs::write(path, content).map_err(|source| DpmlError::Write {
            path: path.to_string(),
            source,
        })
    }
}
