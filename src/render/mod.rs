//! Template rendering and value formatting.

mod format;
mod template;

pub use format::{format_exponential, format_with_spec};
pub use template::render_template;
