//! Document output for vidscribe.

mod docx;

pub use docx::DocxWriter;

use crate::error::Result;
use std::path::Path;

/// Trait for writers that persist a transcript as a document.
pub trait DocumentWriter: Send + Sync {
    /// Write a document with `heading` followed by `body` as one paragraph,
    /// replacing any existing file at `path`.
    fn write(&self, heading: &str, body: &str, path: &Path) -> Result<()>;
}
