//! Word (.docx) output using docx-rs.

use super::DocumentWriter;
use crate::error::{Result, VidscribeError};
use docx_rs::{BreakType, Docx, Paragraph, Run, Style, StyleType};
use std::fs::File;
use std::path::Path;
use tracing::{debug, instrument};

const TITLE_STYLE: &str = "Title";

/// Title font size in half-points.
const TITLE_SIZE: usize = 56;

/// Writes transcripts as Word documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxWriter;

impl DocxWriter {
    pub fn new() -> Self {
        Self
    }

    fn build(heading: &str, body: &str) -> Docx {
        let title = Paragraph::new()
            .style(TITLE_STYLE)
            .add_run(Run::new().add_text(heading));

        Docx::new()
            .add_style(
                Style::new(TITLE_STYLE, StyleType::Paragraph)
                    .name(TITLE_STYLE)
                    .size(TITLE_SIZE),
            )
            .add_paragraph(title)
            .add_paragraph(Paragraph::new().add_run(body_run(body)))
    }
}

/// One run holding the whole transcript; embedded newlines become line breaks
/// so the text stays a single paragraph.
fn body_run(body: &str) -> Run {
    let mut run = Run::new();
    for (i, line) in body.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    run
}

impl DocumentWriter for DocxWriter {
    #[instrument(skip(self, heading, body), fields(path = %path.display(), chars = body.len()))]
    fn write(&self, heading: &str, body: &str, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| {
            VidscribeError::DocumentSave(format!("cannot create {}: {}", path.display(), e))
        })?;

        if let Err(e) = Self::build(heading, body).build().pack(file) {
            let _ = std::fs::remove_file(path);
            return Err(VidscribeError::DocumentSave(format!(
                "cannot write {}: {}",
                path.display(),
                e
            )));
        }

        debug!("Document written");
        Ok(())
    }
}
