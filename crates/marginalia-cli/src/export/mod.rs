//! Rendering of pipeline results as text.

mod bullet;
mod clippings;
mod markdown;

pub use bullet::BulletExporter;
pub use clippings::ClippingsExporter;
pub use markdown::MarkdownExporter;

use crate::config::ExportFormat;
use marginalia_extractor::PipelineResult;

/// Renders annotated books as a document.
pub trait Exporter {
    /// Render every book of `result`, in order.
    fn render(&self, result: &PipelineResult) -> String;
}

/// Get the exporter for a format.
pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Markdown => Box::new(MarkdownExporter),
        ExportFormat::Bullet => Box::new(BulletExporter),
        ExportFormat::Default => Box::new(ClippingsExporter),
    }
}

/// Indent every line after the first so multi-line passages stay inside
/// their list item.
pub(crate) fn indent_continuation(text: &str, indent: &str) -> String {
    text.lines()
        .collect::<Vec<_>>()
        .join(&format!("\n{}", indent))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exporter_for_each_format() {
        let result = fixtures::sample_result();

        let markdown = exporter_for(ExportFormat::Markdown).render(&result);
        assert!(markdown.starts_with("# Dune (Herbert, Frank)"));

        let bullet = exporter_for(ExportFormat::Bullet).render(&result);
        assert!(bullet.starts_with("=========== Dune (Herbert, Frank) ==========="));

        let clippings = exporter_for(ExportFormat::Default).render(&result);
        assert!(clippings.starts_with("Dune (Herbert, Frank)\n- Your Highlight"));
    }

    #[test]
    fn test_indent_continuation() {
        assert_eq!(indent_continuation("one\ntwo\nthree", "  "), "one\n  two\n  three");
        assert_eq!(indent_continuation("single", "  "), "single");
    }
}
