//! Markdown pipeline.
//!
//! Two pure entry points sit on top of a single [`MarkdownRenderer`]:
//!
//! - [`render_excerpt`] runs whenever a post is saved and yields the
//!   plain-text excerpt stored next to the body.
//! - [`render_with_toc`] runs on the detail view and yields the body HTML
//!   with anchored headings plus the table-of-contents fragment.
//!
//! Neither function can fail. Malformed input degrades to partial or empty
//! output.

mod excerpt;
mod render;
mod slug;
mod toc;

pub use excerpt::{EXCERPT_LENGTH, excerpt_from_html, strip_tags};
pub use render::{MarkdownRenderer, RenderedBody};
pub use slug::slugify;
pub use toc::{TocEntry, extract_toc_fragment, render_toc_document};

/// Derive the stored excerpt for a Markdown body.
pub fn render_excerpt(markdown: &str) -> String {
    excerpt_from_html(&MarkdownRenderer::extra().render_html(markdown))
}

/// Render a Markdown body for display, with heading anchors and its TOC.
pub fn render_with_toc(markdown: &str) -> RenderedBody {
    MarkdownRenderer::extra().render_with_toc(markdown)
}
