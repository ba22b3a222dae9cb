//! Table of contents: nesting, the wrapper document, and fragment extraction.

use serde::Serialize;

use super::render::escape_html;

const TOC_OPEN: &str = r#"<div class="toc">"#;
const TOC_CLOSE: &str = "</div>";
const LIST_OPEN: &str = "<ul>";
const LIST_CLOSE: &str = "</ul>";

/// One heading in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub name: String,
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    pub fn new(level: u8, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            level,
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }
}

/// Nest headings in document order by level.
///
/// A heading becomes a child of the closest preceding heading with a
/// strictly smaller level. Skipped levels (h1 followed by h3) nest directly.
pub fn nest(headings: Vec<TocEntry>) -> Vec<TocEntry> {
    let mut roots: Vec<TocEntry> = Vec::new();
    let mut open: Vec<TocEntry> = Vec::new();

    for heading in headings {
        while open.last().is_some_and(|top| top.level >= heading.level) {
            close_top(&mut open, &mut roots);
        }
        open.push(heading);
    }
    while !open.is_empty() {
        close_top(&mut open, &mut roots);
    }

    roots
}

fn close_top(open: &mut Vec<TocEntry>, roots: &mut Vec<TocEntry>) {
    if let Some(done) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// Render the full TOC document: a `div.toc` wrapping a single list.
pub fn render_toc_document(entries: &[TocEntry]) -> String {
    let mut out = String::new();
    out.push_str(TOC_OPEN);
    out.push('\n');
    out.push_str(LIST_OPEN);
    out.push('\n');
    render_items(entries, &mut out);
    out.push_str(LIST_CLOSE);
    out.push('\n');
    out.push_str(TOC_CLOSE);
    out.push('\n');
    out
}

fn render_items(entries: &[TocEntry], out: &mut String) {
    for entry in entries {
        out.push_str("<li><a href=\"#");
        escape_html(&entry.id, out);
        out.push_str("\">");
        escape_html(&entry.name, out);
        out.push_str("</a>");
        if !entry.children.is_empty() {
            out.push('\n');
            out.push_str(LIST_OPEN);
            out.push('\n');
            render_items(&entry.children, out);
            out.push_str(LIST_CLOSE);
            out.push('\n');
        }
        out.push_str("</li>\n");
    }
}

/// Pull the inner list items out of a TOC document.
///
/// The document must be a `<div class="toc">` holding one `<ul>`; whitespace
/// around the tags is tolerated. Anything else, including an empty list,
/// yields an empty string.
pub fn extract_toc_fragment(document: &str) -> String {
    inner_list(document)
        .map(|items| items.trim().to_string())
        .unwrap_or_default()
}

fn inner_list(document: &str) -> Option<&str> {
    let rest = document
        .trim()
        .strip_prefix(TOC_OPEN)?
        .trim_start()
        .strip_prefix(LIST_OPEN)?;

    rest.strip_suffix(TOC_CLOSE)?
        .trim_end()
        .strip_suffix(LIST_CLOSE)
}
