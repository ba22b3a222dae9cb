//! pulldown-cmark configuration and the event adapters layered on it.

use std::collections::{HashSet, VecDeque};

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use serde::Serialize;

use super::slug::slugify;
use super::toc::{TocEntry, extract_toc_fragment, nest, render_toc_document};

/// Output of the detail-view render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBody {
    /// Body HTML; every heading carries an `id`.
    pub html: String,
    /// The full `<div class="toc">` document.
    pub toc_document: String,
    /// Inner list items of the TOC, or `""` when the body has no headings.
    pub toc: String,
}

impl RenderedBody {
    pub fn has_toc(&self) -> bool {
        !self.toc.is_empty()
    }
}

/// Markdown renderer for the "extra" syntax profile.
///
/// Tables, footnotes, strikethrough, task lists, definition lists and
/// `{#id .class}` heading attributes. Code blocks come out wrapped in
/// `div.codehilite` with a `language-*` class.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::extra()
    }
}

impl MarkdownRenderer {
    pub fn extra() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        options.insert(Options::ENABLE_DEFINITION_LIST);
        Self { options }
    }

    /// Render to HTML without heading anchors.
    pub fn render_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, CodeHilite::new(parser));
        out
    }

    /// Render to HTML with heading anchors and build the table of contents.
    pub fn render_with_toc(&self, markdown: &str) -> RenderedBody {
        let mut headings = Vec::new();
        let reserved = explicit_heading_ids(Parser::new_ext(markdown, self.options));
        let parser = Parser::new_ext(markdown, self.options);

        let mut body = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(
            &mut body,
            CodeHilite::new(HeadingAnchors::new(parser, reserved, &mut headings)),
        );

        let toc_document = render_toc_document(&nest(headings));
        let toc = extract_toc_fragment(&toc_document);

        RenderedBody {
            html: body,
            toc_document,
            toc,
        }
    }
}

/// Ids written as `{#id}` anywhere in the document. Generated slugs must
/// steer around these, even for headings that come first.
fn explicit_heading_ids<'a>(events: impl Iterator<Item = Event<'a>>) -> HashSet<String> {
    events
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
            _ => None,
        })
        .collect()
}

/// Assigns a unique `id` to every heading and records it for the TOC.
struct HeadingAnchors<'a, 'b, I> {
    inner: I,
    buffer: VecDeque<Event<'a>>,
    used_ids: HashSet<String>,
    headings: &'b mut Vec<TocEntry>,
}

impl<'a, 'b, I> HeadingAnchors<'a, 'b, I>
where
    I: Iterator<Item = Event<'a>>,
{
    fn new(inner: I, reserved: HashSet<String>, headings: &'b mut Vec<TocEntry>) -> Self {
        Self {
            inner,
            buffer: VecDeque::new(),
            used_ids: reserved,
            headings,
        }
    }

    /// `x`, then `x_1`, `x_2`, ... An empty slug starts at `_1`.
    fn unique_id(&mut self, slug: String) -> String {
        let mut candidate = slug;
        while candidate.is_empty() || self.used_ids.contains(&candidate) {
            candidate = bump_suffix(&candidate);
        }
        self.used_ids.insert(candidate.clone());
        candidate
    }
}

fn bump_suffix(id: &str) -> String {
    if let Some((stem, n)) = id.rsplit_once('_') {
        if let Some(next) = n.parse::<u64>().ok().and_then(|n| n.checked_add(1)) {
            return format!("{stem}_{next}");
        }
    }
    format!("{id}_1")
}

impl<'a, 'b, I> Iterator for HeadingAnchors<'a, 'b, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.buffer.pop_front() {
            return Some(event);
        }

        match self.inner.next()? {
            Event::Start(Tag::Heading {
                level,
                id,
                classes,
                attrs,
            }) => {
                let mut text = String::new();
                for event in self.inner.by_ref() {
                    let done = matches!(event, Event::End(TagEnd::Heading(_)));
                    if let Event::Text(t) | Event::Code(t) = &event {
                        text.push_str(t);
                    }
                    self.buffer.push_back(event);
                    if done {
                        break;
                    }
                }

                let id = match id {
                    Some(explicit) => explicit,
                    None => CowStr::from(self.unique_id(slugify(&text))),
                };

                self.headings
                    .push(TocEntry::new(level as u8, id.to_string(), text.trim()));

                Some(Event::Start(Tag::Heading {
                    level,
                    id: Some(id),
                    classes,
                    attrs,
                }))
            }
            event => Some(event),
        }
    }
}

/// Collapses each code block into one pre-rendered `div.codehilite` block.
struct CodeHilite<I> {
    inner: I,
}

impl<I> CodeHilite<I> {
    fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<'a, I> Iterator for CodeHilite<I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Event::Start(Tag::CodeBlock(kind)) => {
                let mut block = String::from(r#"<div class="codehilite"><pre><code"#);
                if let CodeBlockKind::Fenced(info) = &kind {
                    if let Some(lang) = info.split_whitespace().next() {
                        block.push_str(r#" class="language-"#);
                        escape_html(lang, &mut block);
                        block.push('"');
                    }
                }
                block.push('>');

                for event in self.inner.by_ref() {
                    match event {
                        Event::End(TagEnd::CodeBlock) => break,
                        Event::Text(text) => escape_html(&text, &mut block),
                        _ => {}
                    }
                }

                block.push_str("</code></pre></div>\n");
                Some(Event::Html(block.into()))
            }
            event => Some(event),
        }
    }
}

/// Same escaping the pulldown-cmark HTML writer applies.
pub(crate) fn escape_html(text: &str, out: &mut String) {
    let _ = pulldown_cmark_escape::escape_html(&mut *out, text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> RenderedBody {
        MarkdownRenderer::extra().render_with_toc(markdown)
    }

    #[test]
    fn test_duplicate_headings_get_suffixes() {
        let rendered = render("# Setup\n\n# Setup\n\n# Setup\n");

        assert!(rendered.html.contains(r#"<h1 id="setup">"#));
        assert!(rendered.html.contains(r#"<h1 id="setup_1">"#));
        assert!(rendered.html.contains(r#"<h1 id="setup_2">"#));
        assert!(rendered.toc.contains(r##"href="#setup_2""##));
    }

    #[test]
    fn test_headings_without_slug_characters() {
        let rendered = render("# 你好\n\n## 世界\n");

        assert!(rendered.html.contains(r#"<h1 id="_1">你好</h1>"#));
        assert!(rendered.html.contains(r#"<h2 id="_2">世界</h2>"#));
        assert!(rendered.toc.contains(r##"<a href="#_1">你好</a>"##));
    }

    #[test]
    fn test_explicit_heading_id_wins() {
        let rendered = render("## Install {#setup}\n\n## Setup\n");

        assert!(rendered.html.contains(r#"id="setup""#));
        assert!(rendered.html.contains(r#"id="setup_1""#));
        assert!(rendered.toc.contains(r##"<a href="#setup">Install</a>"##));
    }

    #[test]
    fn test_generated_slug_avoids_later_explicit_id() {
        let rendered = render("# Setup\n\n## Other {#setup}\n");

        assert!(rendered.html.contains(r#"<h1 id="setup_1">Setup</h1>"#));
        assert!(rendered.html.contains(r#"<h2 id="setup">Other</h2>"#));
        assert_eq!(rendered.html.matches(r#"id="setup""#).count(), 1);
        assert!(rendered.toc.contains(r##"<a href="#setup_1">Setup</a>"##));
    }

    #[test]
    fn test_duplicate_headings_with_huge_numeric_suffix() {
        let rendered = render("# a_4294967295\n\n# a_4294967295\n");

        assert!(rendered.html.contains(r#"<h1 id="a_4294967295">"#));
        assert!(rendered.html.contains(r#"<h1 id="a_4294967296">"#));
    }

    #[test]
    fn test_accented_heading_slug() {
        let rendered = render("# Café résumé\n");

        assert!(rendered.html.contains(r#"<h1 id="cafe-resume">Café résumé</h1>"#));
        assert!(rendered.toc.contains(r##"<a href="#cafe-resume">"##));
    }

    #[test]
    fn test_heading_name_drops_inline_markup() {
        let rendered = render("## The `render` *function*\n");

        assert!(rendered.html.contains(r#"id="the-render-function""#));
        assert!(rendered.html.contains("<code>render</code>"));
        assert!(
            rendered
                .toc
                .contains(r##"<a href="#the-render-function">The render function</a>"##)
        );
    }

    #[test]
    fn test_code_blocks_get_highlight_markup() {
        let html = MarkdownRenderer::extra().render_html("```rust\nlet x = a < b;\n```\n");

        assert_eq!(
            html,
            "<div class=\"codehilite\"><pre><code class=\"language-rust\">let x = a &lt; b;\n</code></pre></div>\n"
        );
    }

    #[test]
    fn test_indented_code_has_no_language() {
        let html = MarkdownRenderer::extra().render_html("    plain\n");
        assert!(html.starts_with("<div class=\"codehilite\"><pre><code>plain"));
    }

    #[test]
    fn test_extra_profile_features() {
        let html = MarkdownRenderer::extra()
            .render_html("| a | b |\n|---|---|\n| 1 | 2 |\n\nNote[^n].\n\n[^n]: Footnote.\n");

        assert!(html.contains("<table>"));
        assert!(html.contains("footnote"));
    }

    #[test]
    fn test_headings_inside_code_are_not_anchored() {
        let rendered = render("```\n# not a heading\n```\n");
        assert_eq!(rendered.toc, "");
    }

    #[test]
    fn test_bump_suffix() {
        assert_eq!(bump_suffix("x"), "x_1");
        assert_eq!(bump_suffix("x_1"), "x_2");
        assert_eq!(bump_suffix("snake_case"), "snake_case_1");
        assert_eq!(bump_suffix(""), "_1");
        assert_eq!(bump_suffix("x_4294967295"), "x_4294967296");
        assert_eq!(bump_suffix(&format!("x_{}", u64::MAX)), format!("x_{}_1", u64::MAX));
    }
}
