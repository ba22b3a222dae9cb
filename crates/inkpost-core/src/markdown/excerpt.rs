//! Plain-text excerpts derived from rendered HTML.

/// Maximum excerpt length, in characters.
pub const EXCERPT_LENGTH: usize = 54;

/// Strip tags, fold whitespace and keep the first [`EXCERPT_LENGTH`] chars.
///
/// The cut is a raw character slice and may land mid-word. Entities stay
/// exactly as the renderer escaped them.
pub fn excerpt_from_html(html: &str) -> String {
    let text = strip_tags(html);
    let folded = text.split_whitespace().collect::<Vec<_>>().join(" ");
    folded.chars().take(EXCERPT_LENGTH).collect()
}

/// Remove every tag and comment from an HTML string.
///
/// An unterminated tag swallows the rest of the input, so the output never
/// contains a `<`.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let tail = &rest[start..];
        let end = if tail.starts_with("<!--") {
            tail.find("-->").map(|i| i + 3)
        } else {
            tail.find('>').map(|i| i + 1)
        };
        rest = match end {
            Some(end) => &tail[end..],
            None => "",
        };
    }
    text.push_str(rest);

    // A stray '>' can only come from raw HTML the renderer passed through.
    text.retain(|c| c != '>');
    text
}
