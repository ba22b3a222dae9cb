//! Heading slugs.

use unicode_normalization::UnicodeNormalization;

/// Turn heading text into a URL-safe anchor id.
///
/// NFKD-decomposes first so accented letters keep their base letter. Then
/// lowercases, keeps ASCII alphanumerics and `_`, folds whitespace and `-`
/// runs into a single `-`, and drops everything else. Leading and trailing
/// `-`/`_` are trimmed. The result may be empty.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.nfkd().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}
