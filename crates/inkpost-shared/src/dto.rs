//! View models - what the HTML templates are rendered from.

use serde::{Deserialize, Serialize};

/// A named link target (category, tag, author).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedLink {
    pub id: String,
    pub name: String,
}

/// One entry in a post listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub created_at: String,
    pub modified_at: String,
    pub category: Option<NamedLink>,
    pub author: Option<String>,
    pub tags: Vec<NamedLink>,
}

/// The detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    pub summary: PostSummary,
    /// Rendered body HTML.
    pub body_html: String,
    /// TOC list items; empty when the post has no headings.
    pub toc_html: String,
}

/// A month in the archive widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveLink {
    pub year: i32,
    pub month: u32,
    /// `YYYY-MM`.
    pub label: String,
}

/// Sidebar widgets shown on every page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SidebarView {
    pub recent_posts: Vec<NamedLink>,
    pub archives: Vec<ArchiveLink>,
    pub categories: Vec<NamedLink>,
    pub tags: Vec<NamedLink>,
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    pub timestamp: String,
}
