//! Domain types to view models.

use chrono::{DateTime, Utc};

use inkpost_core::service::{PostDetail, PostView, Sidebar};
use inkpost_shared::dto::{ArchiveLink, NamedLink, PostPage, PostSummary, SidebarView};

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn link(id: uuid::Uuid, name: &str) -> NamedLink {
    NamedLink {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn summary(view: &PostView) -> PostSummary {
    let post = &view.post;
    PostSummary {
        id: post.id.to_string(),
        title: post.title.clone(),
        excerpt: post.excerpt.clone(),
        created_at: timestamp(&post.created_at),
        modified_at: timestamp(&post.modified_at),
        category: view.category.as_ref().map(|c| link(c.id, &c.name)),
        author: view.author.as_ref().map(|a| a.username.clone()),
        tags: view.tags.iter().map(|t| link(t.id, &t.name)).collect(),
    }
}

pub fn summaries(views: &[PostView]) -> Vec<PostSummary> {
    views.iter().map(summary).collect()
}

pub fn post_page(detail: PostDetail) -> PostPage {
    PostPage {
        summary: summary(&detail.view),
        body_html: detail.rendered.html,
        toc_html: detail.rendered.toc,
    }
}

pub fn sidebar_view(sidebar: &Sidebar) -> SidebarView {
    SidebarView {
        recent_posts: sidebar
            .recent_posts
            .iter()
            .map(|p| link(p.id, &p.title))
            .collect(),
        archives: sidebar
            .archive_months
            .iter()
            .map(|m| ArchiveLink {
                year: m.year,
                month: m.month,
                label: format!("{:04}-{:02}", m.year, m.month),
            })
            .collect(),
        categories: sidebar
            .categories
            .iter()
            .map(|c| link(c.id, &c.name))
            .collect(),
        tags: sidebar.tags.iter().map(|t| link(t.id, &t.name)).collect(),
    }
}
