//! Application services - orchestrate ports and the Markdown pipeline.

mod blog_service;

pub use blog_service::{BlogService, PostDetail, PostView, RECENT_POSTS, Sidebar};
