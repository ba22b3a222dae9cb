//! # Inkpost Core
//!
//! The domain layer of the Inkpost blog.
//! Entities, repository ports, the Markdown pipeline and the blog service.
//! Nothing in here performs I/O on its own.

pub mod domain;
pub mod error;
pub mod markdown;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::BlogService;
