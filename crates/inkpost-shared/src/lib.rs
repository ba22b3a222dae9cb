//! # Inkpost Shared
//!
//! Presentation types shared by the server's views and handlers.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
