//! Observability - request IDs on top of `tracing-actix-web`.

mod request_id;

pub use request_id::RequestIdMiddleware;
