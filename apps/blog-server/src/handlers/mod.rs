//! HTTP handlers and route configuration.

mod blog;
mod health;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(blog::index))
        .route("/posts/{id}", web::get().to(blog::detail))
        .route("/archives/{year}/{month}", web::get().to(blog::archive))
        .route("/categories/{id}", web::get().to(blog::category))
        .route("/tags/{id}", web::get().to(blog::tag))
        .service(web::scope("/api").route("/health", web::get().to(health::health_check)));
}
