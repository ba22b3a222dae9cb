//! Blog pages: listings, detail, archive, category and tag views.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use inkpost_core::service::PostView;
use minijinja::context;
use uuid::Uuid;

use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::views;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}

async fn listing(
    state: &AppState,
    heading: Option<String>,
    posts: &[PostView],
) -> AppResult<HttpResponse> {
    let sidebar = state.blog.sidebar().await?;
    let body = views::render(
        "index.html",
        context! {
            sidebar => views::sidebar_view(&sidebar),
            heading => heading,
            posts => views::summaries(posts),
        },
    )?;
    Ok(html(body))
}

/// GET /
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.blog.list_posts().await?;
    listing(&state, None, &posts).await
}

/// GET /posts/{id}
pub async fn detail(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let detail = state.blog.post_detail(path.into_inner()).await?;
    let sidebar = state.blog.sidebar().await?;
    let body = views::render(
        "detail.html",
        context! {
            sidebar => views::sidebar_view(&sidebar),
            page => views::post_page(detail),
        },
    )?;
    Ok(html(body))
}

/// GET /archives/{year}/{month}
pub async fn archive(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32)>,
) -> AppResult<HttpResponse> {
    let (year, month) = path.into_inner();
    let posts = state.blog.archive(year, month).await?;
    listing(&state, Some(format!("Archive {year:04}-{month:02}")), &posts).await
}

/// GET /categories/{id}
pub async fn category(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let (category, posts) = state.blog.posts_in_category(path.into_inner()).await?;
    listing(&state, Some(format!("Category: {}", category.name)), &posts).await
}

/// GET /tags/{id}
pub async fn tag(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let (tag, posts) = state.blog.posts_with_tag(path.into_inner()).await?;
    listing(&state, Some(format!("Tag: {}", tag.name)), &posts).await
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{Datelike, Utc};
    use inkpost_core::domain::Post;

    use super::*;
    use crate::handlers::configure_routes;

    async fn seeded() -> (AppState, Post) {
        let state = AppState::in_memory();
        let post = state.seed_demo_content().await.unwrap();
        (state, post)
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    async fn get_body(state: &AppState, uri: &str) -> String {
        let app = app!(state);
        let req = test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
        String::from_utf8(test::read_body(res).await.to_vec()).unwrap()
    }

    async fn get_status(state: &AppState, uri: &str) -> StatusCode {
        let app = app!(state);
        let req = test::TestRequest::get().uri(uri).to_request();
        test::call_service(&app, req).await.status()
    }

    #[actix_web::test]
    async fn test_index_lists_posts_with_sidebar() {
        let (state, post) = seeded().await;

        let body = get_body(&state, "/").await;

        assert!(body.contains(&format!("href=\"/posts/{}\"", post.id)));
        assert!(body.contains(&post.excerpt));
        assert!(body.contains("General"));
        assert!(body.contains("welcome"));
    }

    #[actix_web::test]
    async fn test_empty_index() {
        let body = get_body(&AppState::in_memory(), "/").await;
        assert!(body.contains("No posts yet."));
    }

    #[actix_web::test]
    async fn test_detail_renders_body_and_toc() {
        let (state, post) = seeded().await;

        let body = get_body(&state, &format!("/posts/{}", post.id)).await;

        assert!(body.contains("<h2 id=\"code\">Code</h2>"));
        assert!(body.contains("<a href=\"#code\">Code</a>"));
        assert!(body.contains("class=\"codehilite\""));
        assert!(body.contains("<section class=\"widget toc\">"));
    }

    #[actix_web::test]
    async fn test_detail_without_headings_has_no_toc() {
        let state = AppState::in_memory();
        let seeded = state.seed_demo_content().await.unwrap();
        let plain = Post::new("Plain", "Just text.", seeded.category_id, seeded.author_id);
        let plain = state.blog.save_post(plain).await.unwrap();

        let body = get_body(&state, &format!("/posts/{}", plain.id)).await;

        assert!(body.contains("Just text."));
        assert!(!body.contains("<section class=\"widget toc\">"));
    }

    #[actix_web::test]
    async fn test_unknown_post_is_not_found() {
        let (state, _) = seeded().await;

        let status = get_status(&state, &format!("/posts/{}", Uuid::new_v4())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let status = get_status(&state, "/posts/not-a-uuid").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_archive_month() {
        let (state, post) = seeded().await;
        let now = Utc::now();

        let body = get_body(&state, &format!("/archives/{}/{}", now.year(), now.month())).await;
        assert!(body.contains(&format!("href=\"/posts/{}\"", post.id)));

        let status = get_status(&state, "/archives/2020/13").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_category_and_tag_pages() {
        let (state, post) = seeded().await;

        let body = get_body(&state, &format!("/categories/{}", post.category_id)).await;
        assert!(body.contains("Category: General"));
        assert!(body.contains(&post.title));

        let body = get_body(&state, &format!("/tags/{}", post.tag_ids[0])).await;
        assert!(body.contains("Tag: welcome"));

        let status = get_status(&state, &format!("/categories/{}", Uuid::new_v4())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let status = get_status(&state, &format!("/tags/{}", Uuid::new_v4())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_health() {
        let state = AppState::in_memory();
        let app = app!(state);
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["storage"], "in-memory");
    }
}
