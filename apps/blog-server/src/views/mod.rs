//! HTML rendering - embedded minijinja templates and view-model conversion.

mod convert;

use std::sync::LazyLock;

use minijinja::Environment;
use serde::Serialize;

use inkpost_shared::ErrorResponse;

pub use convert::{post_page, sidebar_view, summaries};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("detail.html", include_str!("../../templates/detail.html")),
    ("error.html", include_str!("../../templates/error.html")),
];

static ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    for &(name, source) in TEMPLATES {
        if let Err(err) = env.add_template(name, source) {
            tracing::error!(template = name, error = %err, "Template failed to compile");
        }
    }
    env
});

/// Render a named template. Autoescaping is on for every `.html` template.
pub fn render<S: Serialize>(name: &str, ctx: S) -> Result<String, minijinja::Error> {
    ENV.get_template(name)?.render(ctx)
}

/// Render an error page, falling back to a bare page if the template fails.
pub fn render_error(error: &ErrorResponse) -> String {
    render("error.html", minijinja::context! { error => error }).unwrap_or_else(|err| {
        tracing::error!(error = %err, "Error page failed to render");
        format!("<h1>{} {}</h1>", error.status, error.title)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_compile() {
        for (name, _) in TEMPLATES {
            assert!(ENV.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_error_page_escapes_detail() {
        let page = render_error(&ErrorResponse::not_found("<script>x</script>"));

        assert!(page.contains("404 Not Found"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>x"));
    }
}
