use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tera::{Context, Tera};
use tracing::error;

const INDEX_TEMPLATE: &str = "index.html";

#[derive(Clone)]
pub struct PagesState {
    templates: Arc<Tera>,
}

fn init_templates() -> Arc<Tera> {
    let mut tera = Tera::default();
    if let Err(error) =
        tera.add_raw_template(INDEX_TEMPLATE, include_str!("../../../templates/index.html"))
    {
        error!(
            event_name = "system.pages.template_error",
            correlation_id = "bootstrap",
            error = %error,
            "landing page template failed to compile"
        );
    }
    Arc::new(tera)
}

pub fn router() -> Router {
    Router::new().route("/", get(index)).with_state(PagesState { templates: init_templates() })
}

pub async fn index(State(state): State<PagesState>) -> Response {
    let mut context = Context::new();
    context.insert("title", "Sistema de Comisiones");
    context.insert("version", env!("CARGO_PKG_VERSION"));

    match state.templates.render(INDEX_TEMPLATE, &context) {
        Ok(html) => Html(html).into_response(),
        Err(error) => {
            error!(
                event_name = "system.pages.render_error",
                correlation_id = "landing",
                error = %error,
                "landing page render failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected internal error occurred.")
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::router;

    #[tokio::test]
    async fn landing_page_renders_filter_and_sale_forms() {
        let response = router()
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let html = String::from_utf8(bytes.to_vec()).expect("utf-8 page");

        assert!(html.contains("<title>Sistema de Comisiones</title>"));
        assert!(html.contains("id=\"filtrarBtn\""));
        assert!(html.contains("id=\"formNuevaVenta\""));
        assert!(html.contains("/static/app.js"));
    }
}
