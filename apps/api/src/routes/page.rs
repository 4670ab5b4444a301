use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
/// The foreman desk form. Static; all behaviour lives behind the JSON API.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
