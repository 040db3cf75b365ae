use axum::{http::header, response::{Html, IntoResponse}};

const INDEX_HTML: &str = include_str!("../assets/index.html");
const MANIFEST_JSON: &str = include_str!("../assets/manifest.json");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn manifest() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/manifest+json")], MANIFEST_JSON)
}
