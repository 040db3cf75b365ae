use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod state;
pub mod ui;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(ui::index))
        .route("/manifest.json", get(ui::manifest))
        .route("/api/feed", get(handlers::get_feed))
        .route("/api/tts", post(handlers::text_to_speech))
        .route("/api/archive", post(handlers::archive))
        .route("/api/delete", post(handlers::delete))
        .route("/api/later", post(handlers::later))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found") })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serve `app` until the process is interrupted.
pub async fn serve(app: Router, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🎧 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

pub mod prelude {
    pub use ra_core::{Error, FeedResponse, Result, Scope};
    pub use crate::{create_app, AppState};
}
