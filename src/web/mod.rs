//! HTTP surface.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /` | Submission form |
//! | `POST /create` | Multipart submission; `303` to the preview, `422` with the form on a validation error |
//! | `GET /preview/{slug}` | Preview page framing the site; `404` when the site does not exist |
//! | `GET /sites/{slug}/{*path}` | Files of a generated site; `400` on traversal, `404` when missing |
//! | `GET /download/{slug}` | The site as `<slug>_microsite.zip` |
//!
//! Generation and file access are blocking and run on tokio's blocking pool.
//! The request still waits for them to finish.

mod handlers;
mod pages;

use crate::app::Microsites;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(app: Arc<Microsites>) -> Router {
    let body_limit = app.config().server.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::index))
        .route("/create", post(handlers::create))
        .route("/preview/{slug}", get(handlers::preview))
        .route("/sites/{slug}", get(handlers::site_redirect))
        .route("/sites/{slug}/", get(handlers::site_root))
        .route("/sites/{slug}/{*path}", get(handlers::site_file))
        .route("/download/{slug}", get(handlers::download))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}

/// Bind the configured address and serve until the process exits.
pub async fn serve(app: Arc<Microsites>) -> std::io::Result<()> {
    let address = app.config().server.address();
    let listener = TcpListener::bind(&address).await?;
    info!(address = %address, "listening");
    axum::serve(listener, router(app)).await
}
