//! HTTP interface over the persisted crawl result.
//!
//! | Route       | Response                                             |
//! |-------------|------------------------------------------------------|
//! | `/`         | the landing page HTML                                |
//! | `/articles` | the persisted JSON file, byte for byte               |
//!
//! Both files are read on every request so a fresh crawl is visible without
//! a restart.

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use std::error::Error;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Files the routes serve.
#[derive(Debug, Clone)]
pub struct AppState {
    pub articles_path: PathBuf,
    pub landing_page: PathBuf,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/articles", get(articles))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> Result<(), Box<dyn Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn landing_page(State(state): State<Arc<AppState>>) -> Response {
    match fs::read_to_string(&state.landing_page).await {
        Ok(html) => Html(html).into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %state.landing_page.display(), "Landing page missing");
            (StatusCode::NOT_FOUND, "Landing page not found.").into_response()
        }
        Err(e) => {
            error!(path = %state.landing_page.display(), error = %e, "Failed to read landing page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server Error reading landing page.",
            )
                .into_response()
        }
    }
}

async fn articles(State(state): State<Arc<AppState>>) -> Response {
    match fs::read(&state.articles_path).await {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            "Articles data not found. Please run the scraper first.",
        )
            .into_response(),
        Err(e) => {
            error!(path = %state.articles_path.display(), error = %e, "Error reading articles file");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server Error reading articles data.",
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state_in(dir: &TempDir) -> AppState {
        AppState {
            articles_path: dir.path().join("articles.json"),
            landing_page: dir.path().join("index.html"),
        }
    }

    async fn send_get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_articles_served_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        let json = "[\n  {\n    \"title\": \"A\",\n    \"link\": \"https://site/a\",\n    \"date\": null\n  }\n]";
        fs::write(&state.articles_path, json).await.unwrap();

        let (status, content_type, body) = send_get(router(state), "/articles").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, json);
    }

    #[tokio::test]
    async fn test_articles_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let (status, _, body) = send_get(router(state_in(&dir)), "/articles").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Articles data not found. Please run the scraper first.");
    }

    #[tokio::test]
    async fn test_articles_read_error_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        // A directory where the file should be makes the read fail with something other than NotFound.
        fs::create_dir(&state.articles_path).await.unwrap();

        let (status, _, body) = send_get(router(state), "/articles").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Server Error reading articles data.");
    }

    #[tokio::test]
    async fn test_landing_page() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_in(&dir);
        fs::write(&state.landing_page, "<h1>Articles</h1>").await.unwrap();

        let (status, content_type, body) = send_get(router(state), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert_eq!(body, "<h1>Articles</h1>");
    }

    #[tokio::test]
    async fn test_landing_page_missing() {
        let dir = tempfile::tempdir().unwrap();

        let (status, _, _) = send_get(router(state_in(&dir)), "/").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
