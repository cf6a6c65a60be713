use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use notify::{Event, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_livereload::LiveReloadLayer;

use crate::assistant::{Assistant, CompletionBackend};

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssistantReply {
    pub reply: String,
}

async fn ask<B: CompletionBackend + 'static>(
    State(assistant): State<Arc<Assistant<B>>>,
    Json(request): Json<AssistantRequest>,
) -> Json<AssistantReply> {
    tracing::debug!(chars = request.message.len(), "assistant request");
    let reply = assistant.respond(&request.message).await;
    Json(AssistantReply { reply })
}

/// The assistant endpoint plus the built site as fallback
pub fn router<B: CompletionBackend + 'static>(site: &Path, assistant: Arc<Assistant<B>>) -> Router {
    Router::new()
        .route("/api/assistant", post(ask::<B>))
        .with_state(assistant)
        .fallback_service(ServeDir::new(site))
}

/// Start the development server with live reload
pub async fn serve<B: CompletionBackend + 'static>(
    site: &Path,
    assistant: Assistant<B>,
    port: u16,
) -> anyhow::Result<()> {
    if !site.is_dir() {
        anyhow::bail!("site directory {} does not exist", site.display());
    }
    if !assistant.is_configured() {
        tracing::warn!("assistant has no backend; /api/assistant will report a configuration error");
    }

    let livereload = LiveReloadLayer::new();
    let reloader = livereload.reloader();

    // Reload the browser whenever the built site changes
    let mut site_watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() || event.kind.is_create() || event.kind.is_remove() {
                reloader.reload();
            }
        }
    })?;
    site_watcher.watch(site, RecursiveMode::Recursive)?;

    let app = router(site, Arc::new(assistant)).layer(livereload);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(port, site = %site.display(), "development server running at http://localhost:{port}");
    println!("Press Ctrl+C to stop");

    // Keep watcher alive
    let _site_watcher = site_watcher;

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::tests::CannedBackend;
    use crate::assistant::{CONNECTION_LOST_REPLY, MISSING_KEY_REPLY};
    use crate::resume::tests::sample;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn post_message(message: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/assistant")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "message": message }).to_string()))
            .unwrap()
    }

    async fn reply_of(app: Router, message: &str) -> (StatusCode, AssistantReply) {
        let response = app.oneshot(post_message(message)).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn assistant_endpoint_returns_reply() {
        let site = tempfile::tempdir().unwrap();
        let assistant = Assistant::new(&sample(), Some(CannedBackend::ok("Hello."))).unwrap();
        let app = router(site.path(), Arc::new(assistant));

        let (status, body) = reply_of(app, "Who are you?").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.reply, "Hello.");
    }

    #[tokio::test]
    async fn backend_failure_is_still_ok() {
        let site = tempfile::tempdir().unwrap();
        let assistant = Assistant::new(&sample(), Some(CannedBackend::failing())).unwrap();
        let app = router(site.path(), Arc::new(assistant));

        let (status, body) = reply_of(app, "hi").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.reply, CONNECTION_LOST_REPLY);
    }

    #[tokio::test]
    async fn missing_backend_reports_configuration_error() {
        let site = tempfile::tempdir().unwrap();
        let assistant = Assistant::<CannedBackend>::new(&sample(), None).unwrap();
        let app = router(site.path(), Arc::new(assistant));

        let (_, body) = reply_of(app, "hi").await;
        assert_eq!(body.reply, MISSING_KEY_REPLY);
    }

    #[tokio::test]
    async fn site_files_are_served() {
        let site = tempfile::tempdir().unwrap();
        std::fs::write(site.path().join("index.html"), "<h1>station</h1>").unwrap();
        let assistant = Assistant::<CannedBackend>::new(&sample(), None).unwrap();
        let app = router(site.path(), Arc::new(assistant));

        let response = app
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>station</h1>");
    }

    #[tokio::test]
    async fn serve_rejects_missing_site() {
        let assistant = Assistant::<CannedBackend>::new(&sample(), None).unwrap();
        let err = serve(Path::new("/nonexistent/site"), assistant, 0).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
