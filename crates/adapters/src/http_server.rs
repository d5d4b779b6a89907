//! Embedded HTTP server.
//!
//! Hosts a [`WebContext`] behind an axum router whose fallback funnels
//! every request through the Melt dispatcher, the way the original
//! framework mounts one front servlet at `/*`.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use melt_web::WebContext;

use crate::dispatch::{dispatch, DispatchState};

/// Maximum request body size in bytes (1MB)
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration for the embedded HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the server binds to
    pub addr: SocketAddr,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}

/// Embedded HTTP server hosting a web application.
pub struct HttpServer {
    config: ServerConfig,
    context: Arc<WebContext>,
}

impl HttpServer {
    /// Create a server for the given web context.
    pub fn new(config: ServerConfig, context: Arc<WebContext>) -> Self {
        Self { config, context }
    }

    /// Access the configuration associated with this server.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the axum router; every request falls through to the
    /// Melt dispatcher.
    pub fn router(&self) -> Router {
        Router::new().fallback(dispatch).with_state(DispatchState {
            context: Arc::clone(&self.context),
            max_body_bytes: self.config.max_body_bytes,
        })
    }

    /// Bind and serve until the shutdown future resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.config.addr))?;
        let addr = listener
            .local_addr()
            .context("Failed to read listener address")?;
        info!("HTTP server listening on {}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server terminated abnormally")
    }

    /// Bind and serve until the process is stopped.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request as HttpRequest, StatusCode};
    use serde::Serialize;
    use tower::ServiceExt;

    use melt_container::{ComponentDefinition, ComponentRole};
    use melt_web::{Controller, Request, Response, Route, WebError};

    #[derive(Serialize)]
    struct Status {
        healthy: bool,
    }

    struct TestController;

    impl Controller for TestController {
        fn routes(self: Arc<Self>) -> Result<Vec<Route>, WebError> {
            Ok(vec![
                Route::get("/ping", "TestController.ping", |_req: &Request| {
                    Ok(Response::text("pong"))
                })?,
                Route::get("/ping/{name}", "TestController.ping_name", |req: &Request| {
                    let name = req.require_path_var("name")?;
                    Ok(Response::text(format!("pong {name}")))
                })?,
                Route::get("/greet", "TestController.greet", |req: &Request| {
                    let name = req.require_query_param("name")?;
                    Ok(Response::text(format!("hello {name}")))
                })?,
                Route::get("/status", "TestController.status", |_req: &Request| {
                    Response::json(&Status { healthy: true })
                })?,
                Route::get("/fail", "TestController.fail", |_req: &Request| {
                    Err(WebError::HandlerFailed {
                        reason: "broken".to_string(),
                    })
                })?,
                Route::post("/echo", "TestController.echo", |req: &Request| {
                    Ok(Response::text(req.body_text().unwrap_or("").to_string()))
                })?,
            ])
        }
    }

    fn test_router(max_body_bytes: usize) -> Router {
        let context = WebContext::builder()
            .controller::<TestController>(ComponentDefinition::new(
                "testController",
                ComponentRole::Controller,
                |_| Ok(TestController),
            ))
            .build()
            .unwrap();

        let config = ServerConfig {
            max_body_bytes,
            ..ServerConfig::default()
        };
        HttpServer::new(config, Arc::new(context)).router()
    }

    async fn send(router: Router, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        let request = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_requests_funnel_through_the_dispatcher() {
        let (status, body) = send(test_router(MAX_BODY_BYTES), "GET", "/ping", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "pong");
    }

    #[tokio::test]
    async fn test_path_variables_cross_the_bridge() {
        let (status, body) = send(test_router(MAX_BODY_BYTES), "GET", "/ping/alice", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "pong alice");
    }

    #[tokio::test]
    async fn test_query_parameters_cross_the_bridge() {
        let (status, body) =
            send(test_router(MAX_BODY_BYTES), "GET", "/greet?name=bob", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hello bob");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let (status, body) = send(test_router(MAX_BODY_BYTES), "GET", "/nope", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "404 Not Found: /nope");
    }

    #[tokio::test]
    async fn test_missing_parameter_is_400() {
        let (status, body) = send(test_router(MAX_BODY_BYTES), "GET", "/greet", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Bad Request: Missing required parameter 'name'");
    }

    #[tokio::test]
    async fn test_handler_failure_is_500() {
        let (status, body) = send(test_router(MAX_BODY_BYTES), "GET", "/fail", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal Server Error: Handler failed: broken");
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405() {
        let (status, body) = send(test_router(MAX_BODY_BYTES), "BREW", "/ping", "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, "405 Method Not Allowed: BREW");
    }

    #[tokio::test]
    async fn test_json_responses_keep_their_content_type() {
        let request = HttpRequest::builder()
            .method("GET")
            .uri("/status")
            .body(Body::empty())
            .unwrap();

        let response = test_router(MAX_BODY_BYTES).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), br#"{"healthy":true}"#);
    }

    #[tokio::test]
    async fn test_post_body_reaches_the_handler() {
        let (status, body) = send(test_router(MAX_BODY_BYTES), "POST", "/echo", "hi there").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "hi there");
    }

    #[tokio::test]
    async fn test_oversized_body_is_413() {
        let (status, body) = send(test_router(8), "POST", "/echo", "this body is too long").await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, "413 Payload Too Large");
    }
}
