//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler on every path
//! - Restrict methods to GET/POST/PUT/DELETE/HEAD/OPTIONS
//! - Wire up middleware (request spans)
//! - Guard: no target → landing page, never enters the pipeline
//! - Read the inbound body under a size cap and hand off to the pipeline
//! - Render pipeline failures through the error page

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, MethodRouter},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use http_body_util::LengthLimitError;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::http::request::{request_span, target_param, InboundRequest};
use crate::http::response::{error_page, landing_page};
use crate::lifecycle::shutdown;
use crate::page::{PageRenderer, ShellPage};
use crate::proxy::{self, Forwarder, ProxyError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    pub pages: Arc<dyn PageRenderer>,
    pub chunk_size: usize,
    pub max_body_size: usize,
}

/// HTTP server for the forward proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and the bundled pages.
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        Self::with_pages(config, Arc::new(ShellPage))
    }

    /// Create a server rendering its own pages through `pages`.
    pub fn with_pages(
        config: ProxyConfig,
        pages: Arc<dyn PageRenderer>,
    ) -> Result<Self, ProxyError> {
        let state = AppState {
            forwarder: Forwarder::new(&config.timeouts)?,
            pages,
            chunk_size: config.streaming.chunk_size,
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    fn build_router(state: AppState) -> Router {
        // `get` also answers HEAD
        let methods: MethodRouter<AppState> = get(proxy_handler)
            .post(proxy_handler)
            .put(proxy_handler)
            .delete(proxy_handler)
            .options(proxy_handler);

        Router::new()
            .route("/", methods.clone())
            .route("/{*path}", methods)
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
    }

    /// The router, for serving on a custom transport or driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            chunk_size = self.config.streaming.chunk_size,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();

    let Some(target) = target_param(&parts.uri) else {
        return landing_page(state.pages.as_ref());
    };

    let body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) => bytes,
        Err(e) => return body_read_failure(e, state.max_body_size),
    };

    let inbound = InboundRequest::new(&parts, target, body);
    match proxy::handle(inbound, &state.forwarder, state.chunk_size).await {
        Ok(response) => response,
        Err(e) => error_page(&e, state.pages.as_ref()),
    }
}

/// 413 when the body outgrew the cap, 400 for any other read failure.
fn body_read_failure(error: axum::Error, limit: usize) -> Response {
    let error = error.into_inner();
    if error.downcast_ref::<LengthLimitError>().is_some() {
        tracing::warn!(limit, "Request body exceeds size limit");
        return (
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Request body exceeds {limit} bytes"),
        )
            .into_response();
    }

    tracing::warn!(error = %error, "Failed to read request body");
    (StatusCode::BAD_REQUEST, "Request body could not be read").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Method};
    use tower::ServiceExt;

    fn router() -> Router {
        HttpServer::new(ProxyConfig::default()).unwrap().router()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn missing_target_renders_landing_page() {
        let response = router()
            .oneshot(Request::get("/some/path").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        assert!(body_text(response).await.contains(r#"name="url""#));
    }

    #[tokio::test]
    async fn unsupported_method_is_rejected() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method(Method::PATCH)
                    .uri("/?url=example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn invalid_target_maps_to_error_page() {
        let response = router()
            .oneshot(Request::get("/?url=https://").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Error: Invalid target URL"));
    }

    #[tokio::test]
    async fn oversized_body_is_refused_before_dispatch() {
        let mut config = ProxyConfig::default();
        config.limits.max_body_size = 4;
        let router = HttpServer::new(config).unwrap().router();

        let response = router
            .oneshot(
                Request::post("/?url=127.0.0.1:9")
                    .body(Body::from("far too long"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn aborted_body_is_a_read_failure_not_a_size_failure() {
        let chunks: Vec<Result<&'static str, std::io::Error>> = vec![
            Ok("partial"),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "client went away")),
        ];
        let body = Body::from_stream(futures_util::stream::iter(chunks));

        let response = router()
            .oneshot(Request::post("/?url=127.0.0.1:9").body(body).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
