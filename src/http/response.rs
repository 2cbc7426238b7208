//! Responses the proxy produces itself.
//!
//! Relayed upstream responses are built by `proxy::streamer`; this module only
//! covers the landing page (no target given) and the error page (pipeline
//! failure). Every failure maps to 500, whatever its cause.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::page::PageRenderer;
use crate::proxy::ProxyError;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Landing page shown when the request names no target.
pub fn landing_page(pages: &dyn PageRenderer) -> Response {
    html(StatusCode::OK, pages.landing())
}

/// Terminal response for a failed proxy attempt.
pub fn error_page(error: &ProxyError, pages: &dyn PageRenderer) -> Response {
    html(StatusCode::INTERNAL_SERVER_ERROR, pages.error(&error.message()))
}

fn html(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::ShellPage;
    use std::time::Duration;

    #[tokio::test]
    async fn error_page_is_500_with_message() {
        let err = ProxyError::Timeout(Duration::from_secs(2));
        let response = error_page(&err, &ShellPage);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::CONTENT_TYPE], HTML_CONTENT_TYPE);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Error: Upstream did not respond within 2s"));
    }

    #[test]
    fn landing_page_is_ok() {
        let response = landing_page(&ShellPage);
        assert_eq!(response.status(), StatusCode::OK);
    }
}
