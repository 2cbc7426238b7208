//! Inbound request capture.
//!
//! # Responsibilities
//! - Detect the reserved `url` parameter (landing page when absent)
//! - Capture method, path suffix, headers, query, cookies and body
//! - Open a per-request tracing span with a generated request ID
//!
//! # Design Decisions
//! - The path suffix is taken from the raw URI so percent-encoding survives
//! - The request ID lives only in the span; it is never forwarded upstream

use axum::body::Bytes;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Method, Request, Uri};
use tracing::Span;
use uuid::Uuid;

use crate::proxy::TARGET_PARAM;

/// A parsed inbound request carrying a target. Read-only to the pipeline.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Raw value of the `url` parameter.
    pub target: String,
    /// Inbound path without its leading `/`; `None` for the root path.
    pub path_suffix: Option<String>,
    pub headers: HeaderMap,
    /// Query pairs other than `url`, in order.
    pub query: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn new(parts: &Parts, target: String, body: Bytes) -> Self {
        Self {
            method: parts.method.clone(),
            target,
            path_suffix: path_suffix(&parts.uri),
            headers: parts.headers.clone(),
            query: forwarded_query(&parts.uri),
            cookies: parse_cookies(&parts.headers),
            body,
        }
    }
}

/// The non-empty value of the reserved `url` parameter, if any.
pub fn target_param(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == TARGET_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn path_suffix(uri: &Uri) -> Option<String> {
    let path = uri.path();
    let suffix = path.strip_prefix('/').unwrap_or(path);
    (!suffix.is_empty()).then(|| suffix.to_string())
}

fn forwarded_query(uri: &Uri) -> Vec<(String, String)> {
    let Some(query) = uri.query() else {
        return Vec::new();
    };
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key != TARGET_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

fn parse_cookies(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            (!name.is_empty()).then(|| (name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Span for one inbound request, used by the trace layer.
pub fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    )
}
