//! Outbound dispatch.
//!
//! # Responsibilities
//! - Build the upstream request from the filtered inbound request
//! - Send exactly one request, never following redirects
//! - Hand the response head and a lazy body stream to the streamer
//!
//! # Design Decisions
//! - One `reqwest::Client` is shared for connection pooling; it holds no
//!   cookie store, so nothing leaks between callers
//! - TLS verification stays at the client default (platform trust store)
//! - Environment proxies are ignored: this proxy is always the last hop
//! - No retries; a failed attempt is final

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::{redirect, Client};
use url::Url;

use crate::config::TimeoutConfig;
use crate::http::request::InboundRequest;
use crate::proxy::headers::{filter_headers, Direction};
use crate::proxy::target::ResolvedTarget;
use crate::proxy::ProxyError;

/// Lazily consumed upstream body. Single pass, not restartable.
pub type BodyStream = BoxStream<'static, Result<Bytes, ProxyError>>;

/// The request as it will be sent upstream.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub target: ResolvedTarget,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Parsed view of the caller's cookies. They travel upstream inside the
    /// forwarded `Cookie` header; this set is only read for logging.
    pub cookies: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl OutboundRequest {
    /// Derive the outbound request, dropping headers the transport regenerates.
    pub fn new(inbound: InboundRequest, target: ResolvedTarget) -> Self {
        Self {
            method: inbound.method,
            target,
            headers: filter_headers(&inbound.headers, Direction::Request),
            body: inbound.body,
            cookies: inbound.cookies,
            query: inbound.query,
        }
    }

    /// Final URL: the resolved target with the forwarded query appended.
    pub fn url(&self) -> Url {
        let mut url = self.target.url().clone();
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        url
    }

    fn carries_body(&self) -> bool {
        !self.body.is_empty() || self.method == Method::POST || self.method == Method::PUT
    }
}

/// Status, filtered headers and the not-yet-read body of an upstream reply.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: BodyStream,
}

impl UpstreamResponse {
    /// Wrap an upstream reply; framing headers are removed here so they can
    /// never reach the caller.
    pub fn new(status: StatusCode, headers: &HeaderMap, body: BodyStream) -> Self {
        Self {
            status,
            headers: filter_headers(headers, Direction::Response),
            body,
        }
    }
}

impl std::fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Sends outbound requests.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    request_timeout: Option<Duration>,
}

impl Forwarder {
    /// Build the forwarder and its HTTP client from the timeout settings.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, ProxyError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .no_proxy()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
            .build()?;

        Ok(Self {
            client,
            request_timeout: timeouts.request_secs.map(Duration::from_secs),
        })
    }

    /// Dispatch `outbound` once and return as soon as the response head is in.
    pub async fn forward(&self, outbound: OutboundRequest) -> Result<UpstreamResponse, ProxyError> {
        let url = outbound.url();
        let mut request = self
            .client
            .request(outbound.method.clone(), url)
            .headers(outbound.headers.clone());
        if outbound.carries_body() {
            request = request.body(outbound.body);
        }

        let response = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, request.send())
                .await
                .map_err(|_| ProxyError::Timeout(limit))??,
            None => request.send().await?,
        };

        let status = response.status();
        tracing::debug!(
            status = %status,
            content_length = ?response.content_length(),
            "Upstream responded"
        );

        let headers = response.headers().clone();
        let body = response.bytes_stream().map_err(ProxyError::from).boxed();
        Ok(UpstreamResponse::new(status, &headers, body))
    }
}
