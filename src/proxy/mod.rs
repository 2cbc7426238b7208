//! Request-forwarding pipeline.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → target.rs (scheme default, path suffix override)
//!     → headers.rs (strip Host / Content-Length)
//!     → forwarder.rs (single dispatch, redirects not followed)
//!     → headers.rs (strip Transfer-Encoding)
//!     → streamer.rs (bounded chunks, relayed as they arrive)
//!     → caller
//!
//! On failure at any step:
//!     → ProxyError → http::response::error_page (500)
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing but the pooled HTTP client outlives a request
//! - Strictly sequential per request, no fan-out
//! - Caller cookies reach every upstream unchanged, whatever its host

pub mod error;
pub mod forwarder;
pub mod headers;
pub mod streamer;
pub mod target;

use axum::response::Response;

pub use error::ProxyError;
pub use forwarder::{Forwarder, OutboundRequest, UpstreamResponse};
pub use headers::{filter_headers, Direction};
pub use target::{ResolvedTarget, TARGET_PARAM};

use crate::http::request::InboundRequest;

/// Run one inbound request through the pipeline.
///
/// Failures are logged here, with the target that was attempted, and
/// returned for the boundary to render.
pub async fn handle(
    inbound: InboundRequest,
    forwarder: &Forwarder,
    chunk_size: usize,
) -> Result<Response, ProxyError> {
    let target = match ResolvedTarget::resolve(&inbound.target, inbound.path_suffix.as_deref()) {
        Ok(target) => target,
        Err(e) => {
            tracing::error!(
                upstream = %inbound.target,
                error = %e.message(),
                "Error proxying request"
            );
            return Err(e);
        }
    };

    let outbound = OutboundRequest::new(inbound, target.clone());
    tracing::info!(
        upstream = %target,
        method = %outbound.method,
        cookies = outbound.cookies.len(),
        "Proxying request"
    );

    match forwarder.forward(outbound).await {
        Ok(upstream) => {
            tracing::debug!(
                upstream = %target,
                status = %upstream.status,
                "Relaying upstream response"
            );
            Ok(streamer::relay(upstream, chunk_size))
        }
        Err(e) => {
            tracing::error!(upstream = %target, error = %e.message(), "Error proxying request");
            Err(e)
        }
    }
}
