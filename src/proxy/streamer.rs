//! Response relay.
//!
//! # Responsibilities
//! - Turn an [`UpstreamResponse`] into the caller-facing response
//! - Re-window the upstream body into bounded chunks as it arrives
//! - Default the content type to `text/html`
//!
//! # Design Decisions
//! - Nothing is buffered beyond the chunk currently being split
//! - Dropping the body (caller gone) drops the upstream response with it,
//!   which releases the outbound connection

use std::pin::Pin;
use std::task::{ready, Context, Poll};

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue};
use axum::response::Response;
use futures_util::{Stream, StreamExt};

use crate::proxy::forwarder::{BodyStream, UpstreamResponse};
use crate::proxy::ProxyError;

/// Default window size for relayed chunks.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Content type used when upstream does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Build the caller-facing response for a successful upstream exchange.
pub fn relay(upstream: UpstreamResponse, chunk_size: usize) -> Response {
    let UpstreamResponse {
        status,
        mut headers,
        body,
    } = upstream;

    if !headers.contains_key(header::CONTENT_TYPE) {
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
        );
    }

    let mut response = Response::new(Body::from_stream(ChunkedBody::new(body, chunk_size)));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Upstream body split into chunks of at most `max_chunk` bytes.
///
/// Yields `None` exactly once, after upstream signalled end of stream or
/// after the first error.
pub struct ChunkedBody {
    inner: BodyStream,
    pending: Bytes,
    max_chunk: usize,
    relayed: u64,
    finished: bool,
}

impl ChunkedBody {
    pub fn new(inner: BodyStream, max_chunk: usize) -> Self {
        Self {
            inner,
            pending: Bytes::new(),
            max_chunk: max_chunk.max(1),
            relayed: 0,
            finished: false,
        }
    }

    /// Bytes handed to the caller so far.
    pub fn relayed(&self) -> u64 {
        self.relayed
    }
}

impl Stream for ChunkedBody {
    type Item = Result<Bytes, ProxyError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if !this.pending.is_empty() {
                let take = this.pending.len().min(this.max_chunk);
                let chunk = this.pending.split_to(take);
                this.relayed += take as u64;
                return Poll::Ready(Some(Ok(chunk)));
            }
            if this.finished {
                return Poll::Ready(None);
            }

            match ready!(this.inner.poll_next_unpin(cx)) {
                Some(Ok(bytes)) => this.pending = bytes,
                Some(Err(e)) => {
                    this.finished = true;
                    tracing::warn!(
                        relayed = this.relayed,
                        error = %e.message(),
                        "Upstream body failed mid-stream"
                    );
                    return Poll::Ready(Some(Err(e)));
                }
                None => {
                    this.finished = true;
                    tracing::debug!(relayed = this.relayed, "Upstream body complete");
                }
            }
        }
    }
}

impl Drop for ChunkedBody {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(
                relayed = self.relayed,
                "Relay stopped before upstream finished, releasing upstream connection"
            );
        }
    }
}
