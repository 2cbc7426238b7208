//! Header filtering between the two transport legs.
//!
//! # Responsibilities
//! - Strip `Host` and `Content-Length` before forwarding upstream
//! - Strip `Transfer-Encoding` before relaying back to the caller
//!
//! # Design Decisions
//! - Pure function over `HeaderMap`; names are already case-normalized
//! - Everything else, `Cookie` included, passes through untouched
//! - Repeated values of a kept header are all preserved, in order

use axum::http::{header, HeaderMap, HeaderName};

/// Which leg a header map is about to travel on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Caller → upstream.
    Request,
    /// Upstream → caller.
    Response,
}

impl Direction {
    /// Whether the transport regenerates `name` on this leg.
    pub fn strips(self, name: &HeaderName) -> bool {
        match self {
            Direction::Request => *name == header::HOST || *name == header::CONTENT_LENGTH,
            Direction::Response => *name == header::TRANSFER_ENCODING,
        }
    }
}

/// Return a copy of `headers` without the headers stripped for `direction`.
pub fn filter_headers(headers: &HeaderMap, direction: Direction) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !direction.strips(name) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn sample() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Host", HeaderValue::from_static("proxy.local"));
        headers.insert("Content-Length", HeaderValue::from_static("12"));
        headers.insert("Transfer-Encoding", HeaderValue::from_static("chunked"));
        headers.insert("Cookie", HeaderValue::from_static("session=abc"));
        headers.insert("X-Filter-Test", HeaderValue::from_static("1"));
        headers.append("Accept", HeaderValue::from_static("text/html"));
        headers.append("Accept", HeaderValue::from_static("*/*"));
        headers
    }

    #[test]
    fn request_direction_strips_host_and_length() {
        let filtered = filter_headers(&sample(), Direction::Request);

        assert!(!filtered.contains_key(header::HOST));
        assert!(!filtered.contains_key(header::CONTENT_LENGTH));
        assert_eq!(filtered["transfer-encoding"], "chunked");
        assert_eq!(filtered["cookie"], "session=abc");
        assert_eq!(filtered["x-filter-test"], "1");
    }

    #[test]
    fn response_direction_strips_transfer_encoding() {
        let filtered = filter_headers(&sample(), Direction::Response);

        assert!(!filtered.contains_key(header::TRANSFER_ENCODING));
        assert_eq!(filtered["host"], "proxy.local");
        assert_eq!(filtered["content-length"], "12");
    }

    #[test]
    fn repeated_values_survive_in_order() {
        let filtered = filter_headers(&sample(), Direction::Request);
        let accept: Vec<_> = filtered.get_all(header::ACCEPT).iter().collect();
        assert_eq!(accept, ["text/html", "*/*"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        for direction in [Direction::Request, Direction::Response] {
            let once = filter_headers(&sample(), direction);
            let twice = filter_headers(&once, direction);
            assert_eq!(once, twice);
        }
    }
}
