//! Target URL resolution.
//!
//! # Responsibilities
//! - Default a schemeless target to `https://`
//! - Replace the target's path with the inbound path suffix, if any
//!
//! # Design Decisions
//! - A non-empty suffix replaces the whole path *and* query of the target;
//!   it is never appended
//! - Host reachability is not checked here, failures surface from the forwarder

use std::fmt;

use url::Url;

use crate::proxy::ProxyError;

/// Query parameter carrying the upstream address.
pub const TARGET_PARAM: &str = "url";

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// An absolute `http`/`https` URL the request will be forwarded to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    url: Url,
}

impl ResolvedTarget {
    /// Resolve the caller-supplied target and optional path suffix.
    pub fn resolve(target: &str, path_suffix: Option<&str>) -> Result<Self, ProxyError> {
        let normalized = with_scheme(target);
        let mut url = Url::parse(&normalized).map_err(|source| ProxyError::InvalidTarget {
            target: target.to_string(),
            source,
        })?;

        if let Some(suffix) = path_suffix.filter(|s| !s.is_empty()) {
            url.set_path(&format!("/{}", suffix.trim_start_matches('/')));
            url.set_query(None);
            url.set_fragment(None);
        }

        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

fn has_http_scheme(target: &str) -> bool {
    ["http://", "https://"].iter().any(|prefix| {
        target
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

fn with_scheme(target: &str) -> String {
    if has_http_scheme(target) {
        target.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{target}")
    }
}
