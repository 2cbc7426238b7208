//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! pipeline + boundary
//!     → tracing events (target, status, error fields)
//!     → TraceLayer spans (request_id, method, path)
//!     → logging.rs subscriber → stdout
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted strings
//! - Request ID exists only in spans, never on the wire
//! - `RUST_LOG` overrides the configured level

pub mod logging;
