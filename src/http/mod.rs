//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, method table, trace layer)
//!     → request.rs (target guard, InboundRequest capture)
//!     → proxy pipeline
//!     → response.rs (landing / error pages) or relayed upstream response
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::InboundRequest;
pub use server::{AppState, HttpServer};
