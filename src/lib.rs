//! Single-hop HTTP forward proxy for exercising web-filtering systems.
//!
//! # Architecture Overview
//!
//! ```text
//!   GET /foo?url=example.com&x=1
//!         │
//!         ▼
//!   ┌───────────┐  no url   ┌────────────┐
//!   │   http    │──────────▶│    page    │ landing (200)
//!   │  server   │           └────────────┘
//!   └─────┬─────┘
//!         │ InboundRequest
//!         ▼
//!   ┌──────────────────────────── proxy ───────────────────────────┐
//!   │ target ─▶ headers ─▶ forwarder ─▶ headers ─▶ streamer       │──▶ caller
//!   │ (https default,  (-Host,       (one send,   (-Transfer-     │
//!   │  suffix path)     -Length)      no redirect)  Encoding)     │
//!   └──────────────────────────────┬───────────────────────────────┘
//!                                  │ ProxyError
//!                                  ▼
//!                          http::response::error_page (500)
//! ```
//!
//! Cross-cutting: `config` (TOML + defaults), `observability` (tracing),
//! `lifecycle` (signals, graceful shutdown).

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod page;
pub mod proxy;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::ProxyError;
