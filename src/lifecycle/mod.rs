//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → HttpServer stops accepting → in-flight relays drain → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
