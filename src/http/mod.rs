//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout/request-id/trace layers)
//!     → handlers.rs (pick dynamic, static, verification or API path)
//!     → request.rs (client IP, buffered body, raw query)
//!     → forward.rs (modifier chain + upstream call) or local protocol answer
//!     → Send to client
//! ```

pub mod forward;
pub mod handlers;
pub mod request;
pub mod server;

pub use forward::Forwarder;
pub use server::{AppState, HttpServer};
