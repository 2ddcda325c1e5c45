//! Compatibility gateway for the legacy Battlefield 2 stats (ASP) protocol.
//!
//! # Architecture Overview
//!
//! ```text
//!     Game server / client
//!     ─────────────────────▶ http::server ──▶ http::handlers
//!                                                 │
//!                         ┌───────────────────────┼─────────────────────┐
//!                         ▼                       ▼                     ▼
//!                 provider::Resolver       verify::Verifier       /api/player
//!                 (player → server →       (forward or local          │
//!                  default provider)        verdict)                  │
//!                         │                       │                     ▼
//!                         ▼                       ▼              player::PlayerStore
//!                 http::forward ──▶ modify chain ──▶ upstream provider
//!                         ◀── response modifiers ◀──
//! ```
//!
//! Cross-cutting: `config` (YAML), `observability` (tracing, metrics),
//! `lifecycle` (startup, signals, shutdown), `asp` (wire codec).

pub mod asp;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod modify;
pub mod observability;
pub mod player;
pub mod provider;
pub mod verify;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
