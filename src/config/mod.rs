//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides applied in main
//!     → validation.rs (semantic checks, once on the merged config)
//!     → GatewayConfig (validated, immutable)
//!     → provider table, server mapping and listener built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, read_config, ConfigError};
pub use schema::{DatabaseConfig, GatewayConfig, ListenerConfig, ProviderOverride, ServerConfig};
pub use validation::{validate_config, ValidationError};
