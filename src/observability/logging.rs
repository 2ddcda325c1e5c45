//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Derive the default filter from config or `--debug`
//!
//! # Design Decisions
//! - `RUST_LOG` always wins over config
//! - Plain fmt output; ANSI colors only when asked for

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(level: &str) -> String {
    format!("stats_gateway={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init(level: &str, colorize: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level).into()))
        .with(tracing_subscriber::fmt::layer().with_ansi(colorize))
        .init();
}
