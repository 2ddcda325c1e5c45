//! Provider subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (pid, client IP)
//!     → resolver.rs (player record → server mapping → default)
//!     → Provider
//!     → capabilities.rs (base address, quirks, verification support)
//! ```
//!
//! # Design Decisions
//! - Provider is a closed enum, looked up by value
//! - Every provider quirk lives in the capability table, never in call sites
//! - Tables are built once at startup and shared read-only via Arc

pub mod capabilities;
pub mod resolver;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub use capabilities::{Capabilities, ProviderTable, Verification};
pub use resolver::{Resolver, ServerMapping};

/// A successor backend answering legacy stats requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Provider {
    #[default]
    Unknown,
    BF2Hub,
    PlayBF2,
    OpenSpy,
    B2BF2,
}

impl Provider {
    /// All providers that can actually answer requests.
    pub const KNOWN: [Provider; 4] = [
        Provider::BF2Hub,
        Provider::PlayBF2,
        Provider::OpenSpy,
        Provider::B2BF2,
    ];

    /// Lowercase identifier used in config files, logs and the JSON API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Unknown => "unknown",
            Provider::BF2Hub => "bf2hub",
            Provider::PlayBF2 => "playbf2",
            Provider::OpenSpy => "openspy",
            Provider::B2BF2 => "b2bf2",
        }
    }

    /// Public stats page for a player of this provider, if the provider has one.
    pub fn profile_url(&self, pid: u64) -> Option<String> {
        match self {
            Provider::BF2Hub => Some(format!("https://www.bf2hub.com/stats/{}", pid)),
            Provider::PlayBF2 => Some(format!("http://bf2.tgamer.ru/stats/?pid={}", pid)),
            Provider::B2BF2 => Some(format!("https://b2bf2.net/bfhq?id={}", pid)),
            Provider::OpenSpy | Provider::Unknown => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a provider name or code is not recognized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid provider: {0}")]
pub struct InvalidProvider(pub String);

impl FromStr for Provider {
    type Err = InvalidProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Provider::Unknown);
        }
        Provider::KNOWN
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| InvalidProvider(s.to_string()))
    }
}

/// Numeric encoding used by the player store.
impl TryFrom<i32> for Provider {
    type Error = InvalidProvider;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Provider::Unknown),
            1 => Ok(Provider::BF2Hub),
            2 => Ok(Provider::PlayBF2),
            3 => Ok(Provider::OpenSpy),
            4 => Ok(Provider::B2BF2),
            other => Err(InvalidProvider(other.to_string())),
        }
    }
}

impl From<Provider> for i32 {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Unknown => 0,
            Provider::BF2Hub => 1,
            Provider::PlayBF2 => 2,
            Provider::OpenSpy => 3,
            Provider::B2BF2 => 4,
        }
    }
}

impl Serialize for Provider {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
