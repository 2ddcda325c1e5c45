//! Provider capability table.
//!
//! # Responsibilities
//! - Map each provider to its base address
//! - Describe the quirks the modifier chain and verification engine act on
//! - Apply startup overrides from config, then freeze
//!
//! # Design Decisions
//! - One table instead of per-call-site provider switches
//! - No mutation path after construction; shared via Arc

use std::collections::HashMap;

use url::Url;

use crate::config::schema::ProviderOverride;
use crate::provider::Provider;

/// How a provider answers `VerifyPlayer.aspx`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// No native verification, the gateway has to decide locally.
    Unsupported,
    /// Standard protocol response, passed through as-is.
    Standard,
    /// Opaque three-valued code that must be translated.
    LegacyCode,
}

/// Behavioral flags and address of a single provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub base_url: Url,
    /// Edge routes on GameSpy host names instead of the target URL.
    pub requires_alt_host: bool,
    /// `getplayerinfo.aspx` only answers with the full BFHQ `info` list.
    pub requires_extra_query: bool,
    pub verification: Verification,
    pub allows_case_insensitive_login: bool,
}

impl Capabilities {
    pub fn supports_verification(&self) -> bool {
        self.verification != Verification::Unsupported
    }

    fn defaults(provider: Provider) -> Self {
        let (base, alt_host, extra_query, verification, case_insensitive) = match provider {
            Provider::BF2Hub => (
                "http://official.ranking.bf2hub.com/",
                true,
                true,
                Verification::Unsupported,
                true,
            ),
            Provider::PlayBF2 => ("http://bf2web.playbf2.ru/", false, false, Verification::Standard, false),
            Provider::OpenSpy => ("http://bf2web.openspy.net/", false, false, Verification::Standard, false),
            Provider::B2BF2 => ("https://stats.b2bf2.net/", false, false, Verification::Standard, false),
            Provider::Unknown => ("http://unknown/", false, false, Verification::Unsupported, false),
        };

        Self {
            base_url: Url::parse(base).expect("built-in base URL is valid"),
            requires_alt_host: alt_host,
            requires_extra_query: extra_query,
            verification,
            allows_case_insensitive_login: case_insensitive,
        }
    }
}

/// The native verification format a provider uses once verification is enabled.
fn native_verification(provider: Provider) -> Verification {
    match provider {
        Provider::BF2Hub => Verification::LegacyCode,
        Provider::PlayBF2 | Provider::OpenSpy | Provider::B2BF2 => Verification::Standard,
        Provider::Unknown => Verification::Unsupported,
    }
}

/// Immutable provider → capabilities lookup.
#[derive(Debug, Clone)]
pub struct ProviderTable {
    entries: [Capabilities; 5],
}

impl ProviderTable {
    /// Build the table from built-in defaults and startup overrides.
    pub fn new(overrides: &HashMap<Provider, ProviderOverride>) -> Result<Self, url::ParseError> {
        let mut entries = Self::builtin();

        for (provider, ov) in overrides {
            if *provider == Provider::Unknown {
                continue;
            }
            let entry = &mut entries[Self::index(*provider)];
            if let Some(base_url) = &ov.base_url {
                entry.base_url = Url::parse(base_url)?;
            }
            if let Some(enabled) = ov.native_verification {
                entry.verification = if enabled {
                    native_verification(*provider)
                } else {
                    Verification::Unsupported
                };
            }
            tracing::debug!(
                provider = %provider,
                base_url = %entry.base_url,
                verification = ?entry.verification,
                "Applied provider override"
            );
        }

        Ok(Self { entries })
    }

    /// Capabilities of the given provider.
    pub fn get(&self, provider: Provider) -> &Capabilities {
        &self.entries[Self::index(provider)]
    }

    fn builtin() -> [Capabilities; 5] {
        [
            Capabilities::defaults(Provider::Unknown),
            Capabilities::defaults(Provider::BF2Hub),
            Capabilities::defaults(Provider::PlayBF2),
            Capabilities::defaults(Provider::OpenSpy),
            Capabilities::defaults(Provider::B2BF2),
        ]
    }

    fn index(provider: Provider) -> usize {
        match provider {
            Provider::Unknown => 0,
            Provider::BF2Hub => 1,
            Provider::PlayBF2 => 2,
            Provider::OpenSpy => 3,
            Provider::B2BF2 => 4,
        }
    }
}

impl Default for ProviderTable {
    fn default() -> Self {
        Self {
            entries: Self::builtin(),
        }
    }
}
