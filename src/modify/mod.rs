//! Request/response modifier pipeline.
//!
//! # Data Flow
//! ```text
//! Forwarder builds reqwest::Request
//!     → request modifiers, in registration order (request.rs)
//!     → upstream call
//!     → response modifiers, in registration order (response.rs)
//!     → body returned to the client
//! ```
//!
//! # Design Decisions
//! - Provider quirks are read from `Capabilities`, never matched by name
//! - A modifier that does not apply is a no-op, not an error
//! - The first error aborts the request; the caller answers 500

pub mod request;
pub mod response;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use thiserror::Error;

use crate::asp;
use crate::provider::{Capabilities, Provider};

pub use request::{HostRewrite, InfoQuery};
pub use response::LegacyVerification;

/// Modifier failures. Any of these turns into an HTTP 500.
#[derive(Debug, Error)]
pub enum ModifyError {
    #[error("unknown player verification response code: {0:?}")]
    UnknownVerificationCode(String),
}

/// Per-request inputs shared by all modifiers.
#[derive(Debug, Clone, Copy)]
pub struct ModifyContext<'a> {
    pub provider: Provider,
    pub capabilities: &'a Capabilities,
    /// Path of the inbound request, independent of the provider's base URL.
    pub path: &'a str,
    /// Timestamp used for any synthesized protocol response.
    pub asof: i64,
}

/// Buffered upstream response as seen by response modifiers.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Query exactly as the client sent it, before any re-encoding.
    pub raw_query: Option<String>,
}

impl UpstreamResponse {
    /// Replace the body with an encoded protocol response.
    pub fn set_protocol_body(&mut self, resp: &asp::Response) {
        self.body = Bytes::from(resp.serialize());
    }
}

/// Transforms the outgoing upstream request in place.
pub trait RequestModifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn modify(&self, ctx: &ModifyContext<'_>, req: &mut reqwest::Request) -> Result<(), ModifyError>;
}

/// Transforms the buffered upstream response in place.
pub trait ResponseModifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn modify(&self, ctx: &ModifyContext<'_>, res: &mut UpstreamResponse) -> Result<(), ModifyError>;
}

pub enum Modifier {
    Request(Box<dyn RequestModifier>),
    Response(Box<dyn ResponseModifier>),
}

/// Ordered modifier list, frozen once the server starts.
#[derive(Default)]
pub struct ModifierChain {
    modifiers: Vec<Modifier>,
}

impl ModifierChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The chain every provider request goes through.
    pub fn standard() -> Self {
        Self::new()
            .with(Modifier::Request(Box::new(HostRewrite)))
            .with(Modifier::Request(Box::new(InfoQuery)))
            .with(Modifier::Response(Box::new(LegacyVerification)))
    }

    pub fn with(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn apply_request(&self, ctx: &ModifyContext<'_>, req: &mut reqwest::Request) -> Result<(), ModifyError> {
        for modifier in &self.modifiers {
            if let Modifier::Request(m) = modifier {
                m.modify(ctx, req)?;
                tracing::trace!(modifier = m.name(), provider = %ctx.provider, "Applied request modifier");
            }
        }
        Ok(())
    }

    pub fn apply_response(&self, ctx: &ModifyContext<'_>, res: &mut UpstreamResponse) -> Result<(), ModifyError> {
        for modifier in &self.modifiers {
            if let Modifier::Response(m) = modifier {
                m.modify(ctx, res)?;
                tracing::trace!(modifier = m.name(), provider = %ctx.provider, "Applied response modifier");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderTable;
    use crate::config::ProviderOverride;
    use axum::http::header::HOST;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use url::Url;

    struct Record {
        tag: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl RequestModifier for Record {
        fn name(&self) -> &'static str {
            self.tag
        }

        fn modify(&self, _ctx: &ModifyContext<'_>, _req: &mut reqwest::Request) -> Result<(), ModifyError> {
            self.log.lock().unwrap().push(self.tag);
            Ok(())
        }
    }

    impl ResponseModifier for Record {
        fn name(&self) -> &'static str {
            self.tag
        }

        fn modify(&self, _ctx: &ModifyContext<'_>, _res: &mut UpstreamResponse) -> Result<(), ModifyError> {
            self.log.lock().unwrap().push(self.tag);
            Ok(())
        }
    }

    struct Fail;

    impl RequestModifier for Fail {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn modify(&self, _ctx: &ModifyContext<'_>, _req: &mut reqwest::Request) -> Result<(), ModifyError> {
            Err(ModifyError::UnknownVerificationCode("E\t420".into()))
        }
    }

    fn request(url: &str) -> reqwest::Request {
        reqwest::Request::new(reqwest::Method::GET, Url::parse(url).unwrap())
    }

    #[test]
    fn test_phases_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let rec = |tag| Record { tag, log: log.clone() };
        let chain = ModifierChain::new()
            .with(Modifier::Response(Box::new(rec("res-1"))))
            .with(Modifier::Request(Box::new(rec("req-1"))))
            .with(Modifier::Request(Box::new(rec("req-2"))))
            .with(Modifier::Response(Box::new(rec("res-2"))));

        let table = ProviderTable::default();
        let ctx = ModifyContext {
            provider: Provider::OpenSpy,
            capabilities: table.get(Provider::OpenSpy),
            path: "/ASP/getrankinfo.aspx",
            asof: 0,
        };

        let mut req = request("http://bf2web.openspy.net/ASP/getrankinfo.aspx");
        chain.apply_request(&ctx, &mut req).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["req-1", "req-2"]);

        let mut res = UpstreamResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            raw_query: None,
        };
        chain.apply_response(&ctx, &mut res).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["req-1", "req-2", "res-1", "res-2"]);
    }

    #[test]
    fn test_error_stops_the_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = ModifierChain::new()
            .with(Modifier::Request(Box::new(Fail)))
            .with(Modifier::Request(Box::new(Record { tag: "after", log: log.clone() })));

        let table = ProviderTable::default();
        let ctx = ModifyContext {
            provider: Provider::BF2Hub,
            capabilities: table.get(Provider::BF2Hub),
            path: "/ASP/getrankinfo.aspx",
            asof: 0,
        };
        let mut req = request("http://official.ranking.bf2hub.com/ASP/getrankinfo.aspx");
        assert!(chain.apply_request(&ctx, &mut req).is_err());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_standard_chain_rewrites_bf2hub_host() {
        let chain = ModifierChain::standard();
        assert_eq!(chain.modifiers.len(), 3);

        let table = ProviderTable::default();
        let ctx = ModifyContext {
            provider: Provider::BF2Hub,
            capabilities: table.get(Provider::BF2Hub),
            path: "/ASP/getrankinfo.aspx",
            asof: 0,
        };
        let mut req = request("http://official.ranking.bf2hub.com/ASP/getrankinfo.aspx?pid=1");
        chain.apply_request(&ctx, &mut req).unwrap();
        assert_eq!(req.headers()[HOST], "BF2Web.gamespy.com");
    }

    #[test]
    fn test_standard_chain_matches_inbound_path_under_base_prefix() {
        let mut overrides = HashMap::new();
        overrides.insert(
            Provider::BF2Hub,
            ProviderOverride {
                base_url: Some("http://127.0.0.1:9000/stats/".into()),
                native_verification: None,
            },
        );
        let table = ProviderTable::new(&overrides).unwrap();
        let ctx = ModifyContext {
            provider: Provider::BF2Hub,
            capabilities: table.get(Provider::BF2Hub),
            path: "/ASP/getrankstatus.aspx",
            asof: 0,
        };

        let mut req = request("http://127.0.0.1:9000/stats/ASP/getrankstatus.aspx");
        ModifierChain::standard().apply_request(&ctx, &mut req).unwrap();
        assert_eq!(req.headers()[HOST], "battlefield2.gamestats.gamespy.com");

        let ctx = ModifyContext {
            path: "/ASP/getplayerinfo.aspx",
            ..ctx
        };
        let mut req = request("http://127.0.0.1:9000/stats/ASP/getplayerinfo.aspx?pid=45");
        ModifierChain::standard().apply_request(&ctx, &mut req).unwrap();
        assert!(req.url().query_pairs().any(|(k, _)| k == "info"));
    }
}
