//! Upstream forwarding.
//!
//! # Data Flow
//! ```text
//! Inbound + Provider
//!     → build reqwest::Request (base URL + path, raw query, allow-listed headers)
//!     → request modifiers
//!     → single upstream attempt
//!     → buffered body → response modifiers
//!     → status, Content-Type and body returned unchanged otherwise
//! ```
//!
//! # Design Decisions
//! - Redirects are returned to the client, never followed
//! - No compression negotiation; bodies are passed through byte-for-byte
//! - No retries: a failed attempt is a 500

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, USER_AGENT};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use url::Url;

use crate::error::GatewayError;
use crate::http::request::{Inbound, X_FORWARDED_FOR, X_FORWARDED_PROTO, X_REAL_IP, X_SESSION_DATA};
use crate::modify::{ModifierChain, ModifyContext, UpstreamResponse};
use crate::observability::metrics;
use crate::provider::{Provider, ProviderTable};

/// Sends inbound requests to providers through the modifier chain.
pub struct Forwarder {
    client: reqwest::Client,
    providers: Arc<ProviderTable>,
    chain: ModifierChain,
}

impl Forwarder {
    pub fn new(providers: Arc<ProviderTable>, chain: ModifierChain) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            providers,
            chain,
        })
    }

    pub async fn forward(&self, provider: Provider, inbound: Inbound, asof: i64) -> Result<Response, GatewayError> {
        let capabilities = self.providers.get(provider);
        let ctx = ModifyContext {
            provider,
            capabilities,
            path: &inbound.path,
            asof,
        };

        let url = upstream_url(&capabilities.base_url, &inbound.path, inbound.raw_query.as_deref());
        let mut req = reqwest::Request::new(inbound.method.clone(), url);
        copy_headers(&inbound, req.headers_mut());
        if !inbound.body.is_empty() {
            *req.body_mut() = Some(inbound.body.clone().into());
        }

        self.chain
            .apply_request(&ctx, &mut req)
            .map_err(|source| GatewayError::Modify { provider, source })?;

        tracing::debug!(
            provider = %provider,
            ip = %inbound.client_ip,
            url = %req.url(),
            "Forwarding request"
        );

        let start = Instant::now();
        let res = match self.client.execute(req).await {
            Ok(res) => res,
            Err(source) => {
                metrics::record_upstream(provider, 0, start);
                return Err(GatewayError::Upstream { provider, source });
            }
        };

        let status = res.status();
        let headers = res.headers().clone();
        let body = res
            .bytes()
            .await
            .map_err(|source| GatewayError::Upstream { provider, source })?;
        metrics::record_upstream(provider, status.as_u16(), start);

        let mut upstream = UpstreamResponse {
            status,
            headers,
            body,
            raw_query: inbound.raw_query,
        };
        self.chain
            .apply_response(&ctx, &mut upstream)
            .map_err(|source| GatewayError::Modify { provider, source })?;

        Ok(into_response(upstream))
    }
}

/// Base URL with the inbound path appended and the raw query copied over.
pub fn upstream_url(base: &Url, path: &str, raw_query: Option<&str>) -> Url {
    let mut url = base.clone();
    let joined = format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url.set_query(raw_query);
    url
}

fn copy_headers(inbound: &Inbound, headers: &mut reqwest::header::HeaderMap) {
    for name in [USER_AGENT, X_SESSION_DATA] {
        if let Some(value) = inbound.headers.get(&name) {
            headers.insert(name, value.clone());
        }
    }

    if let Ok(ip) = HeaderValue::from_str(&inbound.client_ip.to_string()) {
        headers.insert(X_FORWARDED_FOR, ip.clone());
        headers.insert(X_REAL_IP, ip);
    }
    if let Ok(proto) = HeaderValue::from_str(inbound.forwarded_proto()) {
        headers.insert(X_FORWARDED_PROTO, proto);
    }
}

fn into_response(upstream: UpstreamResponse) -> Response {
    let mut response = (upstream.status, Body::from(upstream.body)).into_response();
    if let Some(content_type) = upstream.headers.get(CONTENT_TYPE) {
        response.headers_mut().insert(CONTENT_TYPE, content_type.clone());
    }
    response
}

/// Locally built protocol answer, always HTTP 200.
pub fn protocol_response(resp: &crate::asp::Response) -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
        resp.serialize(),
    )
        .into_response()
}
