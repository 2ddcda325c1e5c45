//! Inbound request capture.
//!
//! # Responsibilities
//! - Determine the real client (game server) IP
//! - Buffer the body so it can be forwarded with its original length
//! - Keep the raw query untouched for the literal verification parser

use std::net::{IpAddr, SocketAddr};

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, Method, Request};

use crate::error::GatewayError;

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_REAL_IP: HeaderName = HeaderName::from_static("x-real-ip");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");
pub const X_SESSION_DATA: HeaderName = HeaderName::from_static("x-session-data");

/// Snapshot reports are the largest bodies game servers send.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Buffered inbound request.
#[derive(Debug, Clone)]
pub struct Inbound {
    pub method: Method,
    pub path: String,
    pub raw_query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub client_ip: IpAddr,
}

impl Inbound {
    pub async fn read(request: Request<Body>, peer: SocketAddr) -> Result<Self, GatewayError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| GatewayError::BadRequest(format!("failed to read body: {}", e)))?;

        Ok(Self {
            client_ip: client_ip(&parts.headers, peer),
            method: parts.method,
            path: parts.uri.path().to_string(),
            raw_query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
        })
    }

    /// Forwarded protocol as reported by an edge proxy, else plain http.
    pub fn forwarded_proto(&self) -> &str {
        self.headers
            .get(X_FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("http")
    }
}

/// First `X-Forwarded-For` entry, then `X-Real-IP`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse().ok());
    if let Some(ip) = forwarded {
        return ip;
    }

    headers
        .get(X_REAL_IP)
        .and_then(|v| v.to_str().ok())
        .and_then(|ip| ip.trim().parse().ok())
        .unwrap_or_else(|| peer.ip())
}
