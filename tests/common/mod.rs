//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use stats_gateway::config::{GatewayConfig, ProviderOverride};
use stats_gateway::http::HttpServer;
use stats_gateway::lifecycle::startup::build_state;
use stats_gateway::player::{MemoryPlayerStore, Pid, Player, PlayerStore};
use stats_gateway::provider::Provider;
use stats_gateway::Shutdown;

pub const ASOF: i64 = 1771369200;

/// A request as received by a mock provider.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Raw-TCP mock provider answering every request with a fixed response.
pub struct MockProvider {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockProvider {
    pub async fn start(status: u16, body: &'static str) -> Self {
        Self::start_with_headers(status, body, "").await
    }

    /// `extra_headers` are raw header lines, each terminated by `\r\n`.
    pub async fn start_with_headers(status: u16, body: &'static str, extra_headers: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    if let Some(req) = read_request(&mut socket).await {
                        recorded.lock().unwrap().push(req);
                    }
                    let response = format!(
                        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
                        status,
                        reason(status),
                        body.len(),
                        extra_headers,
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { addr, requests }
    }

    /// Accepts and reads requests but never answers them.
    pub async fn start_silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let recorded = recorded.clone();
                tokio::spawn(async move {
                    if let Some(req) = read_request(&mut socket).await {
                        recorded.lock().unwrap().push(req);
                    }
                    // hold the connection open
                    let mut rest = [0u8; 64];
                    while matches!(socket.read(&mut rest).await, Ok(n) if n > 0) {}
                });
            }
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("mock provider received no request")
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<Recorded> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(Recorded {
        method,
        target,
        headers,
        body,
    })
}

pub fn player(pid: Pid, nick: &str, provider: Provider) -> Player {
    Player {
        pid,
        nick: nick.to_string(),
        provider,
        imported: Utc::now(),
    }
}

/// Point a provider at a mock and optionally switch its verification.
pub fn route_to(config: &mut GatewayConfig, provider: Provider, mock: &MockProvider, native_verification: Option<bool>) {
    config.providers.insert(
        provider,
        ProviderOverride {
            base_url: Some(mock.base_url()),
            native_verification,
        },
    );
}

/// A running gateway bound to an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestGateway {
    pub async fn start(config: GatewayConfig, players: Vec<Player>) -> Self {
        let store: Arc<dyn PlayerStore> = Arc::new(MemoryPlayerStore::new(players));
        let mut state = build_state(&config, store).unwrap();
        state.clock = || ASOF;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server = HttpServer::new(state, Duration::from_secs(config.timeouts.request_secs));
        let rx = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, rx).await;
        });

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .no_proxy()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self { addr, client, shutdown }
    }

    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    pub async fn get(&self, path_and_query: &str) -> (u16, String) {
        let res = self.client.get(self.url(path_and_query)).send().await.expect("gateway unreachable");
        let status = res.status().as_u16();
        (status, res.text().await.unwrap())
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
