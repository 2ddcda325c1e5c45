//! Route handlers.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::asp;
use crate::error::GatewayError;
use crate::http::forward::protocol_response;
use crate::http::request::Inbound;
use crate::http::server::AppState;
use crate::player::{Lookup, Pid, Player};
use crate::provider::Provider;
use crate::verify::Decision;

#[derive(Debug, Deserialize)]
pub struct PidParams {
    pub pid: Option<Pid>,
}

/// Stats reads routed by the player's provider.
pub async fn dynamic_forward(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    params: Result<Query<PidParams>, QueryRejection>,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let asof = (state.clock)();
    let Ok(Query(params)) = params else {
        return Ok(protocol_response(&asp::Response::syntax_error(asof)));
    };

    let inbound = Inbound::read(request, peer).await?;
    let provider = state
        .resolver
        .resolve(params.pid, Some(inbound.client_ip))
        .await
        .inspect_err(|e| tracing::error!(pid = ?params.pid, error = %e, "Player lookup failed"))?;

    state.forwarder.forward(provider, inbound, asof).await
}

/// Any other `.aspx` endpoint, routed by server or default provider.
pub async fn static_forward(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(path): Path<String>,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    if !path.ends_with(".aspx") {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let asof = (state.clock)();
    let inbound = Inbound::read(request, peer).await?;
    let provider = state.resolver.server_or_default(Some(inbound.client_ip));
    state.forwarder.forward(provider, inbound, asof).await
}

pub async fn verify_player(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Result<Response, GatewayError> {
    let asof = (state.clock)();
    let inbound = Inbound::read(request, peer).await?;

    let decision = state
        .verifier
        .verify(inbound.raw_query.as_deref(), Some(inbound.client_ip), asof)
        .await
        .inspect_err(|e| tracing::error!(ip = %inbound.client_ip, error = %e, "Player lookup failed"))?;

    match decision {
        Decision::Respond(resp) => Ok(protocol_response(&resp)),
        Decision::Forward(provider) => state.forwarder.forward(provider, inbound, asof).await,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub pid: Pid,
    pub nick: String,
    pub provider: Provider,
    pub profile_url: Option<String>,
}

impl From<Player> for PlayerDto {
    fn from(player: Player) -> Self {
        Self {
            profile_url: player.provider.profile_url(player.pid),
            pid: player.pid,
            nick: player.nick,
            provider: player.provider,
        }
    }
}

pub async fn get_player(State(state): State<AppState>, Path(raw): Path<String>) -> Result<Json<PlayerDto>, GatewayError> {
    let pid: Pid = raw
        .parse()
        .ok()
        .filter(|pid| *pid > 0)
        .ok_or_else(|| GatewayError::BadRequest(format!("invalid pid {:?}", raw)))?;

    match state.store.find_by_pid(pid).await? {
        Lookup::Found(player) => Ok(Json(player.into())),
        Lookup::NotFound => Err(GatewayError::NotFound),
        Lookup::MultipleFound => Err(GatewayError::Conflict),
    }
}
