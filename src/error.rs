//! Request-level errors and their HTTP mapping.
//!
//! Protocol-level failures (malformed game queries) never reach this type;
//! they are answered with a protocol syntax error and HTTP 200.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::modify::ModifyError;
use crate::player::StoreError;
use crate::provider::Provider;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("player store: {0}")]
    Store(#[from] StoreError),

    #[error("upstream request to {provider} failed: {source}")]
    Upstream {
        provider: Provider,
        #[source]
        source: reqwest::Error,
    },

    #[error("modifier failed for {provider}: {source}")]
    Modify {
        provider: Provider,
        #[source]
        source: ModifyError,
    },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,
}

#[derive(Serialize)]
struct ErrorBody {
    message: &'static str,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Store(_) | GatewayError::Upstream { .. } | GatewayError::Modify { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Conflict => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let message = status.canonical_reason().unwrap_or("Error");
        (status, Json(ErrorBody { message })).into_response()
    }
}
