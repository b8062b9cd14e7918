// SPDX-License-Identifier: GPL-3.0-only

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::api::FetchError;

/// Every failure a request can end with
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The requested resource does not exist upstream, or a filter matched nothing
    #[error("{0}")]
    NotFound(String),

    #[error("upstream error: {0}")]
    Upstream(#[source] FetchError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::NotFound(_) => StatusCode::NOT_FOUND,
            ProxyError::Upstream(_) | ProxyError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// What the client gets to read. Upstream failures stay in the log, they carry
    /// the upstream host and url.
    pub fn client_message(&self) -> String {
        match self {
            ProxyError::Upstream(_) => "Unexpected error".to_string(),
            other => other.to_string(),
        }
    }

    /// Turns an upstream 404 on the resource a route is about into a [`ProxyError::NotFound`]
    pub fn not_found_or_upstream(err: FetchError, message: impl FnOnce() -> String) -> Self {
        if err.is_not_found() {
            ProxyError::NotFound(message())
        } else {
            err.into()
        }
    }
}

impl From<FetchError> for ProxyError {
    fn from(err: FetchError) -> Self {
        match err {
            // The client sent it, upstream never saw it
            FetchError::InvalidIdentifier(_) => ProxyError::BadRequest(err.to_string()),
            err => ProxyError::Upstream(err),
        }
    }
}

/// Uniform error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        } else {
            warn!(%status, error = %self, "request rejected");
        }

        let body = ErrorBody {
            success: false,
            error: self.client_message(),
        };

        (status, Json(body)).into_response()
    }
}
