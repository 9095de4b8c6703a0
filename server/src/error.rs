use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use serde_json::{json, Value};

use crate::upstream::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum BffError {
    #[error("Token issuance failed: {0}")]
    TokenIssuance(#[source] UpstreamError),

    #[error("Upstream request failed: {0}")]
    Upstream(#[source] UpstreamError),

    #[error("No route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl BffError {
    pub fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            BffError::TokenIssuance(err) | BffError::Upstream(err) => Some(err),
            _ => None,
        }
    }

    /// Message shown to the browser. Upstream failures surface the upstream's
    /// own `message` field when it sent one.
    pub fn public_message(&self) -> String {
        self.upstream()
            .and_then(UpstreamError::message)
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }

    /// Internal detail, only rendered outside production.
    pub fn detail(&self) -> Value {
        match self {
            BffError::TokenIssuance(err) => upstream_detail("token_issuance", err),
            BffError::Upstream(err) => upstream_detail("upstream", err),
            BffError::RouteNotFound { method, path } => json!({
                "kind": "route_not_found",
                "method": method,
                "path": path,
            }),
            BffError::Config(message) => json!({ "kind": "config", "cause": message }),
        }
    }
}

fn upstream_detail(kind: &str, err: &UpstreamError) -> Value {
    json!({
        "kind": kind,
        "upstream_status": err.status(),
        "upstream_body": err.body(),
        "cause": err.to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: String, error: Option<Value>) -> Self {
        Self {
            success: false,
            status: status.as_u16(),
            message,
            error,
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        HttpResponse::build(status).json(self)
    }
}

impl ResponseError for BffError {
    fn status_code(&self) -> StatusCode {
        match self {
            BffError::TokenIssuance(err) | BffError::Upstream(err) => err
                .status()
                .and_then(|status| StatusCode::from_u16(status).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            BffError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            BffError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        ErrorBody::new(self.status_code(), self.public_message(), None).into_response()
    }
}

pub type Result<T> = std::result::Result<T, BffError>;
