use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, ORIGIN};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{UpstreamApi, UpstreamError};
use crate::config::AppConfig;
use crate::error::{BffError, Result};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
    message: Option<String>,
}

/// reqwest-backed client for the upstream API rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str, origin: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let origin = HeaderValue::from_str(origin)
            .map_err(|e| BffError::Config(format!("Invalid origin header '{}': {}", origin, e)))?;
        headers.insert(ORIGIN, origin);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| BffError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.api_base_url, &config.origin, config.request_timeout())
    }

    #[cfg(test)]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_json(response: reqwest::Response) -> std::result::Result<Value, UpstreamError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        // Error bodies are kept for the error page even when they are not JSON.
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        Err(UpstreamError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl UpstreamApi for UpstreamClient {
    async fn issue_token(&self, client_secret: &str) -> std::result::Result<String, UpstreamError> {
        let url = format!("{}/token", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&TokenRequest { client_secret })
            .send()
            .await?;

        let issued: TokenResponse = serde_json::from_value(Self::read_json(response).await?)?;
        issued.token.ok_or(UpstreamError::MissingToken {
            message: issued.message,
        })
    }

    async fn fetch(&self, path: &str, token: &str) -> std::result::Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, token)
            .send()
            .await?;

        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = UpstreamClient::new(
            "http://localhost:8002/v1/",
            "http://localhost:4000",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.base_url(), "http://localhost:8002/v1");
    }

    #[test]
    fn rejects_invalid_origin() {
        let result = UpstreamClient::new(
            "http://localhost:8002/v1",
            "http://bad\norigin",
            Duration::from_secs(5),
        );

        assert!(matches!(result, Err(BffError::Config(_))));
    }

    #[test]
    fn token_request_uses_camel_case() {
        let body = serde_json::to_value(TokenRequest {
            client_secret: "s3cret",
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "clientSecret": "s3cret" }));
    }
}
