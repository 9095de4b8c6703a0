//! Calls to the upstream API: token issuance and bearer-authenticated
//! resource fetches.

mod client;
mod error;

use std::future::Future;

use serde_json::Value;

pub use client::UpstreamClient;
pub use error::{UpstreamError, TOKEN_EXPIRED_STATUS};

/// The two upstream operations the token lifecycle depends on.
pub trait UpstreamApi: Send + Sync + 'static {
    /// `POST {base}/token` with the shared client secret. Returns the issued token.
    fn issue_token(
        &self,
        client_secret: &str,
    ) -> impl Future<Output = Result<String, UpstreamError>> + Send;

    /// `GET {base}{path}` with `Authorization: <token>`. Returns the payload verbatim.
    fn fetch(
        &self,
        path: &str,
        token: &str,
    ) -> impl Future<Output = Result<Value, UpstreamError>> + Send;
}
