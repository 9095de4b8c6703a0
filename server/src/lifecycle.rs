//! Bearer-token lifecycle around upstream resource fetches.
//!
//! The token lives in the browser's session. It is issued on first use,
//! reused across requests, and reissued when the upstream answers
//! [`TOKEN_EXPIRED_STATUS`]. A logical fetch makes at most `max_attempts`
//! resource calls.

use serde_json::Value;

use crate::config::AppConfig;
use crate::error::{BffError, Result};
use crate::session::Session;
use crate::upstream::{UpstreamApi, UpstreamClient, TOKEN_EXPIRED_STATUS};

pub struct TokenLifecycle<A = UpstreamClient> {
    api: A,
    client_secret: String,
    max_attempts: u32,
}

impl TokenLifecycle<UpstreamClient> {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self::new(
            UpstreamClient::from_config(config)?,
            config.client_secret.clone(),
            config.token_max_attempts,
        ))
    }
}

impl<A: UpstreamApi> TokenLifecycle<A> {
    pub fn new(api: A, client_secret: impl Into<String>, max_attempts: u32) -> Self {
        Self {
            api,
            client_secret: client_secret.into(),
            max_attempts: max_attempts.max(1),
        }
    }

    #[cfg(test)]
    pub fn api(&self) -> &A {
        &self.api
    }

    #[cfg(test)]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Fetches `path` from the upstream with the session's token, issuing
    /// or reissuing the token as needed.
    ///
    /// Token issuance failures are returned as [`BffError::TokenIssuance`]
    /// and are never retried. A 419 clears the session token and starts
    /// over; every other upstream failure is returned as
    /// [`BffError::Upstream`] with the token left in place.
    pub async fn fetch_resource(&self, session: &mut Session, path: &str) -> Result<Value> {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let token = self.ensure_token(session).await?;

            match self.api.fetch(path, &token).await {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_token_expired() => {
                    session.clear_token();

                    if attempt >= self.max_attempts {
                        log::warn!(
                            "Upstream kept answering {} for {} after {} attempts (session {})",
                            TOKEN_EXPIRED_STATUS,
                            path,
                            attempt,
                            session.id()
                        );
                        return Err(BffError::Upstream(err));
                    }

                    log::warn!(
                        "Token expired for session {}, reissuing before retrying {}",
                        session.id(),
                        path
                    );
                }
                Err(err) => {
                    log::debug!("Upstream request {} failed: {}", path, err);
                    return Err(BffError::Upstream(err));
                }
            }
        }
    }

    async fn ensure_token(&self, session: &mut Session) -> Result<String> {
        if let Some(token) = session.token() {
            return Ok(token);
        }

        let token = self
            .api
            .issue_token(&self.client_secret)
            .await
            .map_err(|err| {
                log::error!("Token issuance failed for session {}: {}", session.id(), err);
                BffError::TokenIssuance(err)
            })?;

        session.set_token(token.clone());
        log::info!("Issued upstream token for session {}", session.id());

        Ok(token)
    }
}
