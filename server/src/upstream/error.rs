use serde_json::Value;

/// Status the upstream uses to say the bearer token has expired.
pub const TOKEN_EXPIRED_STATUS: u16 = 419;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream responded with status {status}")]
    Status { status: u16, body: Value },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned a malformed body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("token endpoint did not return a token")]
    MissingToken { message: Option<String> },
}

impl UpstreamError {
    /// HTTP status of the upstream response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            UpstreamError::Transport(err) => err.status().map(|status| status.as_u16()),
            UpstreamError::Decode(_) | UpstreamError::MissingToken { .. } => None,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            UpstreamError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The upstream's human readable `message`, when present.
    pub fn message(&self) -> Option<&str> {
        match self {
            UpstreamError::Status { body, .. } => body.get("message").and_then(Value::as_str),
            UpstreamError::MissingToken { message } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_token_expired(&self) -> bool {
        self.status() == Some(TOKEN_EXPIRED_STATUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_419_means_expired() {
        let expired = UpstreamError::Status {
            status: 419,
            body: json!({ "code": 419, "message": "token expired" }),
        };
        let forbidden = UpstreamError::Status {
            status: 403,
            body: Value::Null,
        };

        assert!(expired.is_token_expired());
        assert!(!forbidden.is_token_expired());
        assert_eq!(expired.message(), Some("token expired"));
        assert_eq!(forbidden.message(), None);
    }

    #[test]
    fn missing_token_has_no_status() {
        let err = UpstreamError::MissingToken {
            message: Some("unregistered domain".to_string()),
        };
        assert_eq!(err.status(), None);
        assert!(!err.is_token_expired());
        assert_eq!(err.message(), Some("unregistered domain"));
    }
}
