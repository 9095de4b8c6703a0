use actix_web::cookie::{time::Duration, Cookie, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::manager::MAX_EXPIRY_HOURS;
use crate::config::AppConfig;
use crate::error::{BffError, Result};

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE_NAME: &str = "bff.sid";

/// Issues and verifies the signed session cookie. The cookie value is
/// `{session_id}.{base64url(hmac_sha256(session_id))}`.
#[derive(Clone)]
pub struct SessionCookies {
    keyed_mac: HmacSha256,
    secure: bool,
    max_age_hours: u64,
}

impl SessionCookies {
    pub fn new(secret: &[u8], secure: bool, max_age_hours: u64) -> Result<Self> {
        if secret.is_empty() {
            return Err(BffError::Config("cookie secret is empty".to_string()));
        }
        let keyed_mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| BffError::Config(format!("Invalid cookie secret: {}", e)))?;

        Ok(Self {
            keyed_mac,
            secure,
            max_age_hours: max_age_hours.min(MAX_EXPIRY_HOURS),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.cookie_secret.as_bytes(),
            config.cookie_secure,
            config.session_ttl_hours,
        )
    }

    pub fn name(&self) -> &'static str {
        SESSION_COOKIE_NAME
    }

    pub fn sign(&self, session_id: &str) -> String {
        let signature = URL_SAFE_NO_PAD.encode(self.mac(session_id).finalize().into_bytes());
        format!("{session_id}.{signature}")
    }

    /// Returns the session id when the signature checks out.
    pub fn verify(&self, value: &str) -> Option<String> {
        let (session_id, signature_b64) = value.rsplit_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;

        self.mac(session_id).verify_slice(&signature).ok()?;
        Some(session_id.to_string())
    }

    pub fn build(&self, session_id: &str) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE_NAME, self.sign(session_id))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(Duration::hours(self.max_age_hours as i64))
            .finish()
    }

    fn mac(&self, session_id: &str) -> HmacSha256 {
        let mut mac = self.keyed_mac.clone();
        mac.update(session_id.as_bytes());
        mac
    }
}
