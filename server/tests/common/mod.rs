#![allow(dead_code)]

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use bff::config::{AppConfig, Environment};
use bff::AppState;

pub const CLIENT_SECRET: &str = "test-client-secret";

pub fn test_config(api_base_url: &str) -> AppConfig {
    AppConfig {
        client_secret: CLIENT_SECRET.to_string(),
        cookie_secret: "test-cookie-secret".to_string(),
        api_base_url: api_base_url.to_string(),
        request_timeout_secs: 5,
        ..AppConfig::default()
    }
}

pub fn test_state(api_base_url: &str) -> AppState {
    AppState::from_config(test_config(api_base_url)).expect("valid test state")
}

pub fn state_in(api_base_url: &str, environment: Environment) -> AppState {
    let config = AppConfig {
        environment,
        ..test_config(api_base_url)
    };
    AppState::from_config(config).expect("valid test state")
}

/// Stores `token` in a fresh session and returns the signed cookie naming it.
pub fn session_with_token(state: &AppState, token: &str) -> (String, Cookie<'static>) {
    let mut session = state.sessions.open(None);
    session.set_token(token);
    let cookie = Cookie::new(state.cookies.name(), state.cookies.sign(session.id()));
    (session.id().to_string(), cookie)
}

/// Session id carried by the response's session cookie, if one was issued.
pub fn issued_session_id<B>(state: &AppState, resp: &ServiceResponse<B>) -> Option<String> {
    resp.response()
        .cookies()
        .find(|cookie| cookie.name() == state.cookies.name())
        .and_then(|cookie| state.cookies.verify(cookie.value()))
}
