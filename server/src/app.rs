use std::sync::Arc;
use std::time::Duration;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware as actix_middleware,
    web, App, HttpServer,
};
use tokio::time;

use crate::config::AppConfig;
use crate::error::Result;
use crate::handlers;
use crate::lifecycle::TokenLifecycle;
use crate::middleware::{error_page_middleware, session_middleware};
use crate::session::{SessionCookies, SessionStore};

/// Everything the HTTP shell shares across workers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionStore,
    pub cookies: SessionCookies,
    pub lifecycle: Arc<TokenLifecycle>,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let sessions = SessionStore::new(config.session_ttl_hours);
        let cookies = SessionCookies::from_config(&config)?;
        let lifecycle = Arc::new(<TokenLifecycle>::from_config(&config)?);

        Ok(Self {
            config,
            sessions,
            cookies,
            lifecycle,
        })
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::my_posts)
        .service(handlers::search_hashtag)
        .default_service(web::to(handlers::not_found));
}

pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        // Shared state
        .app_data(web::Data::new(state.config))
        .app_data(web::Data::new(state.sessions))
        .app_data(web::Data::new(state.cookies))
        .app_data(web::Data::from(state.lifecycle))
        // Middleware, innermost first
        .wrap(actix_middleware::from_fn(error_page_middleware))
        .wrap(actix_middleware::from_fn(session_middleware))
        .wrap(actix_middleware::Logger::default())
        .configure(routes)
}

/// Binds the listener, starts the session sweeper and serves until shutdown.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let bind_addr = (config.host.clone(), config.port);
    let state = AppState::from_config(config)?;

    log::info!(
        "Proxying to {} ({:?} mode)",
        state.config.api_base_url,
        state.config.environment
    );
    log::info!("Session expiry set to {} hours", state.sessions.expiry_hours());

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let removed = sessions.cleanup_expired();
            if removed > 0 {
                log::info!("Background cleanup: removed {} expired sessions", removed);
            }
        }
    });

    log::info!("Starting HTTP server at {}:{}...", bind_addr.0, bind_addr.1);

    HttpServer::new(move || build_app(state.clone()))
        .bind(bind_addr)?
        .run()
        .await?;

    Ok(())
}
