use bff::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development)
    // Try loading from current directory first, then from server/ directory
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("server/.env").ok();
    }

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting backend-for-frontend...");

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Hint: set CLIENT_SECRET and COOKIE_SECRET, or point CONFIG_PATH at a TOML file");
        std::process::exit(1);
    });

    bff::run(config).await
}
