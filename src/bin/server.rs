use jaljalgotcha::api::{build_router, AppState};
use jaljalgotcha::utils::{logger, validation::Validate};
use jaljalgotcha::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_server_logger();

    let config = match std::env::var("JALJALGOTCHA_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            AppConfig::from_file(&path)?
        }
        Err(_) => AppConfig::from_env(),
    };

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let addr = config.bind_addr()?;
    let app = build_router(AppState::from_config(&config));

    tracing::info!(
        "Listening on {} (default source: {})",
        addr,
        config.source.kind
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
