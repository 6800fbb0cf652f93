use rtcalling::application::{register_calling_bot, AnswerCall, CallingBot};
use rtcalling::config::Config;
use rtcalling::interface::api::{build_router, init_metrics, AppState};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting RtCalling service");
    info!("Configuration loaded: {:?}", config);

    // Register the bot and the session factory
    let bot = register_calling_bot(
        config.calling.clone(),
        CallingBot::factory(),
        AnswerCall::factory(json!({})),
    )?;

    // Initialize metrics exporter
    info!("Initializing Prometheus metrics exporter");
    let prometheus_handle = init_metrics()?;

    let app = build_router(AppState::new(bot), prometheus_handle);
    let bind = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Calling API listening on {}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down...");
        })
        .await?;

    Ok(())
}
