use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Missing or invalid configuration (e.g. no database password) is fatal.
    let cfg = noteboard::config::Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        host = %cfg.database.host,
        port = cfg.database.port,
        database = %cfg.database.name,
        pool_capacity = cfg.database.max_connections,
        "initializing storage"
    );

    // Schema initialization runs before the listener binds; an unreachable
    // database server at startup is fatal.
    let storage = noteboard::db::NotesStorage::connect(&cfg.database).await?;

    let state = noteboard::router::AppState::new(storage);
    let app = noteboard::router::noteboard_router(state);

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;
    Ok(())
}
