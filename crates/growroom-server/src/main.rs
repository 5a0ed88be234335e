mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use growroom_api::accounts::TokenKeys;
use growroom_api::{AppState, AppStateInner};
use growroom_db::Database;

use crate::config::{Config, DbLocation};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "growroom_server=debug,growroom_api=debug,growroom_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("Failed to load configuration: {}", err);
            eprintln!("FATAL: {err}");
            eprintln!(
                "       Set JWT_SECRET (optionally DB_CONNECTION_STRING, PORT) in your .env file."
            );
            std::process::exit(1);
        }
    };

    // Init database
    let db = match &config.db {
        DbLocation::File(path) => Database::open(path)?,
        DbLocation::Memory => {
            info!("Using in-memory database; data is lost on exit");
            Database::open_in_memory()?
        }
    };

    let app_state: AppState = Arc::new(AppStateInner {
        db,
        tokens: TokenKeys::new(
            &config.jwt_secret,
            chrono::Duration::minutes(config.token_ttl_minutes),
        ),
    });

    let app = growroom_api::router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Growroom server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Growroom server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        else {
            error!("Failed to install SIGTERM handler; only Ctrl+C will stop the server");
            ctrl_c.await.ok();
            return;
        };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
