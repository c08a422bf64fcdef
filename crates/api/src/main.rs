use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use salon_api::config::ServerConfig;
use salon_api::router::build_app_router;
use salon_api::state::AppState;
use salon_db::DbPool;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "salon_api=debug,salon_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let addr = config.bind_addr();
    tracing::info!(
        %addr,
        cors_origins = ?config.cors_origins,
        timeout_secs = config.request_timeout_secs,
        "Configuration loaded",
    );

    let pool = connect_database(&config).await;

    let app = build_app_router(
        AppState {
            pool: pool.clone(),
            config: Arc::new(config.clone()),
        },
        &config,
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "Salon API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    pool.close().await;
    tracing::info!("Shutdown complete");
}

/// Install the global subscriber. `LOG_FORMAT=json` emits one JSON object
/// per line for log shipping; anything else uses the human-readable format.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Connect, verify and migrate. Any failure aborts startup.
async fn connect_database(config: &ServerConfig) -> DbPool {
    let pool = salon_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    salon_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    salon_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!(
        max_connections = config.db_max_connections,
        "Database ready",
    );
    pool
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = ctrl_c => "SIGINT",
        () = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutting down; draining in-flight requests");
}
