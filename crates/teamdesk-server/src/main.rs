//! TeamDesk Onboarding Server
//!
//! An async Rust server that accepts employee onboarding submissions and
//! serves the admin review and export API.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teamdesk_server::{
    auth::{hash_password, TokenSigner},
    config::{AdminConfig, AppConfig, DatabaseConfig, LogFormat, StorageBackend},
    db::create_pool,
    routes::build_router,
    state::AppState,
    store::{AdminUser, PgStore, SheetStore, SubmissionStore},
};

/// Initialize tracing/logging.
fn init_tracing(format: LogFormat) {
    let json = format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,teamdesk_server=debug,tower_http=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

/// Open the configured storage backend.
async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn SubmissionStore>> {
    match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = create_pool(&db_config).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        StorageBackend::Spreadsheet => {
            let store = SheetStore::open(config.data_dir.clone()).await?;
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let app_config = AppConfig::from_env();
    let log_format = app_config
        .as_ref()
        .map(|c| c.log_format)
        .unwrap_or(LogFormat::Text);
    init_tracing(log_format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting TeamDesk onboarding server"
    );

    // Load configuration; unset variables take defaults, bad values are fatal
    let app_config = app_config.inspect_err(|e| {
        tracing::error!(error = %e, "Invalid ONBOARD_* configuration");
    })?;

    let admin_config = AdminConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Invalid ADMIN_* configuration");
    })?;

    if admin_config.uses_default_secret() {
        tracing::warn!("ADMIN_TOKEN_SECRET not set, using default (not secure for production)");
    }

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        storage = app_config.storage.as_str(),
        strict_validation = app_config.strict_validation,
        "Configuration loaded"
    );

    // Open storage and seed the admin account
    let store = match open_store(&app_config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(
                error = %e,
                "Failed to initialize storage; set DATABASE_URL or PGHOST, PGPORT, PGDATABASE, PGUSER, PGPASSWORD"
            );
            return Err(e);
        }
    };

    let admin = AdminUser {
        username: admin_config.username.clone(),
        password_hash: hash_password(&admin_config.password),
    };
    if let Err(e) = store.init(&admin).await {
        tracing::error!(error = %e, storage = store.backend(), "Failed to initialize storage");
        return Err(e.into());
    }

    let signer = TokenSigner::new(&admin_config.token_secret, admin_config.token_ttl_seconds);

    // Bind to address
    let addr: SocketAddr = app_config.bind_address().parse()?;

    let state = AppState::new(store, signer, app_config);
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Admin login: http://localhost:{}/admin/login", addr.port());

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
