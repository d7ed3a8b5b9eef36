use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use salesboard_api::{create_router, ApiState, Settings, StoreKind};
use salesboard_db::{Database, MemoryStore, RecordStore};
use salesboard_import::DatasetImporter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "salesboard_api=debug,salesboard_import=debug,salesboard_db=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get configuration
    let settings = Settings::from_env().context("Failed to load settings")?;
    let origins = settings
        .origin_policy()
        .context("ALLOWED_ORIGINS contains an invalid origin")?;

    // Initialize store
    let (store, database): (Arc<dyn RecordStore>, Option<Database>) = match settings.store {
        StoreKind::Postgres => {
            let url = settings
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when STORE=postgres")?;
            let database = Database::new(url).await?;
            database.init_schema().await?;
            let store: Arc<dyn RecordStore> = Arc::new(database.clone());
            (store, Some(database))
        }
        StoreKind::Memory => {
            tracing::warn!("STORE=memory, records will not outlive the process");
            let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
            (store, None)
        }
    };

    // Create app state
    let state = ApiState::new(
        store,
        DatasetImporter::new(settings.dataset_url.clone()),
        settings.date_matching(),
    );

    // Build router
    let app = create_router(state, origins);

    // Start server
    let addr = format!("0.0.0.0:{}", settings.port);
    tracing::info!("Salesboard API running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(database) = database {
        database.close().await;
        tracing::info!("Database connections closed");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
