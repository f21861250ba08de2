//! Multi Timer - A local service hosting named countdown timers
//!
//! This is the main entry point for the multi-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use multi_timer::{
    api::create_router,
    config::Config,
    persistence::{FileStorage, MemoryStorage, Storage, TimerPersistence},
    state::AppState,
    tasks::countdown_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("multi_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting multi-timer server v{}", env!("CARGO_PKG_VERSION"));

    let storage: Arc<dyn Storage> = if config.ephemeral {
        info!("Ephemeral mode, timers are kept in memory only");
        Arc::new(MemoryStorage::new())
    } else {
        let data_dir = config.data_dir();
        info!("Storing timers in {}", data_dir.display());
        Arc::new(FileStorage::new(data_dir))
    };

    // Create application state, restoring stored timers
    let state = Arc::new(AppState::new(
        TimerPersistence::new(storage),
        config.port,
        config.host.clone(),
    ));

    // Start the countdown engine
    let countdown_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_task(countdown_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers             - Current snapshot");
    info!("  POST   /timers             - Create a timer");
    info!("  POST   /timers/:id/toggle  - Start or pause a timer");
    info!("  POST   /timers/:id/reset   - Reset a timer");
    info!("  DELETE /timers/:id         - Delete a timer");
    info!("  POST   /timers/:id/focus   - Focus a single timer");
    info!("  POST   /view/unfocus       - Back to the list view");
    info!("  GET    /events             - Snapshot stream");
    info!("  GET    /status             - Service status");
    info!("  GET    /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    let flush_state = Arc::clone(&state);
    match tokio::task::spawn_blocking(move || flush_state.flush()).await {
        Ok(Ok(())) => info!("Timers saved"),
        Ok(Err(e)) => tracing::error!("Failed to save timers on shutdown: {}", e),
        Err(e) => tracing::error!("Shutdown save task failed: {}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}
