//! gather-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints and,
//! when enabled, the PostgreSQL persistence tasks (snapshot restore on
//! boot, event log, periodic snapshots, old-snapshot cleanup).

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use gather_gateway::api;
use gather_gateway::app_state::AppState;
use gather_gateway::config::GatewayConfig;
use gather_gateway::domain::{EventBus, EventEntry, EventRegistry};
use gather_gateway::notify::LogNotifier;
use gather_gateway::persistence::postgres::PostgresPersistence;
use gather_gateway::service::{EventService, RegistrationService};
use gather_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting gather-gateway");

    // Build domain layer
    let registry = Arc::new(EventRegistry::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Persistence: restore state and spawn background tasks
    if config.persistence_enabled {
        start_persistence(&config, &registry, &event_bus).await?;
    }

    // Build service layer
    let event_service = Arc::new(EventService::new(
        Arc::clone(&registry),
        event_bus.clone(),
    ));
    let registration_service = Arc::new(RegistrationService::new(
        Arc::clone(&registry),
        event_bus.clone(),
        Arc::new(LogNotifier),
        config.auto_promote,
    ));

    // Build application state
    let app_state = AppState {
        event_service,
        registration_service,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects to PostgreSQL, restores the registry from the latest
/// snapshots, and spawns the event-log and snapshot background tasks.
async fn start_persistence(
    config: &GatewayConfig,
    registry: &Arc<EventRegistry>,
    event_bus: &EventBus,
) -> anyhow::Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    let persistence = PostgresPersistence::new(pool);

    // Restore the in-memory registry from the latest snapshots.
    let snapshots = persistence.load_latest_snapshots().await?;
    let mut restored = 0usize;
    for snapshot in snapshots {
        match serde_json::from_value::<EventEntry>(snapshot.state_json) {
            Ok(entry) => {
                if registry.insert(entry).await.is_ok() {
                    restored += 1;
                }
            }
            Err(e) => {
                tracing::warn!(event_id = %snapshot.event_id, error = %e, "skipping unreadable snapshot");
            }
        }
    }
    tracing::info!(restored, "registry restored from snapshots");

    // Prune old snapshots once at startup.
    if config.cleanup_after_days > 0 {
        let deleted = persistence
            .delete_old_snapshots(config.cleanup_after_days)
            .await?;
        if deleted > 0 {
            tracing::info!(deleted, "old snapshots removed");
        }
    }

    // Event log: append every registry event as it is published.
    if config.event_log_enabled {
        let log_persistence = persistence.clone();
        let mut rx = event_bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        let payload = serde_json::to_value(&event).unwrap_or_default();
                        let result = log_persistence
                            .save_event(
                                *event.event_id().as_uuid(),
                                event.event_type_str(),
                                &payload,
                            )
                            .await;
                        if let Err(e) = result {
                            tracing::warn!(error = %e, "failed to append to event log");
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "event log task lagged behind event bus");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    // Periodic full-registry snapshot.
    let snapshot_registry = Arc::clone(registry);
    let interval_secs = config.snapshot_interval_secs.max(1);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        ticker.tick().await; // first tick fires immediately
        loop {
            ticker.tick().await;
            for entry in snapshot_registry.snapshot().await {
                let event_id = *entry.event_id.as_uuid();
                let state = serde_json::to_value(&entry).unwrap_or_default();
                if let Err(e) = persistence.save_snapshot(event_id, &state).await {
                    tracing::warn!(%event_id, error = %e, "failed to save snapshot");
                }
            }
        }
    });

    Ok(())
}
