use std::{net::SocketAddr, time::Duration};

use axum::{Router, middleware, routing::get};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use zb_api::{ApiConfig, ApiState};

/// Longest a request waits for a database connection
const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    zb_api::tracing::init_tracing(&config.env);

    let metrics_handle = zb_api::metrics::init_metrics()?;
    tracing::info!("Prometheus metrics exporter initialized");

    // Lazy so the server comes up even when the database is down
    let pool = zb_db::create_lazy_pool(
        &config.database_url,
        config.db_max_connections,
        DB_ACQUIRE_TIMEOUT,
    )?;

    // Schema is owned by the migrate binary; only report what is missing
    match zb_db::missing_tables(&pool).await {
        Ok(missing) if missing.is_empty() => {}
        Ok(missing) => tracing::warn!(
            ?missing,
            "Database schema is incomplete, run the migrate binary first"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            "Database unreachable, serving degraded until /health/ready reports ready"
        ),
    }

    let state = ApiState::new(&config, pool)?;

    let cors = zb_api::middleware::cors::create_cors_layer(config.parsed_allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let metrics_app = Router::new()
        .route("/metrics", get(zb_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = zb_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(zb_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            zb_api::middleware::request_id::request_id_middleware,
        ));

    let app = zb_api::middleware::security_headers::apply_security_headers(app, config.env);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.env,
        mastery_policy = ?config.mastery_policy,
        "Server listening"
    );

    // Rate limiting keys on the peer address
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
