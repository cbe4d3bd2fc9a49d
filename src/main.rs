use axum::routing::{get, post, put};
use axum::Router;
use psp_router::config::AppConfig;
use psp_router::repo::payment_attempts_repo::PaymentAttemptsRepo;
use psp_router::repo::payments_repo::PaymentsRepo;
use psp_router::repo::psps_repo::PspsRepo;
use psp_router::repo::routing_config_repo::RoutingConfigRepo;
use psp_router::service::routing_service::RoutingService;
use psp_router::AppState;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let routing_config_repo = RoutingConfigRepo { pool: pool.clone() };
    let psps_repo = PspsRepo { pool: pool.clone() };
    let payments_repo = PaymentsRepo { pool: pool.clone() };
    let payment_attempts_repo = PaymentAttemptsRepo { pool: pool.clone() };

    let routing_service = RoutingService {
        routing_config_repo: routing_config_repo.clone(),
        psps_repo: psps_repo.clone(),
        payments_repo,
        payment_attempts_repo: payment_attempts_repo.clone(),
    };

    let state = AppState {
        routing_service,
        routing_config_repo,
        psps_repo,
        payment_attempts_repo,
    };

    let app = Router::new()
        .route("/health", get(psp_router::http::handlers::payments::health))
        .route("/payments", post(psp_router::http::handlers::payments::create_payment))
        .route(
            "/payments/:payment_id/attempts",
            get(psp_router::http::handlers::payments::list_attempts),
        )
        .route(
            "/routing/store/:store_id",
            get(psp_router::http::handlers::routing::get_routing_config)
                .put(psp_router::http::handlers::routing::upsert_routing_config),
        )
        .route(
            "/routing/store/:store_id/weights",
            put(psp_router::http::handlers::routing::replace_weights),
        )
        .route(
            "/routing/store/:store_id/fallback",
            put(psp_router::http::handlers::routing::replace_fallback_sequence),
        )
        .route(
            "/stores/:store_id/psps",
            get(psp_router::http::handlers::psps::list_store_psps),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
