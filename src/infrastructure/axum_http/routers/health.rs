use crate::{
    application::usecases::health::{
        AppHeartbeatExtension, DatabaseHealthCheck, HealthCheck, HealthUseCase,
        HeartbeatExtension,
    },
    config::config_model::DotEnvyConfig,
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad, repositories::health::PostgresConnectionProbe,
    },
};
use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use std::sync::Arc;
use tracing::{info, warn};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let connection_probe = PostgresConnectionProbe::new(Arc::clone(&db_pool));
    let database_check: Arc<dyn HealthCheck + Send + Sync> = Arc::new(DatabaseHealthCheck::new(
        Arc::new(connection_probe),
        Some(config.database.url.as_str()),
    ));
    let build_info: Arc<dyn HeartbeatExtension + Send + Sync> = Arc::new(
        AppHeartbeatExtension::new(config.heartbeat.build_timestamp.clone()),
    );

    router(Arc::new(HealthUseCase::new(
        vec![database_check],
        vec![build_info],
    )))
}

pub fn router(usecase: Arc<HealthUseCase>) -> Router {
    Router::new()
        .route("/health-check", get(health_check))
        .route("/heartbeat", get(heartbeat))
        .with_state(usecase)
}

pub async fn health_check(State(usecase): State<Arc<HealthUseCase>>) -> impl IntoResponse {
    info!("health: health_check handler invoked");
    let results = usecase.run_checks().await;

    if results.iter().all(|result| result.is_healthy()) {
        (StatusCode::OK, Json(results)).into_response()
    } else {
        warn!(
            failed = results.iter().filter(|result| !result.is_healthy()).count(),
            "health: one or more checks failed"
        );
        (StatusCode::SERVICE_UNAVAILABLE, Json(results)).into_response()
    }
}

pub async fn heartbeat(State(usecase): State<Arc<HealthUseCase>>) -> impl IntoResponse {
    (StatusCode::OK, Json(usecase.heartbeat())).into_response()
}
