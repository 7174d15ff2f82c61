use crate::{
    application::{
        retry::RetryPolicy,
        usecases::{activities::ActivitiesUseCase, activity_data_access::ActivityDataAccess},
    },
    config::config_model::DotEnvyConfig,
    domain::{
        repositories::activities::ActivityRepository,
        value_objects::activities::{ActivityModel, ActivityPatch},
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad, repositories::activities::ActivityPostgres,
    },
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let activity_repository = ActivityPostgres::new(Arc::clone(&db_pool));
    let activity_data_access = ActivityDataAccess::new(
        Arc::new(activity_repository),
        RetryPolicy::from(&config.retry),
        config.audit.actor.clone(),
    );
    let usecase = ActivitiesUseCase::new(Arc::new(activity_data_access));

    router(Arc::new(usecase))
}

pub fn router<T>(usecase: Arc<ActivitiesUseCase<T>>) -> Router
where
    T: ActivityRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/create", post(create_activity))
        .route("/update/:id", put(update_activity))
        .route("/partial-update/:id", patch(partial_update_activity))
        .route("/delete/:id", delete(delete_activity))
        .route("/categories", get(fetch_all_categories))
        .with_state(usecase)
}

/// Positive row counts map to `success`, zero to `failed`; both are plain
/// text bodies.
fn respond(result: usize, success: &'static str, failed: &'static str) -> axum::response::Response {
    if result > 0 {
        (StatusCode::OK, success).into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, failed).into_response()
    }
}

pub async fn create_activity<T>(
    State(usecase): State<Arc<ActivitiesUseCase<T>>>,
    Json(activity_model): Json<ActivityModel>,
) -> impl IntoResponse
where
    T: ActivityRepository + Send + Sync + 'static,
{
    info!(category = %activity_model.category, "activities: create request received");

    match usecase.create_activity(activity_model).await {
        Ok(result) => respond(
            result,
            "Activity created successfully.",
            "Failed to create activity.",
        ),
        Err(err) => {
            error!(error = ?err, "activities: failed to create activity");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while creating the activity.",
            )
                .into_response()
        }
    }
}

pub async fn update_activity<T>(
    State(usecase): State<Arc<ActivitiesUseCase<T>>>,
    Path(activity_id): Path<Uuid>,
    Json(activity_model): Json<ActivityModel>,
) -> impl IntoResponse
where
    T: ActivityRepository + Send + Sync + 'static,
{
    info!(%activity_id, "activities: update request received");

    match usecase.update_activity(activity_id, activity_model).await {
        Ok(result) => respond(
            result,
            "Activity updated successfully.",
            "Failed to update activity.",
        ),
        Err(err) => {
            error!(%activity_id, error = ?err, "activities: failed to update activity");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while updating the activity.",
            )
                .into_response()
        }
    }
}

pub async fn partial_update_activity<T>(
    State(usecase): State<Arc<ActivitiesUseCase<T>>>,
    Path(activity_id): Path<Uuid>,
    Json(fields): Json<Map<String, Value>>,
) -> impl IntoResponse
where
    T: ActivityRepository + Send + Sync + 'static,
{
    info!(%activity_id, "activities: partial update request received");

    let outcome = match ActivityPatch::try_from(fields) {
        Ok(patch) => usecase.partial_update_activity(activity_id, patch).await,
        Err(err) => {
            warn!(%activity_id, error = %err, "activities: rejected partial update body");
            Err(err)
        }
    };

    match outcome {
        Ok(result) => respond(
            result,
            "Activity partially updated successfully.",
            "Failed to partially update activity.",
        ),
        Err(err) => {
            error!(%activity_id, error = ?err, "activities: failed to partially update activity");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while partially updating the activity.",
            )
                .into_response()
        }
    }
}

pub async fn delete_activity<T>(
    State(usecase): State<Arc<ActivitiesUseCase<T>>>,
    Path(activity_id): Path<Uuid>,
) -> impl IntoResponse
where
    T: ActivityRepository + Send + Sync + 'static,
{
    info!(%activity_id, "activities: delete request received");

    match usecase.delete_activity(activity_id).await {
        Ok(result) => respond(
            result,
            "Activity deleted successfully.",
            "Failed to delete activity.",
        ),
        Err(err) => {
            error!(%activity_id, error = ?err, "activities: failed to delete activity");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while deleting the activity.",
            )
                .into_response()
        }
    }
}

pub async fn fetch_all_categories<T>(
    State(usecase): State<Arc<ActivitiesUseCase<T>>>,
) -> impl IntoResponse
where
    T: ActivityRepository + Send + Sync + 'static,
{
    info!("activities: categories request received");

    match usecase.fetch_all_categories().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(err) => {
            error!(error = ?err, "activities: failed to fetch categories");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
