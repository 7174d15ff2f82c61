use std::{collections::HashSet, sync::Arc};

use anyhow::Result;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    application::retry::RetryPolicy,
    domain::{
        errors::{DataAccessError, is_retryable, is_validation},
        repositories::activities::ActivityRepository,
        value_objects::activities::{ActivityModel, ActivityPatch},
    },
};

const UPSERT_FAILED: &str = "An exception occurred while upserting a record.";
const UPDATE_FAILED: &str = "An exception occurred while updating a record.";
const PARTIAL_UPDATE_FAILED: &str = "An exception occurred while partially updating a record.";
const DELETE_FAILED: &str = "An exception occurred while deleting a record.";
const FETCH_CATEGORIES_FAILED: &str = "An exception occurred while fetching categories.";

/// Runs every activity datastore call through the retry policy and reduces
/// failures to the data access error kinds. Mutations report the number of
/// affected records, 0 meaning the activity does not exist.
pub struct ActivityDataAccess<T>
where
    T: ActivityRepository + Send + Sync,
{
    activity_repository: Arc<T>,
    retry_policy: RetryPolicy,
    actor: String,
}

impl<T> ActivityDataAccess<T>
where
    T: ActivityRepository + Send + Sync,
{
    pub fn new(activity_repository: Arc<T>, retry_policy: RetryPolicy, actor: impl Into<String>) -> Self {
        Self {
            activity_repository,
            retry_policy,
            actor: actor.into(),
        }
    }

    pub async fn save_or_update(&self, activity_model: ActivityModel) -> Result<usize> {
        let result = async {
            let activity_entity = activity_model.to_entity(&self.actor)?;
            let repository = &self.activity_repository;

            let activity_id = self
                .retry_policy
                .execute("save_or_update_activity", |attempt| {
                    info!(
                        attempt,
                        activity = %activity_entity.activity,
                        category = %activity_entity.category,
                        price = activity_entity.price,
                        "saving or updating activity"
                    );
                    let activity_entity = activity_entity.clone();
                    async move { repository.save(activity_entity).await }
                })
                .await?;

            info!(%activity_id, "activity saved or updated");
            Ok::<_, anyhow::Error>(1)
        }
        .await;

        result.map_err(|err| report_failure(err, UPSERT_FAILED))
    }

    /// Replaces every client-owned field of an existing activity.
    pub async fn update(&self, activity_id: Uuid, activity_model: ActivityModel) -> Result<usize> {
        let result = async {
            let patch = ActivityPatch::try_from(activity_model)?;
            self.apply_patch(activity_id, &patch, "update_activity").await
        }
        .await;

        result.map_err(|err| report_failure(err, UPDATE_FAILED))
    }

    pub async fn partial_update(&self, activity_id: Uuid, patch: ActivityPatch) -> Result<usize> {
        self.apply_patch(activity_id, &patch, "partial_update_activity")
            .await
            .map_err(|err| report_failure(err, PARTIAL_UPDATE_FAILED))
    }

    pub async fn delete(&self, activity_id: Uuid) -> Result<usize> {
        let repository = &self.activity_repository;

        let result = self
            .retry_policy
            .execute("delete_activity", |attempt| {
                info!(attempt, %activity_id, "deleting activity");
                async move { repository.delete_by_id(activity_id).await }
            })
            .await;

        match result {
            Ok(0) => {
                warn!(%activity_id, "activity not found for delete");
                Ok(0)
            }
            Ok(deleted) => {
                info!(%activity_id, deleted, "activity deleted");
                Ok(deleted)
            }
            Err(err) => Err(report_failure(err, DELETE_FAILED)),
        }
    }

    /// Distinct categories in the order the datastore returns them.
    pub async fn fetch_all_categories(&self) -> Result<Vec<String>> {
        let repository = &self.activity_repository;

        let categories = self
            .retry_policy
            .execute("fetch_all_categories", |attempt| {
                info!(attempt, "fetching all activity categories");
                async move { repository.list_distinct_categories().await }
            })
            .await
            .map_err(|err| report_failure(err, FETCH_CATEGORIES_FAILED))?;

        let mut seen = HashSet::new();
        let categories: Vec<String> = categories
            .into_iter()
            .filter(|category| seen.insert(category.clone()))
            .collect();

        info!(count = categories.len(), "fetched activity categories");
        Ok(categories)
    }

    async fn apply_patch(&self, activity_id: Uuid, patch: &ActivityPatch, operation: &str) -> Result<usize> {
        let repository = &self.activity_repository;

        let existing = self
            .retry_policy
            .execute("find_activity", |attempt| {
                info!(attempt, %activity_id, operation, "fetching activity");
                async move { repository.find_by_id(activity_id).await }
            })
            .await?;

        let Some(mut activity_entity) = existing else {
            warn!(%activity_id, operation, "activity not found");
            return Ok(0);
        };

        patch.apply(&mut activity_entity, &self.actor);

        self.retry_policy
            .execute(operation, |attempt| {
                info!(attempt, %activity_id, fields = ?patch.fields(), "writing activity changes");
                let activity_entity = activity_entity.clone();
                async move { repository.save(activity_entity).await }
            })
            .await?;

        info!(%activity_id, operation, "activity changes saved");
        Ok(1)
    }
}

/// Transient and validation failures keep their kind; anything else becomes
/// a persistence failure carrying the underlying message.
fn report_failure(err: anyhow::Error, context: &str) -> anyhow::Error {
    if is_retryable(&err) {
        error!(error = ?err, "data access or transaction failure: {context}");
        return err;
    }
    if is_validation(&err) {
        warn!(error = %err, "rejected activity input: {context}");
        return err;
    }

    error!(error = ?err, "unexpected data access failure: {context}");
    DataAccessError::persistence(context, err.to_string())
}
