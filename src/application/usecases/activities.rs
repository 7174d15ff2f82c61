use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    application::usecases::activity_data_access::ActivityDataAccess,
    domain::{
        repositories::activities::ActivityRepository,
        value_objects::activities::{ActivityModel, ActivityPatch},
    },
};

pub struct ActivitiesUseCase<T>
where
    T: ActivityRepository + Send + Sync,
{
    activity_data_access: Arc<ActivityDataAccess<T>>,
}

impl<T> ActivitiesUseCase<T>
where
    T: ActivityRepository + Send + Sync,
{
    pub fn new(activity_data_access: Arc<ActivityDataAccess<T>>) -> Self {
        Self {
            activity_data_access,
        }
    }

    pub async fn create_activity(&self, activity_model: ActivityModel) -> Result<usize> {
        info!("activities: processing create");
        self.activity_data_access
            .save_or_update(activity_model)
            .await
            .map_err(|err| rewrap(err, "Error occurred while saving or updating activity"))
    }

    pub async fn update_activity(
        &self,
        activity_id: Uuid,
        activity_model: ActivityModel,
    ) -> Result<usize> {
        info!(%activity_id, "activities: processing full update");
        self.activity_data_access
            .update(activity_id, activity_model)
            .await
            .map_err(|err| rewrap(err, "Error occurred while updating activity"))
    }

    pub async fn partial_update_activity(
        &self,
        activity_id: Uuid,
        patch: ActivityPatch,
    ) -> Result<usize> {
        info!(%activity_id, fields = ?patch.fields(), "activities: processing partial update");
        self.activity_data_access
            .partial_update(activity_id, patch)
            .await
            .map_err(|err| rewrap(err, "Error occurred while partially updating activity"))
    }

    pub async fn delete_activity(&self, activity_id: Uuid) -> Result<usize> {
        info!(%activity_id, "activities: processing delete");
        self.activity_data_access
            .delete(activity_id)
            .await
            .map_err(|err| rewrap(err, "Error occurred while deleting activity"))
    }

    pub async fn fetch_all_categories(&self) -> Result<Vec<String>> {
        info!("activities: fetching all categories");
        self.activity_data_access
            .fetch_all_categories()
            .await
            .map_err(|err| rewrap(err, "Error occurred while fetching categories"))
    }
}

fn rewrap(err: anyhow::Error, context: &'static str) -> anyhow::Error {
    error!(error = %err, "activities: {context}");
    err.context(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::retry::RetryPolicy,
        domain::{
            errors::{DataAccessError, TransientKind, is_retryable},
            repositories::activities::MockActivityRepository,
        },
    };
    use std::time::Duration;

    fn usecase(repository: MockActivityRepository) -> ActivitiesUseCase<MockActivityRepository> {
        let data_access = ActivityDataAccess::new(
            Arc::new(repository),
            RetryPolicy::new(2, Duration::ZERO),
            "REV-OPS-APP",
        );
        ActivitiesUseCase::new(Arc::new(data_access))
    }

    #[tokio::test]
    async fn delegates_results_unchanged() {
        let mut repository = MockActivityRepository::new();
        repository
            .expect_list_distinct_categories()
            .returning(|| Box::pin(async { Ok(vec!["Billiards".to_string()]) }));

        let categories = usecase(repository).fetch_all_categories().await.unwrap();

        assert_eq!(categories, vec!["Billiards"]);
    }

    #[tokio::test]
    async fn adds_context_but_keeps_error_kind() {
        let mut repository = MockActivityRepository::new();
        repository.expect_delete_by_id().times(2).returning(|_| {
            Box::pin(async {
                Err(DataAccessError::transient(
                    TransientKind::Connection,
                    "server closed the connection unexpectedly",
                ))
            })
        });

        let err = usecase(repository)
            .delete_activity(Uuid::new_v4())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Error occurred while deleting activity");
        assert!(is_retryable(&err));
        assert!(format!("{err:#}").contains("server closed the connection unexpectedly"));
    }
}
