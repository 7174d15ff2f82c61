use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::activities::ActivityEntity;

#[async_trait]
#[automock]
pub trait ActivityRepository {
    async fn find_by_id(&self, activity_id: Uuid) -> Result<Option<ActivityEntity>>;
    /// Inserts the row, or overwrites every non-key column when the id exists.
    async fn save(&self, activity_entity: ActivityEntity) -> Result<Uuid>;
    async fn delete_by_id(&self, activity_id: Uuid) -> Result<usize>;
    async fn list_distinct_categories(&self) -> Result<Vec<String>>;
}
