use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{entities::activities::ActivityEntity, repositories::activities::ActivityRepository},
    infrastructure::postgres::{
        errors::{from_pool_error, from_query_error},
        postgres_connection::PgPoolSquad,
        schema::activities,
    },
};

pub struct ActivityPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl ActivityPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ActivityRepository for ActivityPostgres {
    async fn find_by_id(&self, activity_id: Uuid) -> Result<Option<ActivityEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get().map_err(from_pool_error)?;

        let row = activities::table
            .find(activity_id)
            .select(ActivityEntity::as_select())
            .first::<ActivityEntity>(&mut conn)
            .optional()
            .map_err(from_query_error)?;

        Ok(row)
    }

    async fn save(&self, activity_entity: ActivityEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get().map_err(from_pool_error)?;

        let id = diesel::insert_into(activities::table)
            .values(&activity_entity)
            .on_conflict(activities::id)
            .do_update()
            .set(&activity_entity)
            .returning(activities::id)
            .get_result::<Uuid>(&mut conn)
            .map_err(from_query_error)?;

        Ok(id)
    }

    async fn delete_by_id(&self, activity_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get().map_err(from_pool_error)?;

        let deleted = diesel::delete(activities::table.find(activity_id))
            .execute(&mut conn)
            .map_err(from_query_error)?;

        Ok(deleted)
    }

    async fn list_distinct_categories(&self) -> Result<Vec<String>> {
        let mut conn = Arc::clone(&self.db_pool).get().map_err(from_pool_error)?;

        let categories = activities::table
            .select(activities::category)
            .distinct()
            .order(activities::category.asc())
            .load::<String>(&mut conn)
            .map_err(from_query_error)?;

        Ok(categories)
    }
}
