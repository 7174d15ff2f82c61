use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::activities;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = activities)]
pub struct ActivityEntity {
    pub id: Uuid,
    pub activity: String,
    pub category: String,
    pub price: i32,
    pub image_location: String,
    pub created_date: NaiveDate,
    pub created_time: NaiveTime,
    pub last_updated_by: String,
    pub accessed_by: String,
}
