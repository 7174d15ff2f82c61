use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::{entities::activities::ActivityEntity, errors::DataAccessError};

/// Wire shape of an activity as exchanged with clients. Identifier,
/// timestamps and audit fields are server-managed and never accepted here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityModel {
    pub activity: String,
    pub category: String,
    pub price: i32,
    pub image_location: String,
}

impl ActivityModel {
    pub fn validate(&self) -> Result<()> {
        if self.price < 0 {
            return Err(DataAccessError::validation(format!(
                "price must be non-negative, got {}",
                self.price
            )));
        }
        Ok(())
    }

    /// Builds a brand new row: fresh id, creation date/time from the local
    /// clock and both audit fields stamped with `actor`.
    pub fn to_entity(&self, actor: &str) -> Result<ActivityEntity> {
        self.validate()?;

        let now = Local::now();
        Ok(ActivityEntity {
            id: Uuid::new_v4(),
            activity: self.activity.clone(),
            category: self.category.clone(),
            price: self.price,
            image_location: self.image_location.clone(),
            created_date: now.date_naive(),
            created_time: now.time(),
            last_updated_by: actor.to_string(),
            accessed_by: actor.to_string(),
        })
    }
}

pub const FIELD_ACTIVITY: &str = "activity";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_PRICE: &str = "price";
pub const FIELD_IMAGE_LOCATION: &str = "imageLocation";

/// A single field assignment accepted by a partial update.
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityUpdate {
    Activity(String),
    Category(String),
    Price(i32),
    ImageLocation(String),
}

impl ActivityUpdate {
    pub fn parse(field: &str, value: &Value) -> Result<Self> {
        match field {
            FIELD_ACTIVITY => Ok(ActivityUpdate::Activity(expect_string(field, value)?)),
            FIELD_CATEGORY => Ok(ActivityUpdate::Category(expect_string(field, value)?)),
            FIELD_PRICE => Ok(ActivityUpdate::Price(expect_price(value)?)),
            FIELD_IMAGE_LOCATION => Ok(ActivityUpdate::ImageLocation(expect_string(
                field, value,
            )?)),
            unknown => Err(DataAccessError::validation(format!(
                "Unknown field: {unknown}"
            ))),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            ActivityUpdate::Activity(_) => FIELD_ACTIVITY,
            ActivityUpdate::Category(_) => FIELD_CATEGORY,
            ActivityUpdate::Price(_) => FIELD_PRICE,
            ActivityUpdate::ImageLocation(_) => FIELD_IMAGE_LOCATION,
        }
    }

    fn apply(&self, entity: &mut ActivityEntity) {
        match self {
            ActivityUpdate::Activity(activity) => entity.activity = activity.clone(),
            ActivityUpdate::Category(category) => entity.category = category.clone(),
            ActivityUpdate::Price(price) => entity.price = *price,
            ActivityUpdate::ImageLocation(location) => entity.image_location = location.clone(),
        }
    }
}

fn expect_string(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DataAccessError::validation(format!("{field} must be a string")))
}

fn expect_price(value: &Value) -> Result<i32> {
    value
        .as_i64()
        .filter(|price| *price >= 0)
        .and_then(|price| i32::try_from(price).ok())
        .ok_or_else(|| {
            DataAccessError::validation(format!(
                "{FIELD_PRICE} must be a non-negative integer, got {value}"
            ))
        })
}

/// A validated set of field assignments. Construction fails on the first
/// unknown field or mistyped value, so an existing patch always applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityPatch {
    updates: Vec<ActivityUpdate>,
}

impl ActivityPatch {
    pub fn new(updates: Vec<ActivityUpdate>) -> Self {
        Self { updates }
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.updates.iter().map(ActivityUpdate::field).collect()
    }

    pub fn apply(&self, entity: &mut ActivityEntity, actor: &str) {
        for update in &self.updates {
            update.apply(entity);
        }
        entity.last_updated_by = actor.to_string();
        entity.accessed_by = actor.to_string();
    }
}

impl TryFrom<Map<String, Value>> for ActivityPatch {
    type Error = anyhow::Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self> {
        let updates = fields
            .iter()
            .map(|(field, value)| ActivityUpdate::parse(field, value))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(updates))
    }
}

/// A full update replaces every client-owned field.
impl TryFrom<ActivityModel> for ActivityPatch {
    type Error = anyhow::Error;

    fn try_from(model: ActivityModel) -> Result<Self> {
        model.validate()?;

        Ok(Self::new(vec![
            ActivityUpdate::Activity(model.activity),
            ActivityUpdate::Category(model.category),
            ActivityUpdate::Price(model.price),
            ActivityUpdate::ImageLocation(model.image_location),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::is_validation;
    use chrono::{NaiveDate, NaiveTime};
    use serde_json::json;

    fn pool_table() -> ActivityModel {
        ActivityModel {
            activity: "Pool Table".to_string(),
            category: "Billiards".to_string(),
            price: 5,
            image_location: "/img/pool.png".to_string(),
        }
    }

    fn stored_entity() -> ActivityEntity {
        ActivityEntity {
            id: Uuid::new_v4(),
            activity: "Pool Table".to_string(),
            category: "Billiards".to_string(),
            price: 5,
            image_location: "/img/pool.png".to_string(),
            created_date: NaiveDate::from_ymd_opt(2024, 8, 22).unwrap(),
            created_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            last_updated_by: "seed".to_string(),
            accessed_by: "seed".to_string(),
        }
    }

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected a JSON object, got {other}"),
        }
    }

    #[test]
    fn model_uses_camel_case_on_the_wire() {
        let model: ActivityModel = serde_json::from_value(json!({
            "activity": "Pool Table",
            "category": "Billiards",
            "price": 5,
            "imageLocation": "/img/pool.png"
        }))
        .unwrap();

        assert_eq!(model, pool_table());
        assert_eq!(
            serde_json::to_value(&model).unwrap()["imageLocation"],
            json!("/img/pool.png")
        );
    }

    #[test]
    fn to_entity_assigns_server_managed_fields() {
        let entity = pool_table().to_entity("REV-OPS-APP").unwrap();

        assert_eq!(entity.activity, "Pool Table");
        assert_eq!(entity.category, "Billiards");
        assert_eq!(entity.price, 5);
        assert_eq!(entity.image_location, "/img/pool.png");
        assert_eq!(entity.last_updated_by, "REV-OPS-APP");
        assert_eq!(entity.accessed_by, "REV-OPS-APP");
        assert!(!entity.id.is_nil());
    }

    #[test]
    fn to_entity_generates_distinct_ids() {
        let first = pool_table().to_entity("a").unwrap();
        let second = pool_table().to_entity("a").unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut model = pool_table();
        model.price = -1;

        let err = model.to_entity("a").unwrap_err();
        assert!(is_validation(&err));
    }

    #[test]
    fn patch_applies_only_named_fields() {
        let patch = ActivityPatch::try_from(as_map(json!({
            "price": 7,
            "imageLocation": "/img/pool-v2.png"
        })))
        .unwrap();
        let mut entity = stored_entity();
        let before = entity.clone();

        patch.apply(&mut entity, "REV-OPS-APP");

        assert_eq!(entity.id, before.id);
        assert_eq!(entity.activity, before.activity);
        assert_eq!(entity.category, before.category);
        assert_eq!(entity.created_date, before.created_date);
        assert_eq!(entity.created_time, before.created_time);
        assert_eq!(entity.price, 7);
        assert_eq!(entity.image_location, "/img/pool-v2.png");
        assert_eq!(entity.last_updated_by, "REV-OPS-APP");
    }

    #[test]
    fn unknown_field_is_rejected_at_construction() {
        let err = ActivityPatch::try_from(as_map(json!({
            "category": "Arcade",
            "color": "green"
        })))
        .unwrap_err();

        assert!(is_validation(&err));
        assert!(err.to_string().contains("Unknown field: color"));
    }

    #[test]
    fn mistyped_values_are_rejected() {
        for body in [
            json!({ "price": "five" }),
            json!({ "price": -3 }),
            json!({ "price": 1.5 }),
            json!({ "price": (i64::from(i32::MAX) + 1) }),
            json!({ "activity": 12 }),
            json!({ "imageLocation": null }),
        ] {
            let err = ActivityPatch::try_from(as_map(body.clone())).unwrap_err();
            assert!(is_validation(&err), "expected validation failure for {body}");
        }
    }

    #[test]
    fn full_update_patch_rejects_negative_price() {
        let mut replacement = pool_table();
        replacement.price = -2;

        let err = ActivityPatch::try_from(replacement).unwrap_err();

        assert!(is_validation(&err));
    }

    #[test]
    fn full_update_patch_replaces_every_client_field() {
        let replacement = ActivityModel {
            activity: "Air Hockey".to_string(),
            category: "Arcade".to_string(),
            price: 3,
            image_location: "/img/air-hockey.png".to_string(),
        };
        let patch = ActivityPatch::try_from(replacement.clone()).unwrap();
        let mut entity = stored_entity();
        let id = entity.id;

        patch.apply(&mut entity, "REV-OPS-APP");

        assert_eq!(
            patch.fields(),
            vec![FIELD_ACTIVITY, FIELD_CATEGORY, FIELD_PRICE, FIELD_IMAGE_LOCATION]
        );
        assert_eq!(entity.id, id);
        assert_eq!(entity.activity, replacement.activity);
        assert_eq!(entity.category, replacement.category);
        assert_eq!(entity.price, replacement.price);
        assert_eq!(entity.image_location, replacement.image_location);
    }
}
