use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DATA_SOURCE: &str = "data-source";
pub const DB_CONNECTION: &str = "DB Connection";
pub const DETAIL_MESSAGE: &str = "message";
pub const DETAIL_URI: &str = "uri";
pub const DETAIL_DISCLAIMER: &str = "disclaimer";
pub const URI_HINT_DISCLAIMER: &str =
    "The uri is provided as a hint and may not reflect the actual uri used.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthCheckResult {
    pub name: String,
    pub description: String,
    pub result: HealthStatus,
    pub message: String,
    pub details: BTreeMap<String, String>,
}

impl HealthCheckResult {
    pub fn success(name: &str, description: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            result: HealthStatus::Success,
            message: message.to_string(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn mark_failed(&mut self) {
        self.result = HealthStatus::Failure;
    }

    pub fn is_healthy(&self) -> bool {
        self.result == HealthStatus::Success
    }
}
