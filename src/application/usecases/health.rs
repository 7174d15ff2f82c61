use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{error, info};
use url::Url;

use crate::domain::{
    repositories::health::ConnectionProbe,
    value_objects::health::{
        DATA_SOURCE, DB_CONNECTION, DETAIL_DISCLAIMER, DETAIL_MESSAGE, DETAIL_URI,
        HealthCheckResult, URI_HINT_DISCLAIMER,
    },
};

#[async_trait]
pub trait HealthCheck {
    async fn check(&self) -> HealthCheckResult;
}

/// Contributes static key/values to the heartbeat payload.
pub trait HeartbeatExtension {
    fn heartbeat_extension(&self) -> Map<String, Value>;
}

pub struct DatabaseHealthCheck<P>
where
    P: ConnectionProbe + Send + Sync,
{
    connection_probe: Arc<P>,
    uri_hint: Option<String>,
}

impl<P> DatabaseHealthCheck<P>
where
    P: ConnectionProbe + Send + Sync,
{
    /// `configured_url` is only reported when the probe fails, with its
    /// credentials stripped.
    pub fn new(connection_probe: Arc<P>, configured_url: Option<&str>) -> Self {
        Self {
            connection_probe,
            uri_hint: configured_url
                .map(str::trim)
                .filter(|raw| !raw.is_empty())
                .map(redact_credentials),
        }
    }

    /// Single attempt, no retry.
    pub async fn check_database_health(&self) -> HealthCheckResult {
        let mut result = HealthCheckResult::success(DATA_SOURCE, DB_CONNECTION, "Success.");

        match self.connection_probe.resolve_connection_uri().await {
            Ok(uri) => {
                info!(%uri, "health: database connection acquired");
                result = result.with_detail(DETAIL_URI, uri);
            }
            Err(err) => {
                error!(error = ?err, "health: exception occurred while checking database");
                result.mark_failed();
                result = result.with_detail(DETAIL_MESSAGE, format!("{err:#}"));
                if let Some(uri_hint) = &self.uri_hint {
                    result = result
                        .with_detail(DETAIL_URI, uri_hint.clone())
                        .with_detail(DETAIL_DISCLAIMER, URI_HINT_DISCLAIMER);
                }
            }
        }

        result
    }
}

#[async_trait]
impl<P> HealthCheck for DatabaseHealthCheck<P>
where
    P: ConnectionProbe + Send + Sync,
{
    async fn check(&self) -> HealthCheckResult {
        self.check_database_health().await
    }
}

/// Accepts both connection string forms libpq understands: URLs lose their
/// password component, `key=value` strings lose the `password` pair.
fn redact_credentials(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() && url.set_password(None).is_err() {
                return redact_keyword_pairs(raw);
            }
            url.to_string()
        }
        Err(_) => redact_keyword_pairs(raw),
    }
}

fn redact_keyword_pairs(raw: &str) -> String {
    raw.split_whitespace()
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !key.trim().eq_ignore_ascii_case("password")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct AppHeartbeatExtension {
    build_timestamp: String,
}

impl AppHeartbeatExtension {
    pub fn new(build_timestamp: impl Into<String>) -> Self {
        Self {
            build_timestamp: build_timestamp.into(),
        }
    }
}

impl HeartbeatExtension for AppHeartbeatExtension {
    fn heartbeat_extension(&self) -> Map<String, Value> {
        let mut extension = Map::new();
        extension.insert(
            "buildTimestamp".to_string(),
            Value::String(self.build_timestamp.clone()),
        );
        extension
    }
}

pub struct HealthUseCase {
    health_checks: Vec<Arc<dyn HealthCheck + Send + Sync>>,
    heartbeat_extensions: Vec<Arc<dyn HeartbeatExtension + Send + Sync>>,
}

impl HealthUseCase {
    pub fn new(
        health_checks: Vec<Arc<dyn HealthCheck + Send + Sync>>,
        heartbeat_extensions: Vec<Arc<dyn HeartbeatExtension + Send + Sync>>,
    ) -> Self {
        Self {
            health_checks,
            heartbeat_extensions,
        }
    }

    pub async fn run_checks(&self) -> Vec<HealthCheckResult> {
        let mut results = Vec::with_capacity(self.health_checks.len());
        for health_check in &self.health_checks {
            results.push(health_check.check().await);
        }
        results
    }

    /// `{"status": "UP"}` merged with every extension; later extensions win
    /// on key clashes.
    pub fn heartbeat(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("status".to_string(), json!("UP"));
        for extension in &self.heartbeat_extensions {
            payload.extend(extension.heartbeat_extension());
        }
        payload
    }
}
