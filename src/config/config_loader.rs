use std::str::FromStr;

use anyhow::{Context, Result, anyhow};

use super::config_model::{Audit, Database, DotEnvyConfig, Heartbeat, Retry, Server};

pub const DEFAULT_BODY_LIMIT_MB: u64 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_POOL_SIZE: u32 = 10;
pub const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;
pub const DEFAULT_BUILD_TIMESTAMP: &str = "default-timestamp";
pub const DEFAULT_ACTOR: &str = "REV-OPS-APP";

/// Reads the process environment; `.env` is loaded once by the binary.
pub fn load() -> Result<DotEnvyConfig> {
    load_from(|key| std::env::var(key).ok())
}

pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let server = Server {
        port: required(&lookup, "SERVER_PORT")?,
        body_limit: optional(&lookup, "SERVER_BODY_LIMIT", DEFAULT_BODY_LIMIT_MB)?,
        timeout: optional(&lookup, "SERVER_TIMEOUT", DEFAULT_TIMEOUT_SECS)?,
    };

    let database = Database {
        url: required(&lookup, "DATABASE_URL")?,
        max_pool_size: optional(&lookup, "DATABASE_MAX_POOL_SIZE", DEFAULT_MAX_POOL_SIZE)?,
    };

    let retry = Retry {
        max_attempts: optional(&lookup, "RETRY_MAX_ATTEMPTS", DEFAULT_RETRY_MAX_ATTEMPTS)?,
        backoff_ms: optional(&lookup, "RETRY_BACKOFF_MS", DEFAULT_RETRY_BACKOFF_MS)?,
    };

    let heartbeat = Heartbeat {
        build_timestamp: non_empty(&lookup, "BUILD_TIMESTAMP")
            .unwrap_or_else(|| DEFAULT_BUILD_TIMESTAMP.to_string()),
    };

    let audit = Audit {
        actor: non_empty(&lookup, "APP_ACTOR").unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        retry,
        heartbeat,
        audit,
    })
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F, T>(lookup: &F, key: &str) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = non_empty(lookup, key).ok_or_else(|| anyhow!("{key} is missing"))?;
    raw.parse::<T>().with_context(|| format!("{key} is invalid"))
}

fn optional<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.parse::<T>().with_context(|| format!("{key} is invalid")),
        None => Ok(default),
    }
}
