#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub retry: Retry,
    pub heartbeat: Heartbeat,
    pub audit: Audit,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_pool_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retry {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Heartbeat {
    pub build_timestamp: String,
}

/// Name stamped into `last_updated_by` / `accessed_by` on every write.
#[derive(Debug, Clone)]
pub struct Audit {
    pub actor: String,
}
