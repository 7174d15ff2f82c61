use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

#[async_trait]
#[automock]
pub trait ConnectionProbe {
    /// Acquires one connection and reports the endpoint it is attached to.
    async fn resolve_connection_uri(&self) -> Result<String>;
}
