use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, prelude::*, sql_query, sql_types::Text};
use std::sync::Arc;

use crate::{
    domain::repositories::health::ConnectionProbe,
    infrastructure::postgres::{
        errors::{from_pool_error, from_query_error},
        postgres_connection::PgPoolSquad,
    },
};

const SERVER_ENDPOINT_QUERY: &str = "SELECT 'postgresql://' \
    || coalesce(host(inet_server_addr()), 'localhost') \
    || ':' || coalesce(inet_server_port(), 5432)::text \
    || '/' || current_database() AS uri";

#[derive(Debug, QueryableByName)]
struct ServerEndpoint {
    #[diesel(sql_type = Text)]
    uri: String,
}

pub struct PostgresConnectionProbe {
    db_pool: Arc<PgPoolSquad>,
}

impl PostgresConnectionProbe {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl ConnectionProbe for PostgresConnectionProbe {
    async fn resolve_connection_uri(&self) -> Result<String> {
        let mut conn = Arc::clone(&self.db_pool).get().map_err(from_pool_error)?;

        let endpoint = sql_query(SERVER_ENDPOINT_QUERY)
            .get_result::<ServerEndpoint>(&mut conn)
            .map_err(from_query_error)?;

        Ok(endpoint.uri)
    }
}
