use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::StoreAddress;
use crate::core::client::redis_client::build_redis_client;
use crate::core::state::store::state_store_trait::SharedStateStore;
use crate::errors::StoreError;

/// Redis-backed store. The connection is opened on first use so an
/// unreachable peer does not prevent startup.
pub struct RedisStateStore {
    name: String,
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
}

impl RedisStateStore {
    pub fn open(address: &StoreAddress) -> Result<Self, StoreError> {
        let name = address.to_string();
        let client = build_redis_client(address).map_err(|e| StoreError::Backend {
            store: name.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            name,
            client,
            conn: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, StoreError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                debug!(store = %self.name, "Connecting to redis");
                ConnectionManager::new(self.client.clone()).await
            })
            .await
            .map_err(|e| self.backend_error(e))?;

        Ok(conn.clone())
    }

    fn backend_error(&self, err: redis::RedisError) -> StoreError {
        StoreError::Backend {
            store: self.name.clone(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl SharedStateStore for RedisStateStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| self.backend_error(e))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        match ttl {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(key, value, ttl.as_secs().max(1))
                    .await
                    .map_err(|e| self.backend_error(e))?;
            }
            None => {
                let _: () = conn
                    .set(key, value)
                    .await
                    .map_err(|e| self.backend_error(e))?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(key).await.map_err(|e| self.backend_error(e))?;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut conn = self.connection().await?;
        // SET NX EX in one command: nil reply means the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await
            .map_err(|e| self.backend_error(e))?;

        Ok(reply.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_does_not_connect() {
        let store = RedisStateStore::open(&StoreAddress {
            host: "redis-b".into(),
            port: 6380,
        })
        .unwrap();
        assert_eq!(store.name(), "redis-b:6380");
        assert!(store.conn.get().is_none());
    }
}
