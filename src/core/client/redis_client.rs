use redis::Client;
use tracing::debug;

use crate::config::StoreAddress;

/// Creates a redis client for one store address. No connection is made yet.
pub fn build_redis_client(address: &StoreAddress) -> redis::RedisResult<Client> {
    let client = Client::open(address.redis_url())?;
    debug!("Redis client prepared for {}", address);
    Ok(client)
}
