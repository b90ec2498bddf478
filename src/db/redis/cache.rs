use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::AppResult;

/// Keys for cached query results
///
/// Every key embeds the id of the snapshot that produced the result, so a
/// refresh makes all earlier entries unreachable without an explicit purge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Personalized {
        snapshot: Uuid,
        profile_id: String,
        count: usize,
    },
    SimilarContent {
        snapshot: Uuid,
        content_id: String,
        count: usize,
    },
    Trending {
        snapshot: Uuid,
        count: usize,
    },
    Genre {
        snapshot: Uuid,
        genre: String,
        count: usize,
    },
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Personalized {
                snapshot,
                profile_id,
                count,
            } => write!(f, "recs:{}:{}:{}", snapshot, profile_id, count),
            CacheKey::SimilarContent {
                snapshot,
                content_id,
                count,
            } => write!(f, "similar:{}:{}:{}", snapshot, content_id, count),
            CacheKey::Trending { snapshot, count } => {
                write!(f, "trending:{}:{}", snapshot, count)
            }
            CacheKey::Genre {
                snapshot,
                genre,
                count,
            } => write!(f, "genre:{}:{}:{}", snapshot, genre.to_ascii_lowercase(), count),
        }
    }
}

/// Opens a Redis client for the result cache
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed cache for ranked query results
///
/// Reads go straight to Redis; writes are queued to a background task so a
/// slow or unavailable Redis never delays a response.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Stops the background writer after draining queued writes
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Creates the cache and spawns its writer task
    ///
    /// The returned handle must be kept alive for as long as the cache is in
    /// use; dropping it shuts the writer down.
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let task = tokio::spawn(Self::cache_writer_task(client, write_rx, shutdown_rx));

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, task })
    }

    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::debug!("Cache writer started");
        let mut failed_writes: u64 = 0;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        failed_writes += 1;
                        tracing::warn!(error = %e, failed_writes, "Failed to write cached result");
                    }
                }
                _ = shutdown_rx.recv() => {
                    // Senders live in every Cache clone, so drain what is queued now
                    // rather than waiting for the channel to close.
                    let mut flushed = 0;
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::warn!(error = %e, "Failed to flush cached result");
                        } else {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed, failed_writes, "Cache writer stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Looks up a cached value, returning `None` on a miss
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Queues a value for writing without waiting on Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, key = %key, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if self.write_tx.send(msg).is_err() {
            tracing::warn!(key = %key, "Cache writer is gone, dropping write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_id() -> Uuid {
        Uuid::parse_str("6f1c2c1e-8d9b-4a53-9a49-0f5f2d7c1b11").unwrap()
    }

    #[test]
    fn test_personalized_key() {
        let key = CacheKey::Personalized {
            snapshot: snapshot_id(),
            profile_id: "1".to_string(),
            count: 10,
        };
        assert_eq!(
            key.to_string(),
            "recs:6f1c2c1e-8d9b-4a53-9a49-0f5f2d7c1b11:1:10"
        );
    }

    #[test]
    fn test_similar_content_key() {
        let key = CacheKey::SimilarContent {
            snapshot: snapshot_id(),
            content_id: "tt0133093".to_string(),
            count: 5,
        };
        assert_eq!(
            key.to_string(),
            "similar:6f1c2c1e-8d9b-4a53-9a49-0f5f2d7c1b11:tt0133093:5"
        );
    }

    #[test]
    fn test_genre_key_is_case_insensitive() {
        let upper = CacheKey::Genre {
            snapshot: snapshot_id(),
            genre: "Sci-Fi".to_string(),
            count: 20,
        };
        let lower = CacheKey::Genre {
            snapshot: snapshot_id(),
            genre: "sci-fi".to_string(),
            count: 20,
        };
        assert_eq!(upper.to_string(), lower.to_string());
    }

    #[test]
    fn test_genre_key_folds_ascii_only() {
        let key = |genre: &str| {
            CacheKey::Genre {
                snapshot: snapshot_id(),
                genre: genre.to_string(),
                count: 5,
            }
            .to_string()
        };

        // genre matching ignores ASCII case only, so non-ASCII letters keep their case
        assert_eq!(key("DRAMA"), key("drama"));
        assert_ne!(key("DRAMÉ"), key("dramé"));
        assert!(key("DRAMÉ").contains(":dramÉ:"));
    }

    #[test]
    fn test_keys_differ_across_snapshots() {
        let before = CacheKey::Trending {
            snapshot: snapshot_id(),
            count: 10,
        };
        let after = CacheKey::Trending {
            snapshot: Uuid::new_v4(),
            count: 10,
        };
        assert_ne!(before.to_string(), after.to_string());
    }

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_cache_miss() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = Cache::new(client);

        let key = CacheKey::Trending {
            snapshot: Uuid::new_v4(),
            count: 3,
        };
        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();

        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_shutdown_flushes_queued_writes() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, handle) = Cache::new(client.clone());

        let key = CacheKey::Genre {
            snapshot: Uuid::new_v4(),
            genre: "drama".to_string(),
            count: 2,
        };
        let value = vec!["tt0111161".to_string(), "tt0068646".to_string()];

        cache.set_in_background(&key, &value, 60);
        handle.shutdown().await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
