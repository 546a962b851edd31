//! User and match-history persistence.
//!
//! Two layers:
//! - [`KeyValueStore`]: raw bytes by key. [`MemoryKvStore`] is the in-process
//!   backend used by tests, the simulator and single-node deployments.
//! - [`UserStore`]: the collaborator the session controller talks to at
//!   game end. [`KvUserStore`] implements it on top of any key-value
//!   backend by encoding one [`UserRecord`] per player with `bincode`.
//!
//! # Usage
//!
//! ```rust,ignore
//! let store = KvUserStore::new(MemoryKvStore::new(), 1000);
//! let rating = store.get_rating(&PlayerId::new("alice")).await?;
//! ```

mod memory;
mod user;

pub use memory::MemoryKvStore;
pub use user::{KvUserStore, MatchHistoryEntry, MatchResult, UserRecord, UserStore};

use async_trait::async_trait;

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to encode or decode record: {0}")]
    Codec(#[from] bincode::Error),

    #[error("storage backend error: {reason}")]
    Backend { reason: String },
}

/// Byte-oriented key-value backend.
///
/// Implementations must be thread-safe; sessions finish concurrently.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or replace a value.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove a value. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
