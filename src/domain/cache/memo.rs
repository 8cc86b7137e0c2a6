//! Memo cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;

/// Process-wide store of previously computed strings, keyed by content identity.
///
/// Entries are immutable once computed, so concurrent writers for the same key are
/// resolved last-writer-wins. Implementations must bound their size.
#[async_trait]
pub trait MemoCache: Send + Sync + Debug {
    /// Gets a previously stored value
    async fn get(&self, key: &str) -> Option<String>;

    /// Stores a value, replacing any existing entry for `key`
    async fn put(&self, key: &str, value: String);

    /// Approximate number of entries
    async fn len(&self) -> u64;
}
