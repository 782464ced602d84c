//! Translation cache
//!
//! Entries are keyed by `language:namespace` and expire after the
//! configured TTL. Expired entries are reloaded on access, not evicted
//! in the background.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::db::models::{CacheStats, TranslationEntry};
use crate::db::repository::{RepoResult, TranslationRepository};

/// Time source, injectable for tests
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall clock
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Backing store the cache reads through to
#[async_trait]
pub trait TranslationSource: Send + Sync {
    async fn load(&self, language: &str, namespace: &str) -> RepoResult<Vec<TranslationEntry>>;
}

/// Database-backed source
pub struct DbTranslationSource {
    repo: TranslationRepository,
}

impl DbTranslationSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repo: TranslationRepository::new(pool),
        }
    }
}

#[async_trait]
impl TranslationSource for DbTranslationSource {
    async fn load(&self, language: &str, namespace: &str) -> RepoResult<Vec<TranslationEntry>> {
        self.repo.find_entries(language, namespace).await
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    entries: Vec<TranslationEntry>,
    expires_at_millis: u64,
}

/// Read-through TTL cache over a [`TranslationSource`]
#[derive(Clone)]
pub struct TranslationCache {
    source: Arc<dyn TranslationSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    inner: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl TranslationCache {
    pub fn new(source: Arc<dyn TranslationSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn cache_key(language: &str, namespace: &str) -> String {
        format!("{language}:{namespace}")
    }

    /// Get all entries for a language + namespace, loading from the
    /// source on a miss or an expired hit.
    pub async fn get(
        &self,
        language: &str,
        namespace: &str,
    ) -> RepoResult<Vec<TranslationEntry>> {
        let key = Self::cache_key(language, namespace);
        let now = self.clock.now_millis();

        {
            let inner = self.inner.read().await;
            if let Some(entry) = inner.get(&key)
                && entry.expires_at_millis > now
            {
                return Ok(entry.entries.clone());
            }
        }

        let entries = self.source.load(language, namespace).await?;
        let mut inner = self.inner.write().await;
        inner.insert(
            key,
            CacheEntry {
                entries: entries.clone(),
                expires_at_millis: now + self.ttl.as_millis() as u64,
            },
        );
        Ok(entries)
    }

    /// Drop cached entries.
    ///
    /// Both arguments are optional wildcards: no language clears every
    /// language, no namespace clears every namespace, neither clears
    /// the whole cache.
    pub async fn clear(&self, language: Option<&str>, namespace: Option<&str>) {
        let mut inner = self.inner.write().await;
        match (language, namespace) {
            (None, None) => inner.clear(),
            (Some(lang), None) => {
                let prefix = format!("{lang}:");
                inner.retain(|key, _| !key.starts_with(&prefix));
            }
            (None, Some(ns)) => {
                let suffix = format!(":{ns}");
                inner.retain(|key, _| !key.ends_with(&suffix));
            }
            (Some(lang), Some(ns)) => {
                inner.remove(&Self::cache_key(lang, ns));
            }
        }
    }

    /// Pre-load a list of language/namespace pairs
    pub async fn warm_up(&self, pairs: &[(String, String)]) -> RepoResult<usize> {
        let mut loaded = 0;
        for (language, namespace) in pairs {
            self.get(language, namespace).await?;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Current occupancy, with keys sorted for stable output
    pub async fn stats(&self) -> CacheStats {
        let inner = self.inner.read().await;
        let mut keys: Vec<String> = inner.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }
}
