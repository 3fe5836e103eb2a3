use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::database::{self, DbPool};
use crate::errors::with_store_context;

/// Learner progress as namespaced string entries
pub trait ProgressStore: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>>;
    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()>;
    fn keys(&self, namespace: &str) -> Result<Vec<String>>;

    /// Implementations backed by a database write the batch atomically
    fn set_many(&self, namespace: &str, entries: &[(&str, String)]) -> Result<()> {
        entries
            .iter()
            .try_for_each(|(key, value)| self.set(namespace, key, value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressKey {
    GameHistory,
    CompletedLessons,
    RedirectedLessons,
    Xp,
    UnlockedAchievements,
}

impl ProgressKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressKey::GameHistory => "gameHistory",
            ProgressKey::CompletedLessons => "completedLessons",
            ProgressKey::RedirectedLessons => "redirectedLessons",
            ProgressKey::Xp => "xp",
            ProgressKey::UnlockedAchievements => "unlockedAchievements",
        }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Missing entries load as `T::default()`
pub fn load_json<T>(store: &dyn ProgressStore, namespace: &str, key: ProgressKey) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match store.get(namespace, key.as_str())? {
        Some(raw) => {
            with_store_context(serde_json::from_str(&raw), "parse", namespace, key.as_str())
        }
        None => Ok(T::default()),
    }
}

pub fn encode_json<T: Serialize>(namespace: &str, key: ProgressKey, value: &T) -> Result<String> {
    with_store_context(serde_json::to_string(value), "serialize", namespace, key.as_str())
}

pub fn save_json<T: Serialize>(
    store: &dyn ProgressStore,
    namespace: &str,
    key: ProgressKey,
    value: &T,
) -> Result<()> {
    let raw = encode_json(namespace, key, value)?;
    store.set(namespace, key.as_str(), &raw)
}

/// Progress entries persisted in the `progress_entries` table
#[derive(Clone)]
pub struct SqliteProgressStore {
    pool: DbPool,
}

impl SqliteProgressStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProgressStore for SqliteProgressStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let mut conn = database::get_connection(&self.pool)?;
        let entry = database::progress::get_entry(&mut conn, namespace, key)?;
        Ok(entry.map(|e| e.value))
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut conn = database::get_connection(&self.pool)?;
        database::progress::upsert_entry(&mut conn, namespace, key, value)?;
        log::debug!("Saved progress entry {}/{}", namespace, key);
        Ok(())
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::progress::list_keys(&mut conn, namespace)
    }

    fn set_many(&self, namespace: &str, entries: &[(&str, String)]) -> Result<()> {
        let mut conn = database::get_connection(&self.pool)?;
        database::progress::upsert_entries(&mut conn, namespace, entries)?;
        log::debug!("Saved {} progress entries for {}", entries.len(), namespace);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    entries: Mutex<BTreeMap<(String, String), String>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<(String, String), String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("progress store lock poisoned"))
    }
}

impl ProgressStore for MemoryProgressStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let entries = self.lock()?;
        Ok(entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;
        entries.insert((namespace.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>> {
        let entries = self.lock()?;
        Ok(entries
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, key)| key.clone())
            .collect())
    }

    fn set_many(&self, namespace: &str, batch: &[(&str, String)]) -> Result<()> {
        let mut entries = self.lock()?;
        for (key, value) in batch {
            entries.insert((namespace.to_string(), key.to_string()), value.clone());
        }
        Ok(())
    }
}
