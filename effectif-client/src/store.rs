//! Credential store
//!
//! Durable key/value persistence for the auth credentials, with explicit
//! per-entry expirations. The store is the only component that touches
//! token/profile state on disk; everything above it goes through
//! [`crate::TokenAuthority`].
//!
//! Expiry is enforced by the storage layer on read: an entry past its
//! deadline reads as absent. Absence is a normal result, not an error.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Table for credential entries: key = entry name, value = JSON-serialized `Entry`
const CREDENTIALS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("credentials");

/// Store error type
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A stored value with its expiration deadline (epoch milliseconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    value: String,
    expires_at_ms: i64,
}

impl Entry {
    fn new(value: &str, ttl_ms: u64) -> Self {
        Self {
            value: value.to_string(),
            expires_at_ms: now_ms() + ttl_ms as i64,
        }
    }

    fn is_expired(&self) -> bool {
        now_ms() >= self.expires_at_ms
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Key/value persistence for credential entries
///
/// Writers of related entries must use the batch operations: a batch is
/// applied atomically, so no reader observes a partially-updated set.
pub trait CredentialStore: Send + Sync {
    /// Store one entry with its time-to-live
    fn set_entry(&self, name: &str, value: &str, ttl_ms: u64) -> StoreResult<()>;

    /// Read one entry; expired or missing entries read as `None`
    fn get_entry(&self, name: &str) -> StoreResult<Option<String>>;

    /// Delete one entry; deleting an absent entry is not an error
    fn delete_entry(&self, name: &str) -> StoreResult<()>;

    /// Store several entries atomically
    fn set_entries(&self, entries: &[(&str, &str, u64)]) -> StoreResult<()>;

    /// Delete several entries atomically
    fn delete_entries(&self, names: &[&str]) -> StoreResult<()>;
}

// ========== Durable store (redb) ==========

/// Credential store backed by a redb database file
///
/// redb commits with immediate durability by default: once a batch write
/// commits, the entries survive process restarts, which is what gives the
/// credentials their page-reload persistence.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;

        // Initialize the table so reads never observe a missing table
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CREDENTIALS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    fn write_batch(&self, entries: &[(&str, &str, u64)], removals: &[&str]) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CREDENTIALS_TABLE)?;
            for (name, value, ttl_ms) in entries {
                let encoded = serde_json::to_vec(&Entry::new(value, *ttl_ms))?;
                table.insert(*name, encoded.as_slice())?;
            }
            for name in removals {
                table.remove(*name)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

impl CredentialStore for RedbStore {
    fn set_entry(&self, name: &str, value: &str, ttl_ms: u64) -> StoreResult<()> {
        self.write_batch(&[(name, value, ttl_ms)], &[])
    }

    fn get_entry(&self, name: &str) -> StoreResult<Option<String>> {
        let entry = {
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table(CREDENTIALS_TABLE)?;
            match table.get(name)? {
                Some(guard) => Some(serde_json::from_slice::<Entry>(guard.value())?),
                None => None,
            }
        };

        match entry {
            Some(entry) if entry.is_expired() => {
                // Lazily drop the dead entry
                self.write_batch(&[], &[name])?;
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value)),
            None => Ok(None),
        }
    }

    fn delete_entry(&self, name: &str) -> StoreResult<()> {
        self.write_batch(&[], &[name])
    }

    fn set_entries(&self, entries: &[(&str, &str, u64)]) -> StoreResult<()> {
        self.write_batch(entries, &[])
    }

    fn delete_entries(&self, names: &[&str]) -> StoreResult<()> {
        self.write_batch(&[], names)
    }
}

// ========== In-memory store ==========

/// Non-durable store for tests and embedders that do not want a disk path
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn set_entry(&self, name: &str, value: &str, ttl_ms: u64) -> StoreResult<()> {
        self.set_entries(&[(name, value, ttl_ms)])
    }

    fn get_entry(&self, name: &str) -> StoreResult<Option<String>> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        match entries.get(name) {
            Some(entry) if entry.is_expired() => {
                entries.remove(name);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    fn delete_entry(&self, name: &str) -> StoreResult<()> {
        self.delete_entries(&[name])
    }

    fn set_entries(&self, batch: &[(&str, &str, u64)]) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        for (name, value, ttl_ms) in batch {
            entries.insert(name.to_string(), Entry::new(value, *ttl_ms));
        }
        Ok(())
    }

    fn delete_entries(&self, names: &[&str]) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        for name in names {
            entries.remove(*name);
        }
        Ok(())
    }
}
