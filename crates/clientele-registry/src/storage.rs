//! # Persistent Storage Layer
//!
//! This module provides the client row store, backed by Sled. Rows are kept
//! in the store's own representation ([`StoredClient`]): raw identifier
//! bytes, `0` / `1` flags and empty strings for unset URIs.
//!
//! ## Storage Structure
//!
//! The database uses two trees (namespaces):
//!
//! | Tree | Key | Value | Purpose |
//! |------|-----|-------|---------|
//! | `clients` | client id bytes | serialized StoredClient | Lookup by id |
//! | `developers` | `email \0 client id` | empty | Clients per developer account |
//!
//! ## Access Pattern
//!
//! Reconciliation and the read endpoint only ever read. The write methods
//! exist so operators and tests can seed a store.
//!
//! ## References
//!
//! - Sled documentation: <https://sled.rs/>

use crate::models::{RegistryError, Result, StoredClient};
use std::path::Path;

/// Tree name for client rows.
const CLIENT_TREE: &str = "clients";

/// Tree name for the developer index.
const DEVELOPER_TREE: &str = "developers";

/// Separator between the email and client id in developer index keys.
const INDEX_SEPARATOR: u8 = 0;

/// Wrapper around a Sled database for client storage.
///
/// # Thread Safety
///
/// The underlying Sled database is thread-safe. `Storage` is cheap to clone
/// and clones share the same database.
///
/// # Example
///
/// ```rust
/// use clientele_registry::storage::Storage;
/// use clientele_registry::StoredClient;
///
/// let storage = Storage::temporary().unwrap();
///
/// let client = StoredClient {
///     id: vec![0xab, 0x12],
///     hashed_secret: vec![0x00],
///     name: "App".to_string(),
///     image_uri: String::new(),
///     redirect_uri: String::new(),
///     terms_uri: String::new(),
///     privacy_uri: String::new(),
///     trusted: 0,
///     can_grant: 0,
///     created_at: 0,
/// };
///
/// storage.store_client(&client).unwrap();
/// assert_eq!(storage.load_client(&[0xab, 0x12]).unwrap(), Some(client));
/// ```
#[derive(Clone)]
pub struct Storage {
    /// The underlying Sled database.
    db: sled::Db,

    /// Client rows keyed by id.
    clients: sled::Tree,

    /// Developer email to client id index.
    developers: sled::Tree,
}

impl Storage {
    /// Opens or creates a storage database at the given path.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Database` if the path is invalid, permissions
    /// are insufficient, or the database is corrupted.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Creates a temporary in-memory storage.
    ///
    /// The database is lost when the last clone is dropped.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let clients = db.open_tree(CLIENT_TREE)?;
        let developers = db.open_tree(DEVELOPER_TREE)?;
        Ok(Storage {
            db,
            clients,
            developers,
        })
    }

    /// Stores a client row, overwriting any row with the same id.
    pub fn store_client(&self, client: &StoredClient) -> Result<()> {
        let bytes = serde_json::to_vec(client)?;
        self.clients.insert(client.id.as_slice(), bytes)?;
        Ok(())
    }

    /// Associates a client with a developer account.
    pub fn add_developer(&self, email: &str, client_id: &[u8]) -> Result<()> {
        self.developers
            .insert(developer_key(email, client_id), &[] as &[u8])?;
        Ok(())
    }

    /// Loads a client row by id.
    ///
    /// # Returns
    ///
    /// `Some(row)` if found, `None` if the store has no such client.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Serialization` if the stored row is corrupted.
    /// Returns `RegistryError::Database` if reading from the database fails.
    pub fn load_client(&self, id: &[u8]) -> Result<Option<StoredClient>> {
        match self.clients.get(id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Loads every client row associated with a developer account.
    ///
    /// Rows are returned in client id order. Index entries that point at a
    /// missing row are skipped.
    pub fn clients_for_developer(&self, email: &str) -> Result<Vec<StoredClient>> {
        let mut prefix = email.as_bytes().to_vec();
        prefix.push(INDEX_SEPARATOR);

        let mut clients = Vec::new();
        for entry in self.developers.scan_prefix(&prefix) {
            let (key, _) = entry?;
            let client_id = key.get(prefix.len()..).ok_or_else(|| {
                RegistryError::Corrupt(format!("developer index key for {}", email))
            })?;
            if let Some(client) = self.load_client(client_id)? {
                clients.push(client);
            }
        }

        Ok(clients)
    }

    /// Returns the number of stored clients.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no clients are stored.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Flushes all pending writes to disk.
    ///
    /// # Returns
    ///
    /// The number of bytes flushed.
    pub fn flush(&self) -> Result<usize> {
        Ok(self.db.flush()?)
    }
}

fn developer_key(email: &str, client_id: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(email.len() + 1 + client_id.len());
    key.extend_from_slice(email.as_bytes());
    key.push(INDEX_SEPARATOR);
    key.extend_from_slice(client_id);
    key
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("clients_count", &self.len())
            .finish()
    }
}
