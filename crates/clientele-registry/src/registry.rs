//! # Client Registry - Main Facade
//!
//! This module provides the read interface the rest of the system consumes:
//! the [`ClientStore`] trait, and [`ClientRegistry`], its Sled-backed
//! implementation.
//!
//! ## Architecture
//!
//! ```text
//!        ┌──────────────────┐      ┌──────────────────┐
//!        │    Reconciler    │      │  Read endpoint   │
//!        └────────┬─────────┘      └────────┬─────────┘
//!                 │  get_client             │  clients_for_developer
//!                 └────────────┬────────────┘
//!                              ▼
//!                    ┌────────────────────┐
//!                    │   ClientRegistry   │
//!                    │  (ClientStore)     │
//!                    └─────────┬──────────┘
//!                              ▼
//!                    ┌────────────────────┐
//!                    │  Storage (Sled)    │
//!                    └────────────────────┘
//! ```

use crate::models::{Result, StoredClient};
use crate::storage::Storage;
use std::path::Path;

/// Read-only access to stored clients.
///
/// Implementations must be deterministic and side-effect free. A client that
/// does not exist is `Ok(None)`, never an error; errors mean the store itself
/// could not be queried.
pub trait ClientStore: Send + Sync {
    /// Fetches a single client by id.
    fn get_client(&self, id: &[u8]) -> Result<Option<StoredClient>>;

    /// Fetches every client belonging to a developer account.
    fn clients_for_developer(&self, email: &str) -> Result<Vec<StoredClient>>;
}

/// The Sled-backed client registry.
///
/// # Example
///
/// ```rust
/// use clientele_registry::{ClientRegistry, ClientStore};
///
/// let registry = ClientRegistry::temporary().unwrap();
/// assert!(registry.get_client(&[0xab]).unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ClientRegistry {
    /// Persistent storage for client rows.
    storage: Storage,
}

impl ClientRegistry {
    /// Opens a registry over the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Database` if the database cannot be opened.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(ClientRegistry {
            storage: Storage::open(path)?,
        })
    }

    /// Creates a registry over an in-memory database.
    pub fn temporary() -> Result<Self> {
        Ok(ClientRegistry {
            storage: Storage::temporary()?,
        })
    }

    /// Wraps an existing storage handle.
    pub fn with_storage(storage: Storage) -> Self {
        ClientRegistry { storage }
    }

    /// The underlying storage, for seeding and maintenance.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Seeds a client row and, optionally, its owning developer.
    pub fn register_client(&self, client: &StoredClient, developer: Option<&str>) -> Result<()> {
        self.storage.store_client(client)?;
        if let Some(email) = developer {
            self.storage.add_developer(email, &client.id)?;
        }
        Ok(())
    }

    /// Number of stored clients.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if no clients are stored.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl ClientStore for ClientRegistry {
    fn get_client(&self, id: &[u8]) -> Result<Option<StoredClient>> {
        self.storage.load_client(id)
    }

    fn clients_for_developer(&self, email: &str) -> Result<Vec<StoredClient>> {
        self.storage.clients_for_developer(email)
    }
}
