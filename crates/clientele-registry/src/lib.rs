//! # Clientele Registry - OAuth Client Records
//!
//! The registry holds OAuth client applications: their identifiers, display
//! metadata, trust level and hashed secrets. It is the data layer for both
//! the client list endpoint and the offline reconciliation run.
//!
//! ## Purpose
//!
//! This crate implements four capabilities:
//!
//! 1. **Canonicalization** - Reduces stored rows and declarative entries to a
//!    single comparable [`ClientRecord`] form.
//!
//! 2. **Equality Checking** - Compares a declared client against the store,
//!    field by field, over the fixed [`Field`] list.
//!
//! 3. **Secret Hashing** - The one-way digest used for `hashedSecret`.
//!
//! 4. **Persistent Registry** - Sled-backed storage of client rows and the
//!    developer-to-client index.
//!
//! ## Representation Contract
//!
//! | Concern | Stored row | Canonical form |
//! |---------|------------|----------------|
//! | Identifier, digest | raw bytes | lowercase hex |
//! | `trusted`, `canGrant` | `0` / `1` | `bool` |
//! | `termsUri`, `privacyUri` | empty string when unset | omitted when unset |
//! | `createdAt` | milliseconds | not present |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       CLIENT REGISTRY                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌───────────────────┐              ┌─────────────────────┐     │
//! │  │   CANONICALIZER   │  ClientRecord│  EQUALITY CHECKER   │     │
//! │  │                   │─────────────▶│                     │     │
//! │  │  • bytes → hex    │              │  • declared fields  │     │
//! │  │  • 0/1 → bool     │              │  • Field::ALL order │     │
//! │  │  • drop createdAt │              │  • Equal / Differs  │     │
//! │  └─────────▲─────────┘              └─────────────────────┘     │
//! │            │ StoredClient                                       │
//! │  ┌─────────┴─────────┐              ┌─────────────────────┐     │
//! │  │  SLED STORAGE     │              │   SECRET HASHER     │     │
//! │  │  • clients        │              │   SHA-256 → hex     │     │
//! │  │  • developers     │              │                     │     │
//! │  └───────────────────┘              └─────────────────────┘     │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use clientele_registry::{
//!     canonicalize::canonicalize, compare::compare_clients, ClientRegistry, ClientStore,
//!     Comparison, StoredClient,
//! };
//!
//! let registry = ClientRegistry::temporary().unwrap();
//! let row = StoredClient {
//!     id: vec![0xab, 0x12],
//!     hashed_secret: vec![0x00, 0xff],
//!     name: "App".to_string(),
//!     image_uri: String::new(),
//!     redirect_uri: "https://app.example/cb".to_string(),
//!     terms_uri: String::new(),
//!     privacy_uri: String::new(),
//!     trusted: 1,
//!     can_grant: 0,
//!     created_at: 0,
//! };
//! registry.register_client(&row, Some("dev@example.com")).unwrap();
//!
//! let stored = registry.get_client(&[0xab, 0x12]).unwrap().unwrap();
//! let mut declared = canonicalize(&stored);
//! declared.id = "AB12".to_string();
//!
//! assert_eq!(compare_clients(&declared, &canonicalize(&stored)), Comparison::Equal);
//! ```
//!
//! ## Security Considerations
//!
//! - Plaintext secrets never enter this crate's record types; only digests.
//! - The store is read-only from the perspective of reconciliation and the
//!   list endpoint. Write methods exist for seeding.

pub mod canonicalize;
pub mod compare;
pub mod models;
pub mod registry;
pub mod secret;
pub mod storage;

pub use models::{
    ClientRecord, Comparison, Field, FieldDiff, FieldValue, RegistryError, Result, StoredClient,
};
pub use registry::{ClientRegistry, ClientStore};
pub use secret::{SecretHasher, Sha256Hasher};

#[cfg(test)]
mod tests;
