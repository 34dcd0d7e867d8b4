//! # Client Canonicalization
//!
//! Converts client records into the single encoding used for comparison.
//! Two records that canonicalize to the same [`ClientRecord`] are equal,
//! no matter how their source represented them.
//!
//! ## Rules
//!
//! 1. **Byte strings**: identifiers and secret digests are rendered as
//!    lowercase hex. Hex text from the declarative source is lowercased.
//! 2. **Booleans**: the store's `0` / `1` integers become strict booleans.
//!    Any non-zero integer is `true`.
//! 3. **Optional URIs**: `termsUri` and `privacyUri` are omitted when empty,
//!    so "absent" and "empty" never compare as different.
//! 4. **Bookkeeping**: `createdAt` is dropped.
//!
//! Canonicalization is pure and idempotent:
//! `canonicalize(&canonicalize(x)) == canonicalize(x)`.
//!
//! ## Example
//!
//! ```rust
//! use clientele_registry::canonicalize::canonicalize;
//! use clientele_registry::StoredClient;
//!
//! let stored = StoredClient {
//!     id: vec![0xAB, 0x12],
//!     hashed_secret: vec![0x00, 0xFF],
//!     name: "App".to_string(),
//!     image_uri: String::new(),
//!     redirect_uri: "https://app.example/cb".to_string(),
//!     terms_uri: String::new(),
//!     privacy_uri: String::new(),
//!     trusted: 1,
//!     can_grant: 0,
//!     created_at: 1_400_000_000_000,
//! };
//!
//! let record = canonicalize(&stored);
//! assert_eq!(record.id, "ab12");
//! assert_eq!(record.hashed_secret, "00ff");
//! assert!(record.trusted);
//! assert_eq!(record.terms_uri, None);
//! ```

use crate::models::{ClientRecord, StoredClient};

/// Conversion into the canonical [`ClientRecord`] form.
pub trait Canonicalize {
    /// Produces the canonical form of this record.
    fn canonicalize(&self) -> ClientRecord;
}

/// Canonicalizes any supported record shape.
pub fn canonicalize<C: Canonicalize + ?Sized>(record: &C) -> ClientRecord {
    record.canonicalize()
}

impl Canonicalize for StoredClient {
    fn canonicalize(&self) -> ClientRecord {
        ClientRecord {
            id: canonical_hex(&self.id),
            hashed_secret: canonical_hex(&self.hashed_secret),
            name: self.name.clone(),
            image_uri: self.image_uri.clone(),
            redirect_uri: self.redirect_uri.clone(),
            terms_uri: optional_uri(&self.terms_uri),
            privacy_uri: optional_uri(&self.privacy_uri),
            // the store keeps booleans as 0 or 1
            trusted: self.trusted != 0,
            can_grant: self.can_grant != 0,
        }
    }
}

impl Canonicalize for ClientRecord {
    fn canonicalize(&self) -> ClientRecord {
        ClientRecord {
            id: normalize_hex_text(&self.id),
            hashed_secret: normalize_hex_text(&self.hashed_secret),
            name: self.name.clone(),
            image_uri: self.image_uri.clone(),
            redirect_uri: self.redirect_uri.clone(),
            terms_uri: self.terms_uri.as_deref().and_then(optional_uri),
            privacy_uri: self.privacy_uri.as_deref().and_then(optional_uri),
            trusted: self.trusted,
            can_grant: self.can_grant,
        }
    }
}

/// Encodes bytes in the canonical lowercase hex form.
pub fn canonical_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Normalizes hex text from the declarative source to lowercase.
pub fn normalize_hex_text(text: &str) -> String {
    text.trim().to_ascii_lowercase()
}

fn optional_uri(uri: &str) -> Option<String> {
    if uri.is_empty() {
        None
    } else {
        Some(uri.to_string())
    }
}
