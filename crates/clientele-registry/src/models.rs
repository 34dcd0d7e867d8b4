//! # Core Data Models for the Client Registry
//!
//! This module defines the types shared by every part of the registry: the
//! explicit field list, the canonical client record used for comparison, the
//! stored row shape, and the comparison result types.
//!
//! ## Two shapes, one comparison
//!
//! A client exists in two heterogeneous shapes:
//!
//! | Shape | Source | Identifier | Booleans | Optional URIs |
//! |-------|--------|------------|----------|---------------|
//! | [`StoredClient`] | row store | raw bytes | `0` / `1` integers | empty string when unset |
//! | [`ClientRecord`] | declarative file, canonical form | lowercase hex text | strict `bool` | `None` when unset |
//!
//! Both are reduced to a [`ClientRecord`] by the canonicalizer before they
//! are compared, so representation differences never surface as drift.
//!
//! ## Field contract
//!
//! [`Field::ALL`] is the single list of comparable fields. The canonicalizer
//! and the equality checker both walk it, which keeps the comparison set a
//! compile-time contract instead of whatever keys a record happens to carry.
//! `createdAt` is deliberately not a [`Field`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A comparable client field.
///
/// Variants serialize to the declarative source's key names
/// (`hashedSecret`, `imageUri`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    /// Client identifier, lowercase hex.
    Id,
    /// Digest of the client secret, lowercase hex.
    HashedSecret,
    /// Display name.
    Name,
    /// Logo URI, may be empty.
    ImageUri,
    /// OAuth redirect URI, may be empty.
    RedirectUri,
    /// Terms of service URI, optional.
    TermsUri,
    /// Privacy policy URI, optional.
    PrivacyUri,
    /// Elevated-trust flag (implicit consent).
    Trusted,
    /// Whether the client may be granted tokens directly.
    CanGrant,
}

impl Field {
    /// Every comparable field, in comparison order.
    pub const ALL: [Field; 9] = [
        Field::Id,
        Field::HashedSecret,
        Field::Name,
        Field::ImageUri,
        Field::RedirectUri,
        Field::TermsUri,
        Field::PrivacyUri,
        Field::Trusted,
        Field::CanGrant,
    ];

    /// Fields a declarative record must carry, in the order they are checked.
    pub const REQUIRED: [Field; 7] = [
        Field::Id,
        Field::HashedSecret,
        Field::Name,
        Field::ImageUri,
        Field::RedirectUri,
        Field::Trusted,
        Field::CanGrant,
    ];

    /// The key used for this field in the declarative source.
    pub fn key(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::HashedSecret => "hashedSecret",
            Field::Name => "name",
            Field::ImageUri => "imageUri",
            Field::RedirectUri => "redirectUri",
            Field::TermsUri => "termsUri",
            Field::PrivacyUri => "privacyUri",
            Field::Trusted => "trusted",
            Field::CanGrant => "canGrant",
        }
    }

    /// Looks up a field by its declarative key.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Optional fields are omitted from the canonical form when unset.
    pub fn is_optional(self) -> bool {
        matches!(self, Field::TermsUri | Field::PrivacyUri)
    }

    /// Boolean fields; the store keeps these as `0` / `1`.
    pub fn is_flag(self) -> bool {
        matches!(self, Field::Trusted | Field::CanGrant)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The canonical value of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Text, including hex-encoded byte strings.
    Text(String),
    /// Strict boolean.
    Flag(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

/// A client in canonical form.
///
/// This is the shape of a declarative source entry and the shape every
/// stored row is converted into before comparison.
///
/// # Example
///
/// ```rust
/// use clientele_registry::{ClientRecord, Field, FieldValue};
///
/// let record = ClientRecord {
///     id: "ab12".to_string(),
///     hashed_secret: "ff00".to_string(),
///     name: "App".to_string(),
///     image_uri: String::new(),
///     redirect_uri: "https://app.example/cb".to_string(),
///     terms_uri: None,
///     privacy_uri: None,
///     trusted: true,
///     can_grant: false,
/// };
///
/// assert_eq!(record.get(Field::Trusted), Some(FieldValue::Flag(true)));
/// assert_eq!(record.get(Field::TermsUri), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    /// Client identifier, lowercase hex.
    pub id: String,

    /// Secret digest, lowercase hex. Never a plaintext secret.
    pub hashed_secret: String,

    /// Display name.
    pub name: String,

    /// Logo URI.
    pub image_uri: String,

    /// Redirect URI.
    pub redirect_uri: String,

    /// Terms of service URI. `None` and `Some("")` canonicalize the same.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_uri: Option<String>,

    /// Privacy policy URI. `None` and `Some("")` canonicalize the same.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_uri: Option<String>,

    /// Elevated-trust flag.
    pub trusted: bool,

    /// Direct-grant flag.
    pub can_grant: bool,
}

impl ClientRecord {
    /// Returns the value of `field`, or `None` for an unset optional field.
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        let text = |value: &String| Some(FieldValue::Text(value.clone()));
        match field {
            Field::Id => text(&self.id),
            Field::HashedSecret => text(&self.hashed_secret),
            Field::Name => text(&self.name),
            Field::ImageUri => text(&self.image_uri),
            Field::RedirectUri => text(&self.redirect_uri),
            Field::TermsUri => self.terms_uri.as_ref().and_then(text),
            Field::PrivacyUri => self.privacy_uri.as_ref().and_then(text),
            Field::Trusted => Some(FieldValue::Flag(self.trusted)),
            Field::CanGrant => Some(FieldValue::Flag(self.can_grant)),
        }
    }

    /// Iterates the fields this record carries, in [`Field::ALL`] order.
    pub fn present_fields(&self) -> impl Iterator<Item = (Field, FieldValue)> + '_ {
        Field::ALL
            .into_iter()
            .filter_map(move |field| self.get(field).map(|value| (field, value)))
    }
}

/// A client row as the store keeps it.
///
/// Identifiers and digests are raw bytes, booleans are `0` / `1`, unset
/// optional URIs are empty strings, and `created_at` is bookkeeping that
/// never takes part in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredClient {
    /// Client identifier bytes.
    pub id: Vec<u8>,

    /// Secret digest bytes.
    pub hashed_secret: Vec<u8>,

    /// Display name.
    pub name: String,

    /// Logo URI.
    pub image_uri: String,

    /// Redirect URI.
    pub redirect_uri: String,

    /// Terms of service URI, empty when unset.
    #[serde(default)]
    pub terms_uri: String,

    /// Privacy policy URI, empty when unset.
    #[serde(default)]
    pub privacy_uri: String,

    /// Trusted flag as stored (`0` or `1`).
    pub trusted: u8,

    /// Direct-grant flag as stored (`0` or `1`).
    pub can_grant: u8,

    /// Creation time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: u64,
}

/// A single field that differs between the declarative and stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    /// The field that differs.
    pub field: Field,

    /// Canonical value in the declarative record.
    pub declared: String,

    /// Canonical value in the stored record, `None` if the store has no value.
    pub stored: Option<String>,
}

impl fmt::Display for FieldDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stored {
            Some(stored) => write!(
                f,
                "{}: declared '{}', stored '{}'",
                self.field, self.declared, stored
            ),
            None => write!(f, "{}: declared '{}', stored <unset>", self.field, self.declared),
        }
    }
}

/// Result of comparing a declarative record against its stored counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Every declared field matches the store.
    Equal,

    /// At least one declared field differs. Diffs are in [`Field::ALL`] order.
    Differs(Vec<FieldDiff>),
}

impl Comparison {
    /// Returns true if no field differs.
    pub fn is_equal(&self) -> bool {
        matches!(self, Comparison::Equal)
    }

    /// The differing fields; empty for [`Comparison::Equal`].
    pub fn diffs(&self) -> &[FieldDiff] {
        match self {
            Comparison::Equal => &[],
            Comparison::Differs(diffs) => diffs,
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to open or query the database.
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Failed to serialize or deserialize a stored row.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored key or index entry could not be decoded.
    #[error("Corrupt registry entry: {0}")]
    Corrupt(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ClientRecord {
        ClientRecord {
            id: "ab12".to_string(),
            hashed_secret: "00ff".to_string(),
            name: "App".to_string(),
            image_uri: String::new(),
            redirect_uri: "https://app.example/cb".to_string(),
            terms_uri: Some("https://app.example/tos".to_string()),
            privacy_uri: None,
            trusted: true,
            can_grant: false,
        }
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("createdAt"), None);
        assert_eq!(Field::from_key("secret"), None);
    }

    #[test]
    fn test_required_fields_exclude_optional_uris() {
        assert!(Field::REQUIRED.iter().all(|field| !field.is_optional()));
        assert_eq!(Field::ALL.iter().filter(|f| f.is_optional()).count(), 2);
    }

    #[test]
    fn test_present_fields_skip_unset_optionals() {
        let fields: Vec<Field> = record().present_fields().map(|(f, _)| f).collect();
        assert!(fields.contains(&Field::TermsUri));
        assert!(!fields.contains(&Field::PrivacyUri));
        assert_eq!(fields.len(), 8);
    }

    #[test]
    fn test_record_serializes_with_declarative_keys() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(value["hashedSecret"], "00ff");
        assert_eq!(value["canGrant"], false);
        assert!(value.get("privacyUri").is_none());
    }

    #[test]
    fn test_field_diff_display() {
        let diff = FieldDiff {
            field: Field::Trusted,
            declared: "true".to_string(),
            stored: Some("false".to_string()),
        };
        assert_eq!(diff.to_string(), "trusted: declared 'true', stored 'false'");
    }
}
