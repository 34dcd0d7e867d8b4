//! # Client Equality Checking
//!
//! Compares a declarative client against its stored counterpart, field by
//! field, and explains every difference it finds.
//!
//! ## Comparison rules
//!
//! | Rule | Effect |
//! |------|--------|
//! | Declared fields only | Fields absent from the declared record are never checked |
//! | Canonical values | Both sides are canonicalized, so hex case and `0`/`1` flags never differ |
//! | Fixed order | Fields are walked in [`Field::ALL`] order |
//! | Full enumeration | Every differing field is reported, not just the first |
//!
//! The declared record is the authoritative intent. The stored record may
//! carry more (for example `createdAt` in the row) without affecting the
//! result.

use crate::canonicalize::canonicalize;
use crate::models::{ClientRecord, Comparison, FieldDiff};

/// Compares a declared client with the stored client of the same id.
///
/// # Arguments
///
/// * `declared` - The declarative (intended) record
/// * `stored` - The stored record, usually produced by canonicalizing a row
///
/// # Example
///
/// ```rust
/// use clientele_registry::compare::compare_clients;
/// use clientele_registry::{ClientRecord, Field};
///
/// let declared = ClientRecord {
///     id: "AB12".to_string(),
///     hashed_secret: "00ff".to_string(),
///     name: "App".to_string(),
///     image_uri: String::new(),
///     redirect_uri: String::new(),
///     terms_uri: None,
///     privacy_uri: None,
///     trusted: true,
///     can_grant: false,
/// };
///
/// let mut stored = declared.clone();
/// stored.id = "ab12".to_string();
/// assert!(compare_clients(&declared, &stored).is_equal());
///
/// stored.trusted = false;
/// let result = compare_clients(&declared, &stored);
/// assert_eq!(result.diffs()[0].field, Field::Trusted);
/// ```
pub fn compare_clients(declared: &ClientRecord, stored: &ClientRecord) -> Comparison {
    let declared = canonicalize(declared);
    let stored = canonicalize(stored);

    let diffs: Vec<FieldDiff> = declared
        .present_fields()
        .filter_map(|(field, declared_value)| {
            let stored_value = stored.get(field);
            if stored_value.as_ref() == Some(&declared_value) {
                return None;
            }
            Some(FieldDiff {
                field,
                declared: declared_value.to_string(),
                stored: stored_value.map(|value| value.to_string()),
            })
        })
        .collect();

    if diffs.is_empty() {
        Comparison::Equal
    } else {
        Comparison::Differs(diffs)
    }
}
