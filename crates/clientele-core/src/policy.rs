//! Secret policy guard and required-field validation for declarative clients.
//!
//! Both checks run on the raw record exactly as it came out of the source
//! file, before anything touches the store. A failure in either is fatal
//! for the whole run: a malformed client list is a broken deployment
//! artifact and must not be partially applied.

use crate::error::{ReconcileError, SchemaViolation};
use crate::Result;
use clientele_registry::canonicalize::{canonicalize, normalize_hex_text};
use clientele_registry::secret::hash_hex;
use clientele_registry::{ClientRecord, Field, SecretHasher};
use serde_json::{Map, Value};
use tracing::{error, warn};

/// A declarative client as parsed from the source file.
pub type RawClient = Map<String, Value>;

/// The plaintext secret key that must never appear in the source.
pub const SECRET_KEY: &str = "secret";

/// Label used when a record has no usable name or id.
const UNKNOWN: &str = "unknown";

/// A declarative client that passed the guard and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredClient {
    /// The record in canonical form.
    pub record: ClientRecord,

    /// The store key, decoded from the hex identifier.
    pub lookup_key: Vec<u8>,
}

/// Rejects a record that carries a plaintext `secret`.
///
/// The error carries the digest the operator should store in
/// `hashedSecret` instead.
pub fn guard_secret<H: SecretHasher + ?Sized>(raw: &RawClient, hasher: &H) -> Result<()> {
    match raw.get(SECRET_KEY) {
        None | Some(Value::Null) => Ok(()),
        Some(secret) => Err(ReconcileError::PolicyViolation {
            client_id: label(raw, Field::Id),
            hashed_secret: hash_hex(hasher, &value_text(secret)),
        }),
    }
}

/// Checks required keys and converts the record to canonical form.
///
/// `name` must be non-empty text. `trusted` and `canGrant` are coerced to strict booleans; `null` counts as
/// `false`. Optional URIs that are absent, `null` or empty are unset.
pub fn validate_required(raw: &RawClient) -> Result<DeclaredClient> {
    if let Some(field) = Field::REQUIRED
        .into_iter()
        .find(|field| !raw.contains_key(field.key()))
    {
        let name = label(raw, Field::Name);
        error!(key = field.key(), name = %name, "client.missing.keys");
        return Err(SchemaViolation::MissingField {
            key: field.key(),
            name,
        }
        .into());
    }

    for key in raw.keys() {
        if Field::from_key(key).is_none() && key != SECRET_KEY {
            warn!(key = %key, name = %label(raw, Field::Name), "client.unknown.keys");
        }
    }

    let text = |field: Field| raw.get(field.key()).map(value_text).unwrap_or_default();
    if text(Field::Name).trim().is_empty() {
        return Err(SchemaViolation::Malformed {
            key: Field::Name.key().to_string(),
            name: UNKNOWN.to_string(),
            reason: "must not be empty".to_string(),
        }
        .into());
    }
    let optional = |field: Field| {
        raw.get(field.key())
            .filter(|value| !value.is_null())
            .map(value_text)
    };

    let record = canonicalize(&ClientRecord {
        id: text(Field::Id),
        hashed_secret: text(Field::HashedSecret),
        name: text(Field::Name),
        image_uri: text(Field::ImageUri),
        redirect_uri: text(Field::RedirectUri),
        terms_uri: optional(Field::TermsUri),
        privacy_uri: optional(Field::PrivacyUri),
        trusted: raw.get(Field::Trusted.key()).is_some_and(truthy),
        can_grant: raw.get(Field::CanGrant.key()).is_some_and(truthy),
    });

    let lookup_key = decode_hex(raw, Field::Id, &record.id)?;
    decode_hex(raw, Field::HashedSecret, &record.hashed_secret)?;

    Ok(DeclaredClient { record, lookup_key })
}

fn decode_hex(raw: &RawClient, field: Field, text: &str) -> Result<Vec<u8>> {
    let malformed = |reason: String| SchemaViolation::Malformed {
        key: field.key().to_string(),
        name: label(raw, Field::Name),
        reason,
    };
    if text.is_empty() {
        return Err(malformed("must not be empty".to_string()).into());
    }
    hex::decode(normalize_hex_text(text))
        .map_err(|e| malformed(format!("not hex encoded ({})", e)).into())
}

/// Renders a scalar as text. Strings are taken verbatim.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Loose truthiness for flags: `0`, `false`, `""` and `null` are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn label(raw: &RawClient, field: Field) -> String {
    raw.get(field.key())
        .map(value_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clientele_registry::Sha256Hasher;
    use serde_json::json;

    fn raw(value: Value) -> RawClient {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn complete() -> RawClient {
        raw(json!({
            "id": "AB12",
            "hashedSecret": "9F86D081",
            "name": "App",
            "imageUri": "",
            "redirectUri": "https://app.example/cb",
            "trusted": 1,
            "canGrant": 0
        }))
    }

    #[test]
    fn test_guard_accepts_hashed_secret_only() {
        assert!(guard_secret(&complete(), &Sha256Hasher).is_ok());
    }

    #[test]
    fn test_guard_rejects_plaintext_with_digest() {
        let mut client = complete();
        client.insert("secret".to_string(), json!("abc"));

        match guard_secret(&client, &Sha256Hasher) {
            Err(ReconcileError::PolicyViolation {
                client_id,
                hashed_secret,
            }) => {
                assert_eq!(client_id, "AB12");
                assert_eq!(hashed_secret, hash_hex(&Sha256Hasher, "abc"));
            }
            other => panic!("expected policy violation, got {:?}", other),
        }
    }

    #[test]
    fn test_guard_labels_missing_id_unknown() {
        let client = raw(json!({ "secret": "abc" }));
        let err = guard_secret(&client, &Sha256Hasher).unwrap_err();
        assert!(err.to_string().contains("client=unknown"));
    }

    #[test]
    fn test_validate_builds_canonical_record() {
        let declared = validate_required(&complete()).unwrap();
        assert_eq!(declared.record.id, "ab12");
        assert_eq!(declared.record.hashed_secret, "9f86d081");
        assert!(declared.record.trusted);
        assert!(!declared.record.can_grant);
        assert_eq!(declared.record.terms_uri, None);
        assert_eq!(declared.lookup_key, vec![0xab, 0x12]);
    }

    #[test]
    fn test_validate_reports_first_missing_key_and_name() {
        let mut client = complete();
        client.remove("redirectUri");
        client.remove("canGrant");

        match validate_required(&client) {
            Err(ReconcileError::SchemaViolation(SchemaViolation::MissingField { key, name })) => {
                assert_eq!(key, "redirectUri");
                assert_eq!(name, "App");
            }
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_missing_name_is_unknown() {
        let mut client = complete();
        client.remove("name");

        match validate_required(&client) {
            Err(ReconcileError::SchemaViolation(SchemaViolation::MissingField { key, name })) => {
                assert_eq!(key, "name");
                assert_eq!(name, "unknown");
            }
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_blank_name_is_malformed() {
        for blank in [json!(""), json!("   "), Value::Null] {
            let mut client = complete();
            client.insert("name".to_string(), blank);

            match validate_required(&client) {
                Err(ReconcileError::SchemaViolation(SchemaViolation::Malformed {
                    key, name, ..
                })) => {
                    assert_eq!(key, "name");
                    assert_eq!(name, "unknown");
                }
                other => panic!("expected malformed name, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_null_flags_are_false() {
        let mut client = complete();
        client.insert("trusted".to_string(), Value::Null);
        client.insert("canGrant".to_string(), json!("yes"));

        let declared = validate_required(&client).unwrap();
        assert!(!declared.record.trusted);
        assert!(declared.record.can_grant);
    }

    #[test]
    fn test_optional_uris_kept_when_set() {
        let mut client = complete();
        client.insert("termsUri".to_string(), json!("https://app.example/tos"));
        client.insert("privacyUri".to_string(), json!(""));

        let record = validate_required(&client).unwrap().record;
        assert_eq!(record.terms_uri.as_deref(), Some("https://app.example/tos"));
        assert_eq!(record.privacy_uri, None);
    }

    #[test]
    fn test_non_hex_id_is_malformed() {
        let mut client = complete();
        client.insert("id".to_string(), json!("not-hex"));

        let err = validate_required(&client).unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::SchemaViolation(SchemaViolation::Malformed { .. })
        ));
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!(true)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(0.0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&Value::Null));
    }
}
