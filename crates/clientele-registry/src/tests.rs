//! Registry scenarios exercising storage, canonicalization and comparison
//! together.

use crate::canonicalize::canonicalize;
use crate::compare::compare_clients;
use crate::{ClientRegistry, ClientStore, Comparison, Field, StoredClient};

fn row(id: &[u8], trusted: u8) -> StoredClient {
    StoredClient {
        id: id.to_vec(),
        hashed_secret: vec![0xba, 0x78, 0x16, 0xbf],
        name: "Sync".to_string(),
        image_uri: "https://img.example/sync.png".to_string(),
        redirect_uri: "https://sync.example/oauth".to_string(),
        terms_uri: String::new(),
        privacy_uri: String::new(),
        trusted,
        can_grant: 0,
        created_at: 1_400_000_000_000,
    }
}

#[test]
fn test_stored_row_matches_its_own_canonical_form() {
    let registry = ClientRegistry::temporary().unwrap();
    registry.register_client(&row(&[0xab, 0x12], 1), None).unwrap();

    let stored = registry.get_client(&[0xab, 0x12]).unwrap().unwrap();
    let canonical = canonicalize(&stored);

    assert_eq!(compare_clients(&canonical, &canonical), Comparison::Equal);
}

#[test]
fn test_declared_trusted_against_untrusted_row_differs() {
    let registry = ClientRegistry::temporary().unwrap();
    registry.register_client(&row(&[0xab, 0x12], 0), None).unwrap();

    let mut declared = canonicalize(&row(&[0xab, 0x12], 1));
    declared.id = "AB12".to_string();
    let stored = canonicalize(&registry.get_client(&[0xab, 0x12]).unwrap().unwrap());

    match compare_clients(&declared, &stored) {
        Comparison::Differs(diffs) => {
            assert_eq!(diffs.len(), 1);
            assert_eq!(diffs[0].field, Field::Trusted);
        }
        Comparison::Equal => panic!("expected a trusted mismatch"),
    }
}

#[test]
fn test_register_client_indexes_developer() {
    let registry = ClientRegistry::temporary().unwrap();
    registry
        .register_client(&row(&[1], 1), Some("dev@example.com"))
        .unwrap();
    registry.register_client(&row(&[2], 0), None).unwrap();

    assert_eq!(registry.len(), 2);
    let owned = registry.clients_for_developer("dev@example.com").unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].id, vec![1]);
}

#[test]
fn test_registry_over_disk_database() {
    let dir = tempfile::TempDir::new().unwrap();
    let registry = ClientRegistry::new(dir.path().join("registry.db")).unwrap();
    assert!(registry.is_empty());
    assert!(registry.get_client(&[0xff]).unwrap().is_none());
}
