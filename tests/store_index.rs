use passlink::ceremony::AuthenticatorStore;
use passlink::store::{CredentialKey, CredentialStore, NewAuthenticator, StoreError};
use std::collections::HashSet;

fn make_fields(id: &[u8], sign_count: u32) -> NewAuthenticator {
    NewAuthenticator {
        id: id.to_vec(),
        credential_id: id.iter().rev().copied().collect(),
        public_key: vec![0x04; 65],
        aaguid: vec![0xA0; 16],
        sign_count,
    }
}

#[test]
fn test_store_no_key_added_twice() {
    let mut store = CredentialStore::new();
    let users = ["alice", "bob", "mgmt"];
    for user in users {
        store.get_or_create_user(user);
    }

    let mut accepted = HashSet::new();
    // Ids deliberately collide across users and rounds
    for round in 0u8..40 {
        let user = users[(round % 3) as usize];
        let id = [round % 7, round % 2];
        match store.add_authenticator(user, make_fields(&id, 0)) {
            Ok(key) => {
                assert!(accepted.insert(key.clone()), "key {key} accepted twice");
                assert_eq!(key, CredentialKey::from_id(&id));
            }
            Err(StoreError::DuplicateCredential(key)) => {
                assert!(accepted.contains(&key), "rejected key {key} was never stored");
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(store.credential_count(), accepted.len());
}

#[test]
fn test_store_user_reflects_its_adds_only() {
    let mut store = CredentialStore::new();
    store.get_or_create_user("alice");
    store.get_or_create_user("bob");

    store.add_authenticator("alice", make_fields(&[0x01], 0)).unwrap();
    store.add_authenticator("bob", make_fields(&[0x02], 0)).unwrap();
    store.add_authenticator("alice", make_fields(&[0x03], 0)).unwrap();
    store.add_authenticator("bob", make_fields(&[0x01], 0)).unwrap_err();

    let alice = store.get_or_create_user("alice").clone();
    let again = store.get_or_create_user("alice").clone();
    assert_eq!(alice, again);
    assert_eq!(
        alice.credentials(),
        &[CredentialKey::from_id(&[0x01]), CredentialKey::from_id(&[0x03])]
    );
    assert_eq!(store.user("bob").unwrap().credentials(), &[CredentialKey::from_id(&[0x02])]);
}

#[test]
fn test_store_owner_is_registered_user() {
    let mut store = CredentialStore::new();
    store.get_or_create_user("alice");
    store.add_authenticator("alice", make_fields(&[0x0A, 0x0B], 3)).unwrap();

    let authr = store.get_authenticator(&[0x0A, 0x0B]).unwrap();
    assert!(store.registry().contains(&authr.owner));
    assert_eq!(authr.credential_id, vec![0x0B, 0x0A]);
    assert_eq!(authr.sign_count, 3);
}

#[test]
fn test_store_ceremony_facing_view() {
    let mut store = CredentialStore::new();
    let alice = store.get_or_create_user("alice").clone();

    let key = store
        .persist_new_authenticator(&alice, make_fields(&[0x11], 0))
        .unwrap();
    assert_eq!(key.as_str(), "11");

    let found = store.find_authenticators_for_user(&alice).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].owner, "alice");

    AuthenticatorStore::update_sign_count(&mut store, &[0x11], 9).unwrap();
    assert_eq!(store.find_authenticator_by_id(&[0x11]).unwrap().sign_count, 9);
    assert!(matches!(
        store.find_authenticator_by_id(&[0x12]),
        Err(StoreError::CredentialNotFound(_))
    ));

    // A user that only exists elsewhere is unknown to this store
    let mut other = CredentialStore::new();
    let ghost = other.get_or_create_user("ghost").clone();
    assert!(matches!(
        store.persist_new_authenticator(&ghost, make_fields(&[0x13], 0)),
        Err(StoreError::UserNotFound(_))
    ));
}
