//! End-to-end pipeline tests: full layer stacks over real byte stores.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use sealbox_codec::JsonCodec;
use sealbox_crypto::{AesCbcEncryptor, Sha256Validator};
use sealbox_migrate::{MigrationManager, Migrator};
use sealbox_store::{
    ByteStore, EncryptedProvider, FileStore, MemoryStore, PersistenceProvider, ProviderError,
    RawProvider, StoreProvider, ValidatedProvider,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Profile {
    name: String,
    level: u32,
}

fn profile() -> Profile {
    Profile {
        name: "A".to_string(),
        level: 1,
    }
}

/// Encryption over validation over a shared memory store: payloads are
/// encrypted first, then the ciphertext is stamped, so corruption is caught
/// before any decrypt runs.
fn secured_provider(store: Arc<MemoryStore>) -> PersistenceProvider<JsonCodec> {
    let base = Arc::new(StoreProvider::new(store));
    let validated = Arc::new(ValidatedProvider::new(
        base,
        Arc::new(Sha256Validator::new()),
    ));
    let encrypted = Arc::new(EncryptedProvider::new(
        validated,
        Arc::new(AesCbcEncryptor::from_passphrase("game-saves", Some(b"pepper"))),
    ));
    PersistenceProvider::new(JsonCodec::new(), encrypted)
}

#[test]
fn secured_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let provider = secured_provider(store.clone());

    provider.save("profile", &profile()).unwrap();

    let loaded: Profile = provider.load("profile").unwrap();
    assert_eq!(loaded, profile());

    // What actually hit the store is neither the JSON nor the frame.
    let stored = store.read("profile").unwrap().unwrap();
    assert!(!stored.windows(3).any(|w| w == b"SBX"));
    assert!(!stored.windows(3).any(|w| w == br#""A""#));
}

#[test]
fn corrupted_blob_fails_integrity_when_validated() {
    let store = Arc::new(MemoryStore::new());
    let provider = secured_provider(store.clone());

    provider.save("profile", &profile()).unwrap();

    // Flip one byte of the stored ciphertext (past the stamp frame).
    let mut stored = store.read("profile").unwrap().unwrap();
    let idx = stored.len() / 2;
    stored[idx] ^= 0x01;
    store.write("profile", &stored).unwrap();

    match provider.load::<Profile>("profile") {
        Err(ProviderError::Integrity { key }) => assert_eq!(key, "profile"),
        other => panic!("expected Integrity, got {other:?}"),
    }
}

#[test]
fn corrupted_blob_fails_crypto_when_only_encrypted() {
    let store = Arc::new(MemoryStore::new());
    let base = Arc::new(StoreProvider::new(store.clone()));
    let encrypted = Arc::new(EncryptedProvider::new(
        base,
        Arc::new(AesCbcEncryptor::from_passphrase("game-saves", Some(b"pepper"))),
    ));
    let provider = PersistenceProvider::new(JsonCodec::new(), encrypted);

    provider.save("profile", &profile()).unwrap();

    // Corrupt the final block so the padding check trips on decrypt.
    let mut stored = store.read("profile").unwrap().unwrap();
    let last = stored.len() - 1;
    stored[last] ^= 0x01;
    store.write("profile", &stored).unwrap();

    match provider.load::<Profile>("profile") {
        Err(ProviderError::Crypto { key, .. }) => assert_eq!(key, "profile"),
        other => panic!("expected Crypto, got {other:?}"),
    }
}

#[test]
fn secured_round_trip_over_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::open(dir.path().join("saves")).unwrap());
    let base = Arc::new(StoreProvider::new(store.clone()));
    let validated = Arc::new(ValidatedProvider::new(
        base,
        Arc::new(Sha256Validator::new()),
    ));
    let encrypted = Arc::new(EncryptedProvider::new(
        validated,
        Arc::new(AesCbcEncryptor::from_passphrase("game-saves", None)),
    ));
    let provider = PersistenceProvider::new(JsonCodec::new(), encrypted);

    provider.save("profile", &profile()).unwrap();
    let loaded: Profile = provider.load("profile").unwrap();
    assert_eq!(loaded, profile());

    // Corrupt the file on disk; the next load must fail loudly.
    let mut stored = store.read("profile").unwrap().unwrap();
    let idx = stored.len() - 1;
    stored[idx] ^= 0xff;
    store.write("profile", &stored).unwrap();
    assert!(provider.load::<Profile>("profile").is_err());
}

#[test]
fn missing_key_loads_default_through_full_stack() {
    let provider = secured_provider(Arc::new(MemoryStore::new()));
    let loaded: Profile = provider.load("never-saved").unwrap();
    assert_eq!(loaded, Profile::default());
}

#[test]
fn exists_and_delete_reach_the_store() {
    let store = Arc::new(MemoryStore::new());
    let provider = secured_provider(store.clone());

    provider.save("profile", &profile()).unwrap();
    assert!(provider.exists("profile").unwrap());
    assert!(store.exists("profile").unwrap());

    assert!(provider.delete("profile").unwrap());
    assert!(!store.exists("profile").unwrap());
}

#[derive(Debug, Deserialize)]
struct ProfileV1 {
    name: String,
}

#[test]
fn old_blob_migrates_through_encrypted_stack() {
    let store = Arc::new(MemoryStore::new());

    // Writer at schema v1.
    let v1_provider = secured_provider(store.clone());
    v1_provider
        .save("profile", &serde_json::json!({ "name": "A" }))
        .unwrap();

    // Reader at schema v2 with the upgrade step registered.
    let migrations = Arc::new(MigrationManager::new());
    migrations.register_for::<Profile>(
        Migrator::typed(1, 2, |old: ProfileV1| Profile {
            name: old.name,
            level: 1,
        })
        .unwrap(),
    );
    let v2_provider = secured_provider(store)
        .with_schema_version(2)
        .with_migrations(migrations);

    let loaded: Profile = v2_provider.load("profile").unwrap();
    assert_eq!(loaded, profile());
}

#[test]
fn wrong_passphrase_is_a_crypto_failure_not_garbage() {
    let store = Arc::new(MemoryStore::new());

    let base = Arc::new(StoreProvider::new(store.clone()));
    let writer = PersistenceProvider::new(
        JsonCodec::new(),
        Arc::new(EncryptedProvider::new(
            base,
            Arc::new(AesCbcEncryptor::from_passphrase("right", None)),
        )) as Arc<dyn RawProvider>,
    );
    writer.save("profile", &profile()).unwrap();

    let base = Arc::new(StoreProvider::new(store));
    let reader = PersistenceProvider::new(
        JsonCodec::new(),
        Arc::new(EncryptedProvider::new(
            base,
            Arc::new(AesCbcEncryptor::from_passphrase("wrong", None)),
        )) as Arc<dyn RawProvider>,
    );

    // Padding check catches the wrong key before any decode runs.
    assert!(reader.load::<Profile>("profile").is_err());
}

#[tokio::test]
async fn async_twins_round_trip() {
    let provider = secured_provider(Arc::new(MemoryStore::new()));

    provider.save_async("profile", profile()).await.unwrap();
    assert!(provider.exists_async("profile").await.unwrap());

    let loaded: Profile = provider.load_async("profile").await.unwrap();
    assert_eq!(loaded, profile());

    assert!(provider.delete_async("profile").await.unwrap());
    let after: Profile = provider.load_async("profile").await.unwrap();
    assert_eq!(after, Profile::default());
}

#[tokio::test]
async fn async_raw_twins_round_trip() {
    let provider = secured_provider(Arc::new(MemoryStore::new()));

    provider
        .save_raw_async("slot", b"raw bytes".to_vec())
        .await
        .unwrap();
    assert_eq!(
        provider.load_raw_async("slot").await.unwrap(),
        Some(b"raw bytes".to_vec())
    );
    assert_eq!(provider.load_raw_async("missing").await.unwrap(), None);
}

#[test]
fn different_keys_do_not_interfere() {
    let provider = secured_provider(Arc::new(MemoryStore::new()));

    provider.save("a", &profile()).unwrap();
    provider
        .save(
            "b",
            &Profile {
                name: "B".to_string(),
                level: 9,
            },
        )
        .unwrap();

    let a: Profile = provider.load("a").unwrap();
    let b: Profile = provider.load("b").unwrap();
    assert_eq!(a.name, "A");
    assert_eq!(b.name, "B");
}
