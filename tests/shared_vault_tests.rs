//! Integration tests for the async `SharedVault` handle.

use credvault::crypto::Argon2Params;
use credvault::errors::VaultError;
use credvault::vault::{CredentialSource, SharedVault, VaultOptions, VaultStore};
use tempfile::TempDir;

const PASS: &str = "correct horse battery staple";

fn shared(dir: &TempDir) -> SharedVault {
    SharedVault::new(VaultStore::new(
        dir.path().join("vault.json"),
        VaultOptions {
            argon2: Argon2Params {
                memory_kib: 8_192,
                iterations: 1,
                parallelism: 1,
            },
            ..VaultOptions::default()
        },
    ))
}

#[tokio::test]
async fn async_lifecycle() {
    let dir = TempDir::new().unwrap();
    let vault = shared(&dir);

    assert!(!vault.status().await.unwrap().initialized);
    vault.init(PASS).await.unwrap();
    vault
        .update_key("ANTHROPIC_API_KEY", "sk-ant-0123456789", PASS)
        .await
        .unwrap();
    vault.lock().await.unwrap();
    assert!(matches!(
        vault.get_key("ANTHROPIC_API_KEY").await,
        Err(VaultError::Locked)
    ));

    vault.unlock(PASS).await.unwrap();
    assert_eq!(
        vault.get_masked_keys().await.unwrap()["ANTHROPIC_API_KEY"],
        "sk-a...6789"
    );
    assert!(vault.remove_key("ANTHROPIC_API_KEY", PASS).await.unwrap());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_async_writers_keep_every_key() {
    let dir = TempDir::new().unwrap();
    let vault = shared(&dir);
    vault.init(PASS).await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..4 {
        let vault = vault.clone();
        tasks.push(tokio::spawn(async move {
            vault
                .update_key(&format!("KEY_{i}"), &format!("value-number-{i}"), PASS)
                .await
        }));
    }
    for t in tasks {
        t.await.unwrap().unwrap();
    }

    for i in 0..4 {
        assert_eq!(
            vault.credential(&format!("KEY_{i}")),
            Some(format!("value-number-{i}"))
        );
    }
}

#[tokio::test]
async fn wrong_passphrase_then_right_passphrase() {
    let dir = TempDir::new().unwrap();
    let vault = shared(&dir);
    vault.init(PASS).await.unwrap();
    vault.lock().await.unwrap();

    let clone = vault.clone();
    assert!(matches!(
        clone.unlock("Tr0ub4dor&3").await,
        Err(VaultError::Authentication)
    ));
    assert!(!vault.status().await.unwrap().unlocked);
    assert!(!vault.has_credential("GEMINI_API_KEY"));

    clone.unlock(PASS).await.unwrap();
    assert!(vault.status().await.unwrap().unlocked);
}

#[tokio::test]
async fn bad_guess_from_one_clone_keeps_others_served() {
    let dir = TempDir::new().unwrap();
    let vault = shared(&dir);
    vault.init(PASS).await.unwrap();
    vault
        .update_key("GEMINI_API_KEY", "sk-ABCDEFGHIJKL", PASS)
        .await
        .unwrap();

    let other = vault.clone();
    assert!(other.unlock("attacker guess").await.is_err());

    assert_eq!(
        vault.credential("GEMINI_API_KEY").as_deref(),
        Some("sk-ABCDEFGHIJKL")
    );
}
