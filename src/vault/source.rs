//! Credential lookup for services that consume secrets.
//!
//! Consumers (an AI completion client, a social-platform client, ...)
//! only need "give me this key if you can".  A locked vault and an unset
//! key both come back as `None`, and the caller should treat the
//! feature as unavailable.

use std::sync::Arc;

use tracing::debug;

use super::shared::SharedVault;
use super::store::VaultStore;

pub trait CredentialSource: Send + Sync {
    /// The non-empty value stored under `name`, if it can be read now.
    fn credential(&self, name: &str) -> Option<String>;

    /// Whether `name` can be read right now.
    fn has_credential(&self, name: &str) -> bool {
        self.credential(name).is_some()
    }
}

impl CredentialSource for VaultStore {
    fn credential(&self, name: &str) -> Option<String> {
        match self.get_key(name) {
            Ok(Some(value)) if !value.is_empty() => Some(value),
            Ok(_) => {
                debug!(key = %name, "credential not set");
                None
            }
            Err(e) => {
                debug!(key = %name, error = %e, "credential unavailable");
                None
            }
        }
    }
}

/// Reads the store directly on the calling thread.  It waits on the same
/// mutex as writes, so from async code it can stall a worker for the length
/// of an in-flight update.  Prefer [`SharedVault::get_key`] there.
impl CredentialSource for SharedVault {
    fn credential(&self, name: &str) -> Option<String> {
        self.store().credential(name)
    }
}

impl<T: CredentialSource + ?Sized> CredentialSource for Arc<T> {
    fn credential(&self, name: &str) -> Option<String> {
        (**self).credential(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Argon2Params;
    use crate::vault::VaultOptions;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> VaultStore {
        VaultStore::new(
            dir.path().join("vault.json"),
            VaultOptions {
                argon2: Argon2Params {
                    memory_kib: 8_192,
                    iterations: 1,
                    parallelism: 1,
                },
                ..VaultOptions::default()
            },
        )
    }

    /// Stand-in consumer: only offers completions when a key is present.
    fn completion_available(source: &dyn CredentialSource) -> bool {
        source.has_credential("GEMINI_API_KEY")
    }

    #[test]
    fn locked_vault_degrades_to_none() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.credential("GEMINI_API_KEY").is_none());
        assert!(!completion_available(&store));
    }

    #[test]
    fn unset_and_empty_keys_are_none() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init("correct horse battery staple").unwrap();
        store
            .update_key("OPENAI_API_KEY", "", "correct horse battery staple")
            .unwrap();

        assert!(store.credential("GEMINI_API_KEY").is_none());
        assert!(store.credential("OPENAI_API_KEY").is_none());
    }

    #[test]
    fn set_key_is_returned_through_arc() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.init("correct horse battery staple").unwrap();
        store
            .update_key("GEMINI_API_KEY", "sk-ABCDEFGHIJKL", "correct horse battery staple")
            .unwrap();

        let shared: Arc<VaultStore> = Arc::new(store);
        assert_eq!(
            shared.credential("GEMINI_API_KEY").as_deref(),
            Some("sk-ABCDEFGHIJKL")
        );
        assert!(completion_available(&shared));
    }
}
