//! Async handle around a `VaultStore`.
//!
//! Key derivation and file I/O block, so
//! every operation is shipped to tokio's blocking pool instead of running
//! on a scheduler thread.  All methods must be awaited inside a tokio
//! runtime.

use std::collections::BTreeMap;
use std::sync::Arc;

use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

use super::store::{VaultStatus, VaultStore};

/// Cloneable, thread-safe handle for async callers.
#[derive(Debug, Clone)]
pub struct SharedVault {
    inner: Arc<VaultStore>,
}

impl SharedVault {
    pub fn new(store: VaultStore) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// The underlying store, for synchronous callers.
    pub fn store(&self) -> &Arc<VaultStore> {
        &self.inner
    }

    pub async fn status(&self) -> Result<VaultStatus> {
        self.run(|store| Ok(store.status())).await
    }

    pub async fn init(&self, passphrase: &str) -> Result<()> {
        let passphrase = Zeroizing::new(passphrase.to_owned());
        self.run(move |store| store.init(&passphrase)).await
    }

    pub async fn unlock(&self, passphrase: &str) -> Result<()> {
        let passphrase = Zeroizing::new(passphrase.to_owned());
        self.run(move |store| store.unlock(&passphrase)).await
    }

    pub async fn lock(&self) -> Result<()> {
        self.run(|store| {
            store.lock();
            Ok(())
        })
        .await
    }

    pub async fn get_key(&self, name: &str) -> Result<Option<String>> {
        let name = name.to_owned();
        self.run(move |store| store.get_key(&name)).await
    }

    pub async fn get_masked_keys(&self) -> Result<BTreeMap<String, String>> {
        self.run(|store| store.get_masked_keys()).await
    }

    pub async fn update_key(&self, name: &str, value: &str, passphrase: &str) -> Result<()> {
        let name = name.to_owned();
        let value = Zeroizing::new(value.to_owned());
        let passphrase = Zeroizing::new(passphrase.to_owned());
        self.run(move |store| store.update_key(&name, &value, &passphrase))
            .await
    }

    pub async fn remove_key(&self, name: &str, passphrase: &str) -> Result<bool> {
        let name = name.to_owned();
        let passphrase = Zeroizing::new(passphrase.to_owned());
        self.run(move |store| store.remove_key(&name, &passphrase)).await
    }

    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&VaultStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| VaultError::Task(format!("vault task: {e}")))?
    }
}

impl From<VaultStore> for SharedVault {
    fn from(store: VaultStore) -> Self {
        Self::new(store)
    }
}
