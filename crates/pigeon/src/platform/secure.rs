//! Secure on-device credential storage
//!
//! Persists opaque strings under fixed keys: the token pair plus per-user
//! biometric opt-in flags. The mobile shells back this with the platform
//! keychain/keystore; desktop and test builds use the file and in-memory
//! implementations here.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use anyhow::{Context, Result};

/// Fixed keys for the persisted session tokens
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
}

/// Key-value storage for secrets
pub trait SecureStore: Send + Sync {
    /// Read a value, returning None when the key was never set
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed secure store (~/.config/pigeon/credentials.json)
///
/// Values are kept in memory and flushed to disk on every mutation.
pub struct FileSecureStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FileSecureStore {
    /// Credentials filename in the Pigeon config directory
    const CREDENTIALS_FILE: &'static str = "credentials.json";

    /// Open the default store, creating the config directory if needed
    pub fn open_default() -> Result<Self> {
        let path =
            config::config_path(Self::CREDENTIALS_FILE).context("Could not determine config directory")?;
        Self::open(path)
    }

    /// Open a store at an explicit path
    pub fn open(path: PathBuf) -> Result<Self> {
        let values = if path.exists() {
            config::load_json_file(&path)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    fn flush(&self, values: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write credentials file: {}", self.path.display()))?;
        Ok(())
    }
}

impl SecureStore for FileSecureStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| anyhow::anyhow!("Secure store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| anyhow::anyhow!("Secure store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| anyhow::anyhow!("Secure store lock poisoned"))?;
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

/// In-memory secure store for tests and previews
#[derive(Default)]
pub struct InMemorySecureStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemorySecureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureStore for InMemorySecureStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| anyhow::anyhow!("Secure store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| anyhow::anyhow!("Secure store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| anyhow::anyhow!("Secure store lock poisoned"))?;
        values.remove(key);
        Ok(())
    }
}
