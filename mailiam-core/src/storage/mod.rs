//! Persistence for [`Settings`].
//!
//! The core only ever loads and saves the whole record. Hosts that keep
//! settings elsewhere implement [`SettingsStore`] themselves.

use crate::error::StorageError;
use crate::settings::Settings;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

#[async_trait]
pub trait SettingsStore: Send + Sync + 'static {
    async fn load(&self) -> Result<Settings, StorageError>;
    async fn save(&self, settings: &Settings) -> Result<(), StorageError>;
}

/// Keeps settings in process memory. Useful for tests and short-lived hosts.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RwLock<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Settings, StorageError> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        *self.settings.write().await = settings.clone();
        Ok(())
    }
}

/// Stores settings as a JSON document on disk.
///
/// A missing file loads as `defaults`. Saves go through a temporary file in
/// the same directory followed by a rename, so readers never see a partial
/// document. Saves through one store, or any of its clones, run one at a
/// time and the last one wins.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
    defaults: Settings,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileSettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_defaults(path, Settings::default())
    }

    pub fn with_defaults<P: AsRef<Path>>(path: P, defaults: Settings) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            defaults,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "settings.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self) -> Result<Settings, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(self.defaults.clone()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(settings)?;
        let _guard = self.write_lock.lock().await;
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(path = %self.path.display(), "Saved Mailiam settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySettingsStore::default();
        assert_eq!(store.load().await.unwrap(), Settings::default());

        let settings = Settings {
            usage_key: Some("mlm_sk_abc".to_string()),
            ..Default::default()
        };
        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_file_store_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let defaults = Settings {
            domain: "example.com".to_string(),
            ..Default::default()
        };
        let store = JsonFileSettingsStore::with_defaults(dir.path().join("mailiam.json"), defaults);

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.domain, "example.com");
    }

    #[tokio::test]
    async fn test_file_store_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mailiam.json");
        let store = JsonFileSettingsStore::new(&path);

        let settings = Settings {
            domain: "example.com".to_string(),
            public_key: Some("mlm_pk_abc".to_string()),
            email_override_enabled: true,
            ..Default::default()
        };
        store.save(&settings).await.unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("nested").join("mailiam.json.tmp").exists());
        assert_eq!(JsonFileSettingsStore::new(&path).load().await.unwrap(), settings);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_file_store_concurrent_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailiam.json");
        let store = Arc::new(JsonFileSettingsStore::new(&path));

        let mut handles = Vec::new();
        for i in 0..100 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let settings = Settings {
                    domain: format!("site{i}.example.com"),
                    ..Default::default()
                };
                store.save(&settings).await
            }));
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let loaded = store.load().await.unwrap();
        assert!(loaded.domain.starts_with("site"));
        assert!(!dir.path().join("mailiam.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_partial_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailiam.json");
        std::fs::write(&path, r#"{"public_key":"mlm_pk_abc"}"#).unwrap();

        let loaded = JsonFileSettingsStore::new(&path).load().await.unwrap();
        assert_eq!(loaded.public_key(), Some("mlm_pk_abc"));
        assert_eq!(loaded.success_message, crate::settings::DEFAULT_SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn test_file_store_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mailiam.json");
        std::fs::write(&path, "not json").unwrap();

        let result = JsonFileSettingsStore::new(&path).load().await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
