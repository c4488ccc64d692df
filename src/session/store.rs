//! Session token persistence
//!
//! A [`SessionStore`] keeps at most one [`Session`] between invocations.
//! Three backends are provided:
//!
//! - [`KeyringSessionStore`] -- the OS native credential store (Keychain on
//!   macOS, Secret Service on Linux, Windows Credential Manager on Windows)
//! - [`FileSessionStore`] -- a JSON file, by default under the platform
//!   config directory
//! - [`MemorySessionStore`] -- process memory, used by tests and the
//!   `memory` backend
//!
//! Sessions are serialized to JSON before storage in every backend.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use directories::ProjectDirs;
use tokio::sync::Mutex;

use crate::config::{SessionBackend, SessionConfig};
use crate::error::{LinkrecError, Result};
use crate::session::Session;

/// Storage for the single active session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist `session`, replacing any previous one.
    async fn save(&self, session: &Session) -> Result<()>;

    /// Load the stored session; `Ok(None)` when nobody is logged in.
    async fn load(&self) -> Result<Option<Session>>;

    /// Remove the stored session. A no-op when none exists.
    async fn clear(&self) -> Result<()>;
}

/// Build the store selected by configuration.
///
/// # Errors
///
/// Returns [`LinkrecError::Config`] when the `file` backend has no explicit
/// path and no platform config directory can be determined.
pub fn store_for(config: &SessionConfig) -> Result<Arc<dyn SessionStore>> {
    Ok(match config.backend {
        SessionBackend::Keyring => Arc::new(KeyringSessionStore::default()),
        SessionBackend::File => {
            let path = match &config.file_path {
                Some(path) => path.clone(),
                None => FileSessionStore::default_path()?,
            };
            Arc::new(FileSessionStore::new(path))
        }
        SessionBackend::Memory => Arc::new(MemorySessionStore::default()),
    })
}

// ---------------------------------------------------------------------------
// Keyring
// ---------------------------------------------------------------------------

const KEYRING_SERVICE: &str = "linkrec-session";

/// Stateless accessor for the OS keyring.
///
/// The session lives under the `linkrec-session` service with the
/// configured account name (`default` unless overridden).
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    account: String,
}

impl Default for KeyringSessionStore {
    fn default() -> Self {
        Self {
            account: "default".to_string(),
        }
    }
}

impl KeyringSessionStore {
    /// Store under a specific account name.
    pub fn with_account(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(KEYRING_SERVICE, &self.account)
            .map_err(|e| LinkrecError::Keyring(e).into())
    }
}

#[async_trait]
impl SessionStore for KeyringSessionStore {
    async fn save(&self, session: &Session) -> Result<()> {
        let json_str = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&json_str)
            .map_err(LinkrecError::Keyring)?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>> {
        match self.entry()?.get_password() {
            Ok(json_str) => Ok(Some(serde_json::from_str(&json_str)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(LinkrecError::Keyring(e).into()),
        }
    }

    async fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(LinkrecError::Keyring(e).into()),
        }
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// JSON file holding the session.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store the session at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/linkrec/session.json` for the current platform.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "linkrec", "linkrec").ok_or_else(|| {
            LinkrecError::Config("Could not determine a config directory".to_string())
        })?;
        Ok(dirs.config_dir().join("session.json"))
    }

    /// Location of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json_str = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.path, json_str).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await?;
        }

        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LinkrecError::Io(e).into()),
        }
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LinkrecError::Io(e).into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// Session held in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<Option<Session>>>,
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn save(&self, session: &Session) -> Result<()> {
        *self.inner.lock().await = Some(session.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Session>> {
        Ok(self.inner.lock().await.clone())
    }

    async fn clear(&self) -> Result<()> {
        *self.inner.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::default();
        assert!(store.load().await.unwrap().is_none());

        store.save(&Session::new("tok", None)).await.unwrap();
        assert_eq!(store.load().await.unwrap().unwrap().token, "tok");

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_state() {
        let store = MemorySessionStore::default();
        let clone = store.clone();
        store.save(&Session::new("shared", None)).await.unwrap();
        assert!(clone.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_file_store_roundtrip_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileSessionStore::new(&path);

        let session = Session::new("file-token", Some("ada@example.com".to_string()));
        store.save(&session).await.unwrap();
        assert!(path.exists());

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.token, "file-token");
        assert_eq!(loaded.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_none_and_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("absent.json"));
        assert!(store.load().await.unwrap().is_none());
        store.clear().await.unwrap();
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileSessionStore::new(path).load().await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        FileSessionStore::new(&path)
            .save(&Session::new("t", None))
            .await
            .unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_store_for_file_backend_uses_explicit_path() {
        let config = SessionConfig {
            backend: SessionBackend::File,
            file_path: Some(PathBuf::from("/tmp/x.json")),
            ..Default::default()
        };
        assert!(store_for(&config).is_ok());
    }

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_keyring_store_roundtrip() {
        let store = KeyringSessionStore::with_account("linkrec_test_account");
        store.save(&Session::new("kr", None)).await.expect("save");
        let loaded = store.load().await.expect("load").expect("present");
        assert_eq!(loaded.token, "kr");
        store.clear().await.expect("clear");
        assert!(store.load().await.expect("load after clear").is_none());
    }
}
