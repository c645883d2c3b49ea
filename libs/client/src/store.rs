//! Persisted client session state
//!
//! Holds the current user and access token in memory and mirrors them to a
//! storage backend under the `vehicle-tracker-auth` key, so a restarted
//! process comes back in the same state. Persistence failures are logged and
//! swallowed; the in-memory state stays authoritative for the session.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::User;

/// Storage key for the persisted session
pub const STORAGE_KEY: &str = "vehicle-tracker-auth";

/// Session snapshot as persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: Option<User>,
    pub access_token: Option<String>,
    pub is_authenticated: bool,
}

/// Storage backend for the persisted session
pub trait SessionStorage: Send + Sync {
    fn load(&self, key: &str) -> io::Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> io::Result<()>;
    fn clear(&self, key: &str) -> io::Result<()>;
}

/// File-backed storage: one JSON file per key inside a directory
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStorage for FileStorage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)
    }

    fn clear(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-memory storage for embedding and tests
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Client session store: in-memory state mirrored to a storage backend
pub struct SessionStore {
    session: RwLock<AuthSession>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Create a store, restoring any persisted session
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let session = Self::load_persisted(storage.as_ref());
        Self {
            session: RwLock::new(session),
            storage,
        }
    }

    /// Current session snapshot
    pub fn session(&self) -> AuthSession {
        self.read().clone()
    }

    /// Current access token, if any
    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    /// Store a full authentication result
    pub fn set_auth(&self, user: User, access_token: String) {
        let session = AuthSession {
            user: Some(user),
            access_token: Some(access_token),
            is_authenticated: true,
        };
        *self.write() = session.clone();
        self.persist(&session);
    }

    /// Replace only the access token (silent refresh)
    pub fn set_access_token(&self, access_token: String) {
        let mut guard = self.write();
        guard.access_token = Some(access_token);
        let session = guard.clone();
        drop(guard);
        self.persist(&session);
    }

    /// Replace only the user projection
    pub fn set_user(&self, user: User) {
        let mut guard = self.write();
        guard.user = Some(user);
        let session = guard.clone();
        drop(guard);
        self.persist(&session);
    }

    /// Clear the session and its persisted copy
    pub fn logout(&self) {
        *self.write() = AuthSession::default();
        if let Err(e) = self.storage.clear(STORAGE_KEY) {
            warn!("Failed to clear persisted session: {}", e);
        }
    }

    /// Whether a persisted copy currently exists
    pub fn persisted_present(&self) -> bool {
        matches!(self.storage.load(STORAGE_KEY), Ok(Some(_)))
    }

    /// Re-read the persisted copy into memory; used when another process
    /// changes it. A cleared key converges to logged-out.
    pub fn resync(&self) {
        *self.write() = Self::load_persisted(self.storage.as_ref());
    }

    fn load_persisted(storage: &dyn SessionStorage) -> AuthSession {
        match storage.load(STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Discarding unreadable persisted session: {}", e);
                AuthSession::default()
            }),
            Ok(None) => AuthSession::default(),
            Err(e) => {
                warn!("Failed to restore session: {}", e);
                AuthSession::default()
            }
        }
    }

    fn persist(&self, session: &AuthSession) {
        let raw = match serde_json::to_string(session) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode session: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.save(STORAGE_KEY, &raw) {
            warn!("Failed to persist session: {}", e);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthSession> {
        self.session.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthSession> {
        self.session.write().unwrap_or_else(|e| e.into_inner())
    }
}
