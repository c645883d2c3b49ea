//! Cross-process logout propagation
//!
//! Watches the persisted session key; when another process clears it (a
//! logout elsewhere), the in-memory session converges to logged-out and a
//! reload callback fires so the embedder can refresh its whole view.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::store::SessionStore;

/// Watches the persisted session for an external clear
pub struct SessionWatcher {
    handle: JoinHandle<()>,
}

impl SessionWatcher {
    /// Spawn the watcher. `on_cleared` runs after the store has been
    /// resynced to the (now logged-out) persisted state.
    pub fn spawn<F>(store: Arc<SessionStore>, poll_interval: Duration, on_cleared: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            let mut was_present = store.persisted_present();

            loop {
                interval.tick().await;
                let present = store.persisted_present();
                if was_present && !present {
                    info!("Persisted session cleared externally, logging out");
                    store.resync();
                    on_cleared();
                }
                was_present = present;
            }
        });

        Self { handle }
    }

    /// Stop watching
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for SessionWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use crate::store::{MemoryStorage, STORAGE_KEY, SessionStorage};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
            name: None,
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_external_clear_triggers_logout_and_callback() {
        let storage = Arc::new(MemoryStorage::default());
        let store = Arc::new(SessionStore::new(storage.clone()));
        store.set_auth(test_user(), "token-1".to_string());

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        let watcher = SessionWatcher::spawn(store.clone(), Duration::from_millis(10), move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        // Another process logs out by clearing the persisted key
        storage.clear(STORAGE_KEY).unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!store.is_authenticated());

        watcher.stop();
    }

    #[tokio::test]
    async fn test_no_callback_without_external_clear() {
        let storage = Arc::new(MemoryStorage::default());
        let store = Arc::new(SessionStore::new(storage));
        store.set_auth(test_user(), "token-1".to_string());

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        let _watcher = SessionWatcher::spawn(store.clone(), Duration::from_millis(10), move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(store.is_authenticated());
    }
}
