use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use disasterhub_types::models::{EmergencyAlert, RememberedUser, StoredUser};

use crate::store::KeyValueStore;

pub const CURRENT_USER_KEY: &str = "currentUser";
pub const USERS_KEY: &str = "users";
pub const REMEMBERED_USER_KEY: &str = "rememberedUser";
pub const PENDING_EMERGENCIES_KEY: &str = "pendingEmergencies";

/// `add_user` found the email already registered.
#[derive(Debug, Error)]
#[error("Email already registered: {0}")]
pub struct DuplicateEmail(pub String);

/// Typed access to the dashboard's persisted client state.
///
/// Values are stored as JSON under fixed keys. Read-modify-write sequences
/// (account list, retry queue) are serialized by an internal lock.
pub struct LocalState {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl LocalState {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    // -- Session --

    pub fn current_user(&self) -> Result<Option<StoredUser>> {
        self.read_json(CURRENT_USER_KEY)
    }

    pub fn set_current_user(&self, user: &StoredUser) -> Result<()> {
        self.write_json(CURRENT_USER_KEY, user)
    }

    pub fn clear_current_user(&self) -> Result<()> {
        self.store.remove(CURRENT_USER_KEY)
    }

    pub fn remembered_user(&self) -> Result<Option<RememberedUser>> {
        self.read_json(REMEMBERED_USER_KEY)
    }

    pub fn set_remembered_user(&self, remembered: &RememberedUser) -> Result<()> {
        self.write_json(REMEMBERED_USER_KEY, remembered)
    }

    pub fn clear_remembered_user(&self) -> Result<()> {
        self.store.remove(REMEMBERED_USER_KEY)
    }

    // -- Accounts --

    pub fn users(&self) -> Result<Vec<StoredUser>> {
        Ok(self.read_json(USERS_KEY)?.unwrap_or_default())
    }

    /// Appends an account. Fails if the email is already registered.
    pub fn add_user(&self, user: &StoredUser) -> Result<()> {
        let _guard = self.lock()?;
        let mut users = self.users()?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(DuplicateEmail(user.email.clone()).into());
        }
        users.push(user.clone());
        self.write_json(USERS_KEY, &users)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        Ok(self.users()?.into_iter().find(|u| u.email == email))
    }

    // -- Retry queue --

    pub fn pending_emergencies(&self) -> Result<Vec<EmergencyAlert>> {
        Ok(self.read_json(PENDING_EMERGENCIES_KEY)?.unwrap_or_default())
    }

    /// Append-only; duplicates are kept.
    pub fn push_pending(&self, alert: &EmergencyAlert) -> Result<()> {
        let _guard = self.lock()?;
        let mut pending = self.pending_emergencies()?;
        pending.push(alert.clone());
        self.write_json(PENDING_EMERGENCIES_KEY, &pending)
    }

    /// Drops one queued copy of each alert in `sent`. Alerts queued since
    /// the caller read the queue are left in place.
    pub fn remove_pending(&self, sent: &[EmergencyAlert]) -> Result<()> {
        if sent.is_empty() {
            return Ok(());
        }

        let _guard = self.lock()?;
        let mut pending = self.pending_emergencies()?;
        for alert in sent {
            if let Some(pos) = pending.iter().position(|p| p == alert) {
                pending.remove(pos);
            }
        }

        if pending.is_empty() {
            self.store.remove(PENDING_EMERGENCIES_KEY)
        } else {
            self.write_json(PENDING_EMERGENCIES_KEY, &pending)
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| anyhow!("State lock poisoned: {}", e))
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use crate::store::MemoryStore;
    use disasterhub_types::geo::{Coordinates, GeoPoint};
    use disasterhub_types::models::{Priority, Role};

    fn user(email: &str) -> StoredUser {
        StoredUser {
            id: format!("id-{}", email),
            email: email.into(),
            username: "tester".into(),
            password_hash: "hash".into(),
            role: Role::User,
            created_at: chrono::Utc::now(),
        }
    }

    fn alert(kind: &str) -> EmergencyAlert {
        EmergencyAlert {
            disaster_type: kind.into(),
            location: GeoPoint::from(Coordinates { lat: 1.0, lng: 2.0 }),
            priority: Priority::High,
        }
    }

    #[test]
    fn emails_are_unique() {
        let state = LocalState::new(Arc::new(MemoryStore::new()));
        state.add_user(&user("a@example.com")).unwrap();
        let err = state.add_user(&user("a@example.com")).unwrap_err();
        assert!(err.is::<DuplicateEmail>());
        state.add_user(&user("b@example.com")).unwrap();
        assert_eq!(state.users().unwrap().len(), 2);
        assert!(state.find_user_by_email("b@example.com").unwrap().is_some());
    }

    #[test]
    fn retry_queue_keeps_duplicates_and_removes_sent() {
        let state = LocalState::new(Arc::new(Database::open_in_memory().unwrap()));
        state.push_pending(&alert("flood")).unwrap();
        state.push_pending(&alert("flood")).unwrap();
        state.push_pending(&alert("fire")).unwrap();
        assert_eq!(state.pending_emergencies().unwrap().len(), 3);

        state.remove_pending(&[alert("flood")]).unwrap();
        assert_eq!(
            state.pending_emergencies().unwrap(),
            vec![alert("flood"), alert("fire")]
        );

        // not queued: ignored
        state.remove_pending(&[alert("storm")]).unwrap();
        assert_eq!(state.pending_emergencies().unwrap().len(), 2);

        state.remove_pending(&[alert("fire"), alert("flood")]).unwrap();
        assert!(state.pending_emergencies().unwrap().is_empty());
    }

    #[test]
    fn session_keys_roundtrip_through_store() {
        let store = Arc::new(MemoryStore::new());
        let state = LocalState::new(store.clone());
        state.set_current_user(&user("c@example.com")).unwrap();
        state
            .set_remembered_user(&RememberedUser {
                email: "c@example.com".into(),
                role: Role::User,
            })
            .unwrap();

        // stored as JSON under the well-known keys
        let raw = store.get(CURRENT_USER_KEY).unwrap().unwrap();
        assert!(raw.contains("\"email\":\"c@example.com\""));

        state.clear_current_user().unwrap();
        assert!(state.current_user().unwrap().is_none());
        assert!(state.remembered_user().unwrap().is_some());
    }
}
