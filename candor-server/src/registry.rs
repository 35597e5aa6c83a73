//! Active-session registry
//!
//! One live session per user at a time. The registry is owned by the
//! gateway state and passed in explicitly; registration returns an RAII
//! guard so a slot can never outlive its connection, whichever way the
//! connection ends.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::warn;
use uuid::Uuid;

/// Maps user id to the connection currently holding that user's slot
#[derive(Default)]
pub struct SessionRegistry {
    active: Arc<Mutex<HashMap<String, Uuid>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for a user; None if another connection holds it
    pub fn register(&self, user_id: &str) -> Option<RegistryGuard> {
        let mut active = self.active.lock().expect("session registry poisoned");
        if active.contains_key(user_id) {
            warn!(user_id, "rejected concurrent session for user");
            return None;
        }
        let connection_id = Uuid::new_v4();
        active.insert(user_id.to_string(), connection_id);
        Some(RegistryGuard {
            active: Arc::clone(&self.active),
            user_id: user_id.to_string(),
            connection_id,
        })
    }

    /// Number of live sessions (diagnostics)
    pub fn len(&self) -> usize {
        self.active.lock().expect("session registry poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases the user's slot on drop
///
/// Removal checks the connection id, so a stale guard from a previous
/// connection can never evict a newer session for the same user.
pub struct RegistryGuard {
    active: Arc<Mutex<HashMap<String, Uuid>>>,
    user_id: String,
    connection_id: Uuid,
}

impl Drop for RegistryGuard {
    fn drop(&mut self) {
        let mut active = self.active.lock().expect("session registry poisoned");
        if active.get(&self.user_id) == Some(&self.connection_id) {
            active.remove(&self.user_id);
        }
    }
}
