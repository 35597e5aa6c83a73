//! In-memory store for tests and the dev server

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::model::{InterviewRecord, SkillEntry};

use super::InterviewStore;

/// HashMap-backed `InterviewStore`
///
/// Tracks a save counter and supports injected skill-save failures so tests
/// can assert the best-effort semantics of the completion path.
#[derive(Default)]
pub struct MemoryStore {
    interviews: RwLock<HashMap<String, InterviewRecord>>,
    skills: RwLock<HashMap<String, Vec<SkillEntry>>>,
    saves: AtomicUsize,
    fail_skill_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an interview record
    pub async fn insert_interview(&self, record: InterviewRecord) {
        self.interviews
            .write()
            .await
            .insert(record.id.clone(), record);
    }

    /// Seed a user's skill profile
    pub async fn insert_skills(&self, user_id: &str, skills: Vec<SkillEntry>) {
        self.skills.write().await.insert(user_id.to_string(), skills);
    }

    /// Number of `save_interview` calls so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make subsequent `save_skills` calls fail (for best-effort tests)
    pub fn fail_skill_saves(&self, fail: bool) {
        self.fail_skill_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl InterviewStore for MemoryStore {
    async fn find_interview(&self, id: &str) -> Result<Option<InterviewRecord>, StorageError> {
        Ok(self.interviews.read().await.get(id).cloned())
    }

    async fn save_interview(&self, record: &InterviewRecord) -> Result<(), StorageError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.interviews
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn load_skills(&self, user_id: &str) -> Result<Vec<SkillEntry>, StorageError> {
        Ok(self
            .skills
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_skills(&self, user_id: &str, skills: &[SkillEntry]) -> Result<(), StorageError> {
        if self.fail_skill_saves.load(Ordering::SeqCst) {
            return Err(StorageError::Backend(
                "skill store unavailable".to_string(),
            ));
        }
        self.skills
            .write()
            .await
            .insert(user_id.to_string(), skills.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InterviewConfig;
    use chrono::Utc;

    fn record(id: &str) -> InterviewRecord {
        let config =
            InterviewConfig::new("Backend Developer", "Senior", vec![], "technical", 2).unwrap();
        InterviewRecord::new(id, "user-1", config)
    }

    #[tokio::test]
    async fn find_returns_none_for_unknown_id() {
        let store = MemoryStore::new();
        assert!(store.find_interview("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_find_roundtrips() {
        let store = MemoryStore::new();
        store.save_interview(&record("int-1")).await.unwrap();
        let found = store.find_interview("int-1").await.unwrap().unwrap();
        assert_eq!(found.id, "int-1");
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn skills_default_to_empty() {
        let store = MemoryStore::new();
        assert!(store.load_skills("user-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_skills_replaces_profile() {
        let store = MemoryStore::new();
        let skills = vec![SkillEntry::new("Rust", 7.0, Utc::now())];
        store.save_skills("user-1", &skills).await.unwrap();
        let loaded = store.load_skills("user-1").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Rust");
    }

    #[tokio::test]
    async fn injected_skill_save_failure_surfaces() {
        let store = MemoryStore::new();
        store.fail_skill_saves(true);
        let result = store.save_skills("user-1", &[]).await;
        assert!(matches!(result, Err(StorageError::Backend(_))));
    }
}
