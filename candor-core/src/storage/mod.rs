//! Storage collaborator interface
//!
//! Durable persistence lives outside this crate; the core only depends on
//! this narrow trait. `MemoryStore` is the reference implementation used by
//! tests and the dev server.

mod memory;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::model::{InterviewRecord, SkillEntry};

pub use memory::MemoryStore;

/// Interview and skill-profile persistence operations consumed by the core
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Look up an interview record by id
    async fn find_interview(&self, id: &str) -> Result<Option<InterviewRecord>, StorageError>;

    /// Persist the full interview record, replacing any previous version
    async fn save_interview(&self, record: &InterviewRecord) -> Result<(), StorageError>;

    /// Load a user's skill profile
    async fn load_skills(&self, user_id: &str) -> Result<Vec<SkillEntry>, StorageError>;

    /// Replace a user's skill profile
    async fn save_skills(&self, user_id: &str, skills: &[SkillEntry]) -> Result<(), StorageError>;
}
