//! Teacher repository contract.

use super::{DocumentRepository, RepoResult, Repository};
use crate::model::teacher::Teacher;
use crate::model::EntityId;
use async_trait::async_trait;

/// Persistence contract for teachers.
#[async_trait]
pub trait TeacherRepository: Repository<Teacher> {
    /// Point lookup on the unique `email` index.
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Teacher>>;
    /// Teachers whose course list references `course_id`.
    ///
    /// Normally at most one, but an interrupted reassignment can leave two.
    async fn find_by_course(&self, course_id: &EntityId) -> RepoResult<Vec<Teacher>>;
}

#[async_trait]
impl TeacherRepository for DocumentRepository<Teacher> {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Teacher>> {
        self.find_one_by_index("email", email).await
    }

    async fn find_by_course(&self, course_id: &EntityId) -> RepoResult<Vec<Teacher>> {
        self.find_where(|teacher| teacher.teaches(course_id)).await
    }
}
