//! Student repository contract.

use super::{DocumentRepository, RepoResult, Repository};
use crate::model::student::Student;
use crate::model::EntityId;
use async_trait::async_trait;

/// Persistence contract for students.
#[async_trait]
pub trait StudentRepository: Repository<Student> {
    /// Point lookup on the unique `email` index.
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Student>>;
    /// Students whose enrollment list references `course_id`.
    async fn find_by_course(&self, course_id: &EntityId) -> RepoResult<Vec<Student>>;
}

#[async_trait]
impl StudentRepository for DocumentRepository<Student> {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Student>> {
        self.find_one_by_index("email", email).await
    }

    async fn find_by_course(&self, course_id: &EntityId) -> RepoResult<Vec<Student>> {
        self.find_where(|student| student.is_enrolled_in(course_id)).await
    }
}
