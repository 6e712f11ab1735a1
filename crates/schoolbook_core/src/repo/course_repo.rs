//! Course repository contract.

use super::{DocumentRepository, RepoResult, Repository};
use crate::model::course::Course;
use crate::model::EntityId;
use async_trait::async_trait;

/// Persistence contract for courses.
#[async_trait]
pub trait CourseRepository: Repository<Course> {
    /// Courses taught by `teacher_id`, via the `teacher.id` index.
    async fn find_by_teacher(&self, teacher_id: &EntityId) -> RepoResult<Vec<Course>>;
    /// Courses whose roster lists `student_id`.
    async fn find_by_student(&self, student_id: &EntityId) -> RepoResult<Vec<Course>>;
    /// Courses with exactly this subject, via the `subject` index.
    async fn find_by_subject(&self, subject: &str) -> RepoResult<Vec<Course>>;
}

#[async_trait]
impl CourseRepository for DocumentRepository<Course> {
    async fn find_by_teacher(&self, teacher_id: &EntityId) -> RepoResult<Vec<Course>> {
        self.find_many_by_index("teacher.id", teacher_id.as_str()).await
    }

    async fn find_by_student(&self, student_id: &EntityId) -> RepoResult<Vec<Course>> {
        self.find_where(|course| course.has_student(student_id)).await
    }

    async fn find_by_subject(&self, subject: &str) -> RepoResult<Vec<Course>> {
        self.find_many_by_index("subject", subject).await
    }
}
