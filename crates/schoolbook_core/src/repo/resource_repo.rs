//! Resource repository contract.

use super::{DocumentRepository, RepoResult, Repository};
use crate::model::resource::Resource;
use crate::model::EntityId;
use async_trait::async_trait;

/// Persistence contract for resources.
#[async_trait]
pub trait ResourceRepository: Repository<Resource> {
    /// Resources assigned to `course_id`.
    async fn find_by_course(&self, course_id: &EntityId) -> RepoResult<Vec<Resource>>;
}

#[async_trait]
impl ResourceRepository for DocumentRepository<Resource> {
    async fn find_by_course(&self, course_id: &EntityId) -> RepoResult<Vec<Resource>> {
        self.find_where(|resource| resource.is_assigned_to(course_id)).await
    }
}
