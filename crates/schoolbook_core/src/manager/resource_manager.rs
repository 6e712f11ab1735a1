use super::{ManagerResult, ResourceManager};
use crate::model::reference::CourseRef;
use crate::model::resource::Resource;
use crate::model::EntityId;

impl ResourceManager {
    pub async fn get_by_course(&self, course_id: &EntityId) -> ManagerResult<Vec<Resource>> {
        Ok(self.repo.find_by_course(course_id).await?)
    }

    /// Marks the resource unavailable and persists it.
    ///
    /// Fails with `InvalidStateTransition` before any write when the
    /// resource is already taken.
    pub async fn allocate(&self, resource_id: &EntityId) -> ManagerResult<()> {
        self.modify(resource_id, |resource| {
            resource.allocate()?;
            Ok(((), true))
        })
        .await
    }

    /// Marks the resource available again. Never fails for an existing id.
    pub async fn release(&self, resource_id: &EntityId) -> ManagerResult<()> {
        self.modify(resource_id, |resource| {
            let was_taken = !resource.is_available();
            resource.release();
            Ok(((), was_taken))
        })
        .await
    }

    pub async fn add_course(
        &self,
        resource_id: &EntityId,
        course: CourseRef,
    ) -> ManagerResult<bool> {
        self.modify(resource_id, |resource| {
            let added = resource.add_course(course);
            Ok((added, added))
        })
        .await
    }
}
