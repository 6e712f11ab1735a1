use super::{CommitLog, School};
use crate::manager::ManagerResult;
use crate::model::{EntityId, EntityKind};
use log::info;

impl School {
    /// Allocates a resource and links it with a course on both sides.
    ///
    /// Fails with `InvalidStateTransition` before any write when the resource
    /// is already allocated. Commit order: resource, then course.
    pub async fn allocate_resource_to_course(
        &self,
        resource_id: &EntityId,
        course_id: &EntityId,
    ) -> ManagerResult<()> {
        let mut resource = self.resources.require(resource_id).await?;
        let mut course = self.courses.require(course_id).await?;

        resource.allocate()?;
        resource.add_course(course.reference());
        let course_changed = course.assign_resource(resource.reference());

        let mut log = CommitLog::new("allocate_resource_to_course");
        log.write(EntityKind::Resource, resource_id, self.resources.update(&resource))
            .await?;
        if course_changed {
            log.write(EntityKind::Course, course_id, self.courses.update(&course))
                .await?;
        }

        info!(
            "event=allocate module=service status=ok resource_id={} course_id={} writes={}",
            resource_id,
            course_id,
            log.len()
        );
        Ok(())
    }

    /// Makes a resource available again. Course links are kept.
    pub async fn release_resource(&self, resource_id: &EntityId) -> ManagerResult<()> {
        self.resources.release(resource_id).await?;
        info!(
            "event=release module=service status=ok resource_id={}",
            resource_id
        );
        Ok(())
    }
}
