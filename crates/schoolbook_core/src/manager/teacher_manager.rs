use super::{ManagerResult, TeacherManager};
use crate::model::reference::CourseRef;
use crate::model::teacher::Teacher;
use crate::model::EntityId;

impl TeacherManager {
    pub async fn get_by_email(&self, email: &str) -> ManagerResult<Option<Teacher>> {
        Ok(self.repo.find_by_email(email).await?)
    }

    pub async fn get_by_course(&self, course_id: &EntityId) -> ManagerResult<Vec<Teacher>> {
        Ok(self.repo.find_by_course(course_id).await?)
    }

    /// Adds `course` to the teacher's list and persists the teacher only.
    pub async fn assign_course(
        &self,
        teacher_id: &EntityId,
        course: CourseRef,
    ) -> ManagerResult<bool> {
        self.modify(teacher_id, |teacher| {
            let assigned = teacher.assign_course(course);
            Ok((assigned, assigned))
        })
        .await
    }

    pub async fn remove_course(
        &self,
        teacher_id: &EntityId,
        course_id: &EntityId,
    ) -> ManagerResult<bool> {
        self.modify(teacher_id, |teacher| {
            let removed = teacher.remove_course(course_id);
            Ok((removed, removed))
        })
        .await
    }
}
