use super::{CourseManager, ManagerResult};
use crate::model::course::Course;
use crate::model::reference::{ResourceRef, StudentRef, TeacherRef};
use crate::model::EntityId;

impl CourseManager {
    pub async fn get_by_teacher(&self, teacher_id: &EntityId) -> ManagerResult<Vec<Course>> {
        Ok(self.repo.find_by_teacher(teacher_id).await?)
    }

    pub async fn get_by_student(&self, student_id: &EntityId) -> ManagerResult<Vec<Course>> {
        Ok(self.repo.find_by_student(student_id).await?)
    }

    pub async fn get_by_subject(&self, subject: &str) -> ManagerResult<Vec<Course>> {
        Ok(self.repo.find_by_subject(subject).await?)
    }

    /// Replaces the course's teacher and returns the previous one.
    pub async fn assign_teacher(
        &self,
        course_id: &EntityId,
        teacher: TeacherRef,
    ) -> ManagerResult<Option<TeacherRef>> {
        self.modify(course_id, |course| {
            let unchanged = course.teacher() == Some(&teacher);
            let previous = course.assign_teacher(teacher);
            Ok((previous, !unchanged))
        })
        .await
    }

    pub async fn add_student(
        &self,
        course_id: &EntityId,
        student: StudentRef,
    ) -> ManagerResult<bool> {
        self.modify(course_id, |course| {
            let added = course.add_student(student);
            Ok((added, added))
        })
        .await
    }

    pub async fn assign_resource(
        &self,
        course_id: &EntityId,
        resource: ResourceRef,
    ) -> ManagerResult<bool> {
        self.modify(course_id, |course| {
            let assigned = course.assign_resource(resource);
            Ok((assigned, assigned))
        })
        .await
    }
}
