use super::{ManagerResult, StudentManager};
use crate::model::reference::CourseRef;
use crate::model::student::Student;
use crate::model::EntityId;

impl StudentManager {
    /// Passes through to the repository; the cache is not consulted.
    pub async fn get_by_email(&self, email: &str) -> ManagerResult<Option<Student>> {
        Ok(self.repo.find_by_email(email).await?)
    }

    pub async fn get_by_course(&self, course_id: &EntityId) -> ManagerResult<Vec<Student>> {
        Ok(self.repo.find_by_course(course_id).await?)
    }

    /// Adds an extra service and persists the student.
    ///
    /// Returns `false` when the service was already present.
    pub async fn add_service(
        &self,
        student_id: &EntityId,
        service: impl Into<String>,
    ) -> ManagerResult<bool> {
        let service = service.into();
        self.modify(student_id, |student| {
            let added = student.add_service(service);
            Ok((added, added))
        })
        .await
    }

    /// Records enrollment on the student side only.
    ///
    /// The course roster is left untouched; see
    /// `School::enroll_student_in_course` for the two-sided operation.
    pub async fn enroll_in_course(
        &self,
        student_id: &EntityId,
        course: CourseRef,
    ) -> ManagerResult<bool> {
        self.modify(student_id, |student| {
            let enrolled = student.enroll(course);
            Ok((enrolled, enrolled))
        })
        .await
    }
}
