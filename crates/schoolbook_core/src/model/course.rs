//! Course entity.
//!
//! # Invariants
//! - At most one teacher; assigning a teacher replaces the previous one.
//! - A student or resource appears at most once in its list.

use super::reference::{CourseRef, ResourceRef, StudentRef, TeacherRef};
use super::{
    push_unique, remove_by_id, require_non_blank, Entity, EntityId, EntityKind, ValidationError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: EntityId,
    title: String,
    subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    teacher: Option<TeacherRef>,
    #[serde(default)]
    students: Vec<StudentRef>,
    #[serde(default)]
    resources: Vec<ResourceRef>,
}

impl Course {
    pub fn new(title: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::with_id(EntityId::generate(), title, subject)
    }

    pub fn with_id(id: EntityId, title: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            subject: subject.into(),
            teacher: None,
            students: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn teacher(&self) -> Option<&TeacherRef> {
        self.teacher.as_ref()
    }

    pub fn students(&self) -> &[StudentRef] {
        &self.students
    }

    pub fn resources(&self) -> &[ResourceRef] {
        &self.resources
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn reference(&self) -> CourseRef {
        CourseRef {
            id: self.id.clone(),
            title: self.title.clone(),
            subject: self.subject.clone(),
        }
    }

    /// Sets the teacher, returning the one it replaced.
    pub fn assign_teacher(&mut self, teacher: TeacherRef) -> Option<TeacherRef> {
        self.teacher.replace(teacher)
    }

    pub fn clear_teacher(&mut self) -> Option<TeacherRef> {
        self.teacher.take()
    }

    pub fn has_student(&self, student_id: &EntityId) -> bool {
        self.students.iter().any(|student| &student.id == student_id)
    }

    pub fn add_student(&mut self, student: StudentRef) -> bool {
        push_unique(&mut self.students, student, |s| &s.id)
    }

    pub fn remove_student(&mut self, student_id: &EntityId) -> bool {
        remove_by_id(&mut self.students, student_id, |s| &s.id)
    }

    pub fn assign_resource(&mut self, resource: ResourceRef) -> bool {
        push_unique(&mut self.resources, resource, |r| &r.id)
    }
}

impl Entity for Course {
    const KIND: EntityKind = EntityKind::Course;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(Self::KIND, "title", &self.title)?;
        require_non_blank(Self::KIND, "subject", &self.subject)
    }
}
