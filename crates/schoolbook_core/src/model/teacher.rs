//! Teacher entity.

use super::reference::{CourseRef, TeacherRef};
use super::{
    push_unique, remove_by_id, require_email, require_non_blank, Entity, EntityId, EntityKind,
    ValidationError,
};
use serde::{Deserialize, Serialize};

/// A teacher and the courses assigned to them.
///
/// A course appears at most once in `courses`. The single-teacher rule on the
/// course side is kept by `School::assign_teacher_to_course`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    id: EntityId,
    name: String,
    email: String,
    #[serde(default)]
    courses: Vec<CourseRef>,
}

impl Teacher {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(EntityId::generate(), name, email)
    }

    pub fn with_id(id: EntityId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            courses: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn courses(&self) -> &[CourseRef] {
        &self.courses
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn reference(&self) -> TeacherRef {
        TeacherRef {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn teaches(&self, course_id: &EntityId) -> bool {
        self.courses.iter().any(|course| &course.id == course_id)
    }

    /// Returns `false` if the course was already assigned.
    pub fn assign_course(&mut self, course: CourseRef) -> bool {
        push_unique(&mut self.courses, course, |c| &c.id)
    }

    pub fn remove_course(&mut self, course_id: &EntityId) -> bool {
        remove_by_id(&mut self.courses, course_id, |c| &c.id)
    }
}

impl Entity for Teacher {
    const KIND: EntityKind = EntityKind::Teacher;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(Self::KIND, "name", &self.name)?;
        require_email(Self::KIND, &self.email)
    }
}
