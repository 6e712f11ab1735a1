//! Student entity.
//!
//! # Invariants
//! - A course appears at most once in `enrolled_courses`.
//! - A service name appears at most once in `extra_services`.
//! - Enrollment here is one side only; the course roster is updated by the
//!   enrollment helpers in `service`.

use super::reference::{CourseRef, StudentRef};
use super::{
    push_unique, remove_by_id, require_email, require_non_blank, Entity, EntityId, EntityKind,
    ValidationError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    id: EntityId,
    name: String,
    email: String,
    #[serde(default)]
    enrolled_courses: Vec<CourseRef>,
    #[serde(default)]
    extra_services: Vec<String>,
}

impl Student {
    /// Creates a student with a freshly generated identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(EntityId::generate(), name, email)
    }

    /// Creates a student with a caller-provided identity (import paths).
    pub fn with_id(id: EntityId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            enrolled_courses: Vec::new(),
            extra_services: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn enrolled_courses(&self) -> &[CourseRef] {
        &self.enrolled_courses
    }

    pub fn extra_services(&self) -> &[String] {
        &self.extra_services
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Projection stored by courses that list this student.
    pub fn reference(&self) -> StudentRef {
        StudentRef {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn is_enrolled_in(&self, course_id: &EntityId) -> bool {
        self.enrolled_courses
            .iter()
            .any(|course| &course.id == course_id)
    }

    /// Records enrollment in `course`. Returns `false` if already enrolled.
    pub fn enroll(&mut self, course: CourseRef) -> bool {
        push_unique(&mut self.enrolled_courses, course, |c| &c.id)
    }

    /// Drops enrollment in `course_id`. Returns `false` if not enrolled.
    pub fn unenroll(&mut self, course_id: &EntityId) -> bool {
        remove_by_id(&mut self.enrolled_courses, course_id, |c| &c.id)
    }

    /// Adds an extra service. Returns `false` if it was already present.
    pub fn add_service(&mut self, service: impl Into<String>) -> bool {
        let service = service.into();
        if self.extra_services.contains(&service) {
            return false;
        }
        self.extra_services.push(service);
        true
    }
}

impl Entity for Student {
    const KIND: EntityKind = EntityKind::Student;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(Self::KIND, "name", &self.name)?;
        require_email(Self::KIND, &self.email)?;
        for service in &self.extra_services {
            require_non_blank(Self::KIND, "extra service", service)?;
        }
        Ok(())
    }
}
