//! Resource entity (rooms, equipment, ...).
//!
//! # Invariants
//! - `allocate` fails when the resource is already unavailable.
//! - `release` always succeeds.
//! - A course appears at most once in `courses`.

use super::reference::{CourseRef, ResourceRef};
use super::{
    push_unique, require_non_blank, Entity, EntityId, EntityKind, InvalidStateTransition,
    ValidationError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    id: EntityId,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default = "available_by_default")]
    available: bool,
    #[serde(default)]
    courses: Vec<CourseRef>,
}

fn available_by_default() -> bool {
    true
}

impl Resource {
    /// Creates an available resource with a fresh identity.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::with_availability(name, kind, true)
    }

    pub fn with_availability(
        name: impl Into<String>,
        kind: impl Into<String>,
        available: bool,
    ) -> Self {
        Self::with_id(EntityId::generate(), name, kind, available)
    }

    pub fn with_id(
        id: EntityId,
        name: impl Into<String>,
        kind: impl Into<String>,
        available: bool,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            available,
            courses: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resource type, stored as `type` in documents.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn courses(&self) -> &[CourseRef] {
        &self.courses
    }

    pub fn reference(&self) -> ResourceRef {
        ResourceRef {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind.clone(),
        }
    }

    pub fn is_assigned_to(&self, course_id: &EntityId) -> bool {
        self.courses.iter().any(|course| &course.id == course_id)
    }

    /// Marks the resource as taken.
    pub fn allocate(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.available {
            return Err(InvalidStateTransition {
                kind: Self::KIND,
                id: self.id.clone(),
                action: "allocate",
                reason: "resource is not available",
            });
        }
        self.available = false;
        Ok(())
    }

    pub fn release(&mut self) {
        self.available = true;
    }

    pub fn add_course(&mut self, course: CourseRef) -> bool {
        push_unique(&mut self.courses, course, |c| &c.id)
    }
}

impl Entity for Resource {
    const KIND: EntityKind = EntityKind::Resource;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(Self::KIND, "name", &self.name)?;
        require_non_blank(Self::KIND, "type", &self.kind)
    }
}
