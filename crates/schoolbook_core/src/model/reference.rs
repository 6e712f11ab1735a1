//! Projections used when one entity references another.
//!
//! Each projection carries the referenced identity plus a few display fields.
//! They are what gets stored inside a document in place of the related entity.

use super::EntityId;
use serde::{Deserialize, Serialize};

/// `{id, title, subject}` projection of a `Course`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    pub id: EntityId,
    pub title: String,
    pub subject: String,
}

/// `{id, name, email}` projection of a `Student`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRef {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

/// `{id, name, email}` projection of a `Teacher`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRef {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

/// `{id, name, type}` projection of a `Resource`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}
