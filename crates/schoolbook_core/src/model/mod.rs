//! School entity model.
//!
//! # Responsibility
//! - Define the four entity kinds and the projections they use to reference
//!   each other.
//! - Own the flat document contract (`serialize` / `deserialize`).
//!
//! # Invariants
//! - Every entity is identified by an `EntityId` assigned at construction.
//! - Relationships are identity references carrying a small projection, never
//!   embedded entities, so documents are cycle-free by construction.
//! - Deserialized references are stubs; they are never resolved against a
//!   manager at decode time.

pub mod course;
pub mod reference;
pub mod resource;
pub mod student;
pub mod teacher;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Opaque, globally unique identity shared by every entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generates a fresh random identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The four persisted entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Student,
    Teacher,
    Course,
    Resource,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Course => "course",
            Self::Resource => "resource",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{kind} {field} must not be blank")]
    BlankField {
        kind: EntityKind,
        field: &'static str,
    },
    #[error("{kind} email `{email}` is not a valid address")]
    InvalidEmail { kind: EntityKind, email: String },
}

/// A state-machine move the entity refuses to make.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} {kind} {id}: {reason}")]
pub struct InvalidStateTransition {
    pub kind: EntityKind,
    pub id: EntityId,
    pub action: &'static str,
    pub reason: &'static str,
}

/// Contract shared by every persisted entity kind.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &EntityId;

    /// Checks field invariants that must hold before any write.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Flattens an entity into its storage document.
pub fn serialize<E: Entity>(entity: &E) -> serde_json::Result<Value> {
    serde_json::to_value(entity)
}

/// Rebuilds an entity from its storage document.
///
/// Relationship projections come back as reference stubs.
pub fn deserialize<E: Entity>(document: Value) -> serde_json::Result<E> {
    serde_json::from_value(document)
}

pub(crate) fn require_non_blank(
    kind: EntityKind,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { kind, field });
    }
    Ok(())
}

pub(crate) fn require_email(kind: EntityKind, email: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail {
            kind,
            email: email.to_string(),
        });
    }
    Ok(())
}

/// Inserts `item` unless an element with the same identity already exists.
///
/// Returns whether the list changed.
pub(crate) fn push_unique<T>(
    items: &mut Vec<T>,
    item: T,
    id_of: impl Fn(&T) -> &EntityId,
) -> bool {
    if items.iter().any(|existing| id_of(existing) == id_of(&item)) {
        return false;
    }
    items.push(item);
    true
}

/// Removes the element with identity `id`. Returns whether the list changed.
pub(crate) fn remove_by_id<T>(
    items: &mut Vec<T>,
    id: &EntityId,
    id_of: impl Fn(&T) -> &EntityId,
) -> bool {
    let before = items.len();
    items.retain(|existing| id_of(existing) != id);
    items.len() != before
}
