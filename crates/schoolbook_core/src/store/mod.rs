//! Asynchronous document store over the local SQLite database.
//!
//! # Responsibility
//! - Present each entity kind as a named collection of JSON documents.
//! - Hide connection lifecycle and schema setup behind a lazily-opened handle.
//!
//! # Invariants
//! - Every document carries a string `id`, its primary key.
//! - Each call issues one atomic statement; there are no cross-call
//!   transactions.
//! - Absence is reported as `None`, never as an error.

mod document_store;

pub use document_store::{DocumentStore, StoreHandle};

use crate::db::DbError;
use crate::model::EntityKind;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures produced by the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("collection `{collection}` already holds a document with key `{key}`")]
    DuplicateKey { collection: Collection, key: String },
    #[error("unique index violated in collection `{collection}`: {message}")]
    ConstraintViolation {
        collection: Collection,
        message: String,
    },
    #[error("document for collection `{collection}` has no string `id` key")]
    MissingKey { collection: Collection },
    #[error("collection `{collection}` has no index named `{index}`")]
    UnknownIndex { collection: Collection, index: String },
    #[error("document encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("store connection lock poisoned")]
    Poisoned,
    #[error("store worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Secondary index over a document key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    /// Name callers use in `find_by_index`.
    pub name: &'static str,
    /// SQLite JSON path of the indexed value.
    pub key_path: &'static str,
    pub unique: bool,
}

const STUDENT_INDEXES: &[IndexSpec] = &[IndexSpec {
    name: "email",
    key_path: "$.email",
    unique: true,
}];

const TEACHER_INDEXES: &[IndexSpec] = &[IndexSpec {
    name: "email",
    key_path: "$.email",
    unique: true,
}];

const COURSE_INDEXES: &[IndexSpec] = &[
    IndexSpec {
        name: "subject",
        key_path: "$.subject",
        unique: false,
    },
    IndexSpec {
        name: "teacher.id",
        key_path: "$.teacher.id",
        unique: false,
    },
];

/// One named collection per entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Teachers,
    Courses,
    Resources,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Students,
        Collection::Teachers,
        Collection::Courses,
        Collection::Resources,
    ];

    /// Table name backing this collection.
    pub fn name(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Teachers => "teachers",
            Self::Courses => "courses",
            Self::Resources => "resources",
        }
    }

    pub fn indexes(self) -> &'static [IndexSpec] {
        match self {
            Self::Students => STUDENT_INDEXES,
            Self::Teachers => TEACHER_INDEXES,
            Self::Courses => COURSE_INDEXES,
            Self::Resources => &[],
        }
    }

    pub fn index(self, name: &str) -> StoreResult<&'static IndexSpec> {
        self.indexes()
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| StoreError::UnknownIndex {
                collection: self,
                index: name.to_string(),
            })
    }
}

impl From<EntityKind> for Collection {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Student => Self::Students,
            EntityKind::Teacher => Self::Teachers,
            EntityKind::Course => Self::Courses,
            EntityKind::Resource => Self::Resources,
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
