//! Repository layer abstractions and the document-store implementation.
//!
//! # Responsibility
//! - Define one persistence contract per entity kind.
//! - Isolate document encoding and store calls from managers.
//!
//! # Invariants
//! - Writes validate and serialize the entity before reaching the store.
//! - Every read that returns entities deserializes each document exactly once.
//! - Lookups without a backing index are full scans filtered in memory.

pub mod course_repo;
pub mod resource_repo;
pub mod student_repo;
pub mod teacher_repo;

pub use course_repo::CourseRepository;
pub use resource_repo::ResourceRepository;
pub use student_repo::StudentRepository;
pub use teacher_repo::TeacherRepository;

use crate::model::{deserialize, serialize, Entity, EntityId, EntityKind, ValidationError};
use crate::store::{Collection, DocumentStore, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and query operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{kind} already exists: {id}")]
    DuplicateIdentity { kind: EntityKind, id: EntityId },
    #[error("{kind} {id} conflicts with a unique field: {message}")]
    UniqueViolation {
        kind: EntityKind,
        id: EntityId,
        message: String,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid {kind} document: {source}")]
    InvalidDocument {
        kind: EntityKind,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Persistence operations shared by every entity kind.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Inserts a new entity; fails with `DuplicateIdentity` if its id exists.
    async fn save(&self, entity: &E) -> RepoResult<()>;
    async fn find_by_id(&self, id: &EntityId) -> RepoResult<Option<E>>;
    async fn find_all(&self) -> RepoResult<Vec<E>>;
    /// Upserts the whole entity document.
    async fn update(&self, entity: &E) -> RepoResult<()>;
    /// Removes the entity. Deleting an unknown id succeeds.
    async fn delete(&self, id: &EntityId) -> RepoResult<()>;
}

/// Document-store-backed repository for entity kind `E`.
pub struct DocumentRepository<E> {
    store: Arc<DocumentStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> DocumentRepository<E> {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn collection() -> Collection {
        Collection::from(E::KIND)
    }

    fn encode(entity: &E) -> RepoResult<Value> {
        entity.validate()?;
        serialize(entity).map_err(|source| RepoError::InvalidDocument {
            kind: E::KIND,
            source,
        })
    }

    fn decode(document: Value) -> RepoResult<E> {
        deserialize(document).map_err(|source| RepoError::InvalidDocument {
            kind: E::KIND,
            source,
        })
    }

    fn decode_all(documents: Vec<Value>) -> RepoResult<Vec<E>> {
        documents.into_iter().map(Self::decode).collect()
    }

    fn write_error(entity: &E, err: StoreError) -> RepoError {
        match err {
            StoreError::DuplicateKey { .. } => RepoError::DuplicateIdentity {
                kind: E::KIND,
                id: entity.id().clone(),
            },
            StoreError::ConstraintViolation { message, .. } => RepoError::UniqueViolation {
                kind: E::KIND,
                id: entity.id().clone(),
                message,
            },
            other => RepoError::Store(other),
        }
    }

    /// Point lookup on a secondary index.
    pub(crate) async fn find_one_by_index(
        &self,
        index: &str,
        value: &str,
    ) -> RepoResult<Option<E>> {
        self.store
            .find_by_index(Self::collection(), index, value)
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// All matches on a non-unique secondary index.
    pub(crate) async fn find_many_by_index(
        &self,
        index: &str,
        value: &str,
    ) -> RepoResult<Vec<E>> {
        let documents = self
            .store
            .find_all_by_index(Self::collection(), index, value)
            .await?;
        Self::decode_all(documents)
    }

    /// Full scan followed by an in-memory filter.
    pub(crate) async fn find_where<P>(&self, predicate: P) -> RepoResult<Vec<E>>
    where
        P: Fn(&E) -> bool + Send,
    {
        let all = self.find_all().await?;
        Ok(all.into_iter().filter(|entity| predicate(entity)).collect())
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for DocumentRepository<E> {
    async fn save(&self, entity: &E) -> RepoResult<()> {
        let document = Self::encode(entity)?;
        self.store
            .save(Self::collection(), &document)
            .await
            .map_err(|err| Self::write_error(entity, err))
    }

    async fn find_by_id(&self, id: &EntityId) -> RepoResult<Option<E>> {
        self.store
            .find_by_id(Self::collection(), id.as_str())
            .await?
            .map(Self::decode)
            .transpose()
    }

    async fn find_all(&self) -> RepoResult<Vec<E>> {
        let documents = self.store.find_all(Self::collection()).await?;
        Self::decode_all(documents)
    }

    async fn update(&self, entity: &E) -> RepoResult<()> {
        let document = Self::encode(entity)?;
        self.store
            .update(Self::collection(), &document)
            .await
            .map_err(|err| Self::write_error(entity, err))
    }

    async fn delete(&self, id: &EntityId) -> RepoResult<()> {
        self.store.delete(Self::collection(), id.as_str()).await?;
        Ok(())
    }
}
