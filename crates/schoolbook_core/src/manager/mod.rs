//! Per-kind entity managers: the write-through, read-through cache.
//!
//! # Responsibility
//! - Hold the canonical in-memory copy of every entity seen by the process.
//! - Funnel every mutation through the repository before touching the cache.
//!
//! # Invariants
//! - The cache changes only after the matching repository call succeeded.
//! - Entries leave the cache only through `delete`.
//! - A repository load that started before a `delete` finished never puts
//!   the deleted entity back into the cache.
//! - Callers receive clones; the cache is never exposed by reference.
//! - No cache lock is held across a repository await.

mod course_manager;
mod resource_manager;
mod student_manager;
mod teacher_manager;

use crate::model::course::Course;
use crate::model::resource::Resource;
use crate::model::student::Student;
use crate::model::teacher::Teacher;
use crate::model::{Entity, EntityId, EntityKind, InvalidStateTransition};
use crate::repo::{
    CourseRepository, RepoError, Repository, ResourceRepository, StudentRepository,
    TeacherRepository,
};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

pub type ManagerResult<T> = Result<T, ManagerError>;

pub type StudentManager = EntityManager<Student, dyn StudentRepository>;
pub type TeacherManager = EntityManager<Teacher, dyn TeacherRepository>;
pub type CourseManager = EntityManager<Course, dyn CourseRepository>;
pub type ResourceManager = EntityManager<Resource, dyn ResourceRepository>;

/// An entity write that succeeded before a later one failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedWrite {
    pub kind: EntityKind,
    pub id: EntityId,
}

#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: EntityId },
    #[error(transparent)]
    InvalidStateTransition(#[from] InvalidStateTransition),
    /// Earlier writes of a multi-entity operation stay committed.
    #[error("{operation} stopped after {} committed write(s): {source}", .committed.len())]
    PartialCommit {
        operation: &'static str,
        committed: Vec<CommittedWrite>,
        #[source]
        source: Box<ManagerError>,
    },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Write-through cache for one entity kind over its repository.
pub struct EntityManager<E, R: ?Sized> {
    repo: Arc<R>,
    cache: RwLock<CacheState<E>>,
    loads: AtomicUsize,
    warmed: OnceCell<()>,
}

/// Cached entities plus the deletions in-flight loads must not undo.
struct CacheState<E> {
    entries: HashMap<EntityId, E>,
    /// Id -> epoch of its delete. Only kept while a load is in flight.
    deleted: HashMap<EntityId, u64>,
    epoch: u64,
}

impl<E: Entity> CacheState<E> {
    /// Caches a loaded entity unless it was deleted after the load started.
    fn admit(&mut self, entity: E, started_at: u64) {
        let deleted = self
            .deleted
            .get(entity.id())
            .is_some_and(|&epoch| epoch > started_at);
        if !deleted {
            self.entries.entry(entity.id().clone()).or_insert(entity);
        }
    }
}

/// A repository read whose result has not been admitted yet.
struct PendingLoad<'a> {
    loads: &'a AtomicUsize,
    started_at: u64,
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        self.loads.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<E, R> EntityManager<E, R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            cache: RwLock::new(CacheState {
                entries: HashMap::new(),
                deleted: HashMap::new(),
                epoch: 0,
            }),
            loads: AtomicUsize::new(0),
            warmed: OnceCell::new(),
        }
    }

    /// Loads every stored entity into the cache once.
    ///
    /// Entries cached before the warm-up finished are kept as they are.
    pub async fn initialize(&self) -> ManagerResult<()> {
        self.warmed
            .get_or_try_init(|| async {
                let load = self.begin_load().await;
                let entities = self.repo.find_all().await?;
                let loaded = entities.len();
                let mut state = self.cache.write().await;
                for entity in entities {
                    state.admit(entity, load.started_at);
                }
                self.finish_load(&mut state, load);
                info!(
                    "event=cache_warm module=manager status=ok kind={} loaded={} cached={}",
                    E::KIND,
                    loaded,
                    state.entries.len()
                );
                Ok::<(), ManagerError>(())
            })
            .await?;
        Ok(())
    }

    /// Whether `get_all` can be trusted to cover the whole store.
    pub fn is_initialized(&self) -> bool {
        self.warmed.initialized()
    }

    /// Persists a new entity, then caches it.
    pub async fn add(&self, entity: &E) -> ManagerResult<()> {
        self.repo.save(entity).await?;
        self.cache
            .write()
            .await
            .entries
            .insert(entity.id().clone(), entity.clone());
        Ok(())
    }

    /// Cached copy, or a read-through fetch that populates the cache.
    pub async fn get(&self, id: &EntityId) -> ManagerResult<Option<E>> {
        let cached = self.cache.read().await.entries.get(id).cloned();
        if cached.is_some() {
            return Ok(cached);
        }

        debug!(
            "event=cache_miss module=manager kind={} id={}",
            E::KIND,
            id
        );
        let load = self.begin_load().await;
        let loaded = self.repo.find_by_id(id).await?;
        let mut state = self.cache.write().await;
        if let Some(entity) = loaded {
            state.admit(entity, load.started_at);
        }
        let found = state.entries.get(id).cloned();
        self.finish_load(&mut state, load);
        Ok(found)
    }

    /// Like `get`, but absence is a `NotFound` error.
    pub async fn require(&self, id: &EntityId) -> ManagerResult<E> {
        self.get(id).await?.ok_or_else(|| ManagerError::NotFound {
            kind: E::KIND,
            id: id.clone(),
        })
    }

    /// Snapshot of the cache. Not re-queried from the repository.
    pub async fn get_all(&self) -> Vec<E> {
        self.cache.read().await.entries.values().cloned().collect()
    }

    /// Persists the entity, then overwrites its cache entry.
    pub async fn update(&self, entity: &E) -> ManagerResult<()> {
        self.repo.update(entity).await?;
        self.cache
            .write()
            .await
            .entries
            .insert(entity.id().clone(), entity.clone());
        Ok(())
    }

    /// Deletes from the repository, then evicts from the cache.
    pub async fn delete(&self, id: &EntityId) -> ManagerResult<()> {
        self.repo.delete(id).await?;
        let mut state = self.cache.write().await;
        state.entries.remove(id);
        state.epoch += 1;
        if self.loads.load(Ordering::SeqCst) > 0 {
            let epoch = state.epoch;
            state.deleted.insert(id.clone(), epoch);
        }
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.entries.is_empty()
    }

    /// Registers a repository read. Deletes from here on are remembered
    /// until every pending load has finished.
    async fn begin_load(&self) -> PendingLoad<'_> {
        let state = self.cache.read().await;
        self.loads.fetch_add(1, Ordering::SeqCst);
        PendingLoad {
            loads: &self.loads,
            started_at: state.epoch,
        }
    }

    fn finish_load(&self, state: &mut CacheState<E>, load: PendingLoad<'_>) {
        drop(load);
        if self.loads.load(Ordering::SeqCst) == 0 {
            state.deleted.clear();
        }
    }

    /// Fetches `id`, applies `change`, and persists the result when `change`
    /// reports a modification.
    pub(crate) async fn modify<T, F>(&self, id: &EntityId, change: F) -> ManagerResult<T>
    where
        F: FnOnce(&mut E) -> ManagerResult<(T, bool)>,
    {
        let mut entity = self.require(id).await?;
        let (output, changed) = change(&mut entity)?;
        if changed {
            self.update(&entity).await?;
        }
        Ok(output)
    }
}
