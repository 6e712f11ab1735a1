//! School-level service: the four managers and the operations that span them.
//!
//! # Responsibility
//! - Build one manager per entity kind, once, and hand them out by reference.
//! - Keep both sides of a bidirectional relationship in step.
//!
//! # Invariants
//! - Multi-entity operations write in a fixed, documented order.
//! - A failure after the first committed write is reported as
//!   `ManagerError::PartialCommit`; nothing is rolled back.

mod allocation;
mod enrollment;

use crate::config::StoreConfig;
use crate::manager::{
    CommittedWrite, CourseManager, ManagerError, ManagerResult, ResourceManager, StudentManager,
    TeacherManager,
};
use crate::model::course::Course;
use crate::model::resource::Resource;
use crate::model::student::Student;
use crate::model::teacher::Teacher;
use crate::model::{EntityId, EntityKind};
use crate::repo::{
    CourseRepository, DocumentRepository, RepoError, ResourceRepository, StudentRepository,
    TeacherRepository,
};
use crate::store::DocumentStore;
use log::{info, warn};
use std::future::Future;
use std::sync::Arc;

/// Repository set the service is built from.
pub struct SchoolRepositories {
    pub students: Arc<dyn StudentRepository>,
    pub teachers: Arc<dyn TeacherRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub resources: Arc<dyn ResourceRepository>,
}

impl SchoolRepositories {
    /// Document-store repositories sharing one store.
    pub fn document_backed(store: Arc<DocumentStore>) -> Self {
        Self {
            students: Arc::new(DocumentRepository::<Student>::new(Arc::clone(&store))),
            teachers: Arc::new(DocumentRepository::<Teacher>::new(Arc::clone(&store))),
            courses: Arc::new(DocumentRepository::<Course>::new(Arc::clone(&store))),
            resources: Arc::new(DocumentRepository::<Resource>::new(store)),
        }
    }
}

/// Process-wide entry point owning one manager per entity kind.
pub struct School {
    students: StudentManager,
    teachers: TeacherManager,
    courses: CourseManager,
    resources: ResourceManager,
}

impl School {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self::with_repositories(SchoolRepositories::document_backed(store))
    }

    pub fn with_repositories(repos: SchoolRepositories) -> Self {
        Self {
            students: StudentManager::new(repos.students),
            teachers: TeacherManager::new(repos.teachers),
            courses: CourseManager::new(repos.courses),
            resources: ResourceManager::new(repos.resources),
        }
    }

    /// Opens the store described by `config` and warms every cache.
    pub async fn open(config: StoreConfig) -> ManagerResult<Self> {
        let store = Arc::new(DocumentStore::new(config));
        store.open().await.map_err(RepoError::from)?;
        let school = Self::new(store);
        school.initialize().await?;
        Ok(school)
    }

    /// Warms all four caches. Safe to call more than once.
    pub async fn initialize(&self) -> ManagerResult<()> {
        tokio::try_join!(
            self.students.initialize(),
            self.teachers.initialize(),
            self.courses.initialize(),
            self.resources.initialize(),
        )?;
        info!("event=school_init module=service status=ok");
        Ok(())
    }

    pub fn students(&self) -> &StudentManager {
        &self.students
    }

    pub fn teachers(&self) -> &TeacherManager {
        &self.teachers
    }

    pub fn courses(&self) -> &CourseManager {
        &self.courses
    }

    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    /// Resolves a student's course references through the course manager.
    ///
    /// References whose course no longer exists are skipped.
    pub async fn enrolled_courses(&self, student_id: &EntityId) -> ManagerResult<Vec<Course>> {
        let student = self.students.require(student_id).await?;
        let mut courses = Vec::with_capacity(student.enrolled_courses().len());
        for reference in student.enrolled_courses() {
            if let Some(course) = self.courses.get(&reference.id).await? {
                courses.push(course);
            }
        }
        Ok(courses)
    }
}

/// Ordered record of the writes a multi-entity operation has committed.
struct CommitLog {
    operation: &'static str,
    committed: Vec<CommittedWrite>,
}

impl CommitLog {
    fn new(operation: &'static str) -> Self {
        Self {
            operation,
            committed: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.committed.len()
    }

    /// Awaits any step of the operation, turning a failure into
    /// `PartialCommit` once something has been written.
    async fn step<T>(&mut self, step: impl Future<Output = ManagerResult<T>>) -> ManagerResult<T> {
        step.await.map_err(|err| self.abort(err))
    }

    /// Awaits a write and records it as committed.
    async fn write(
        &mut self,
        kind: EntityKind,
        id: &EntityId,
        write: impl Future<Output = ManagerResult<()>>,
    ) -> ManagerResult<()> {
        self.step(write).await?;
        self.committed.push(CommittedWrite {
            kind,
            id: id.clone(),
        });
        Ok(())
    }

    fn abort(&mut self, err: ManagerError) -> ManagerError {
        if self.committed.is_empty() {
            return err;
        }
        warn!(
            "event=partial_commit module=service status=error operation={} committed={} error={}",
            self.operation,
            self.committed.len(),
            err
        );
        ManagerError::PartialCommit {
            operation: self.operation,
            committed: std::mem::take(&mut self.committed),
            source: Box::new(err),
        }
    }
}
