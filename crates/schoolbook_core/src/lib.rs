//! Persistence and caching core for school records.
//!
//! Students, teachers, courses and resources are stored as JSON documents,
//! read through per-kind repositories and cached by per-kind managers.
//! `School` ties the managers together and keeps cross-entity links in step.

pub mod config;
pub mod db;
pub mod logging;
pub mod manager;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{AppConfig, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use manager::{
    CommittedWrite, CourseManager, EntityManager, ManagerError, ManagerResult, ResourceManager,
    StudentManager, TeacherManager,
};
pub use model::course::Course;
pub use model::reference::{CourseRef, ResourceRef, StudentRef, TeacherRef};
pub use model::resource::Resource;
pub use model::student::Student;
pub use model::teacher::Teacher;
pub use model::{Entity, EntityId, EntityKind, InvalidStateTransition, ValidationError};
pub use repo::{
    CourseRepository, DocumentRepository, RepoError, RepoResult, Repository, ResourceRepository,
    StudentRepository, TeacherRepository,
};
pub use service::{School, SchoolRepositories};
pub use store::{Collection, DocumentStore, StoreError, StoreHandle, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
