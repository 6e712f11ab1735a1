use async_trait::async_trait;
use schoolbook_core::{
    Course, CourseManager, DocumentRepository, DocumentStore, Entity, EntityId, EntityKind,
    ManagerError, RepoError, RepoResult, Repository, Resource, ResourceManager, Student,
    StudentManager, StudentRepository, Teacher, TeacherManager,
};
use std::sync::Arc;
use tokio::sync::Notify;

fn store() -> Arc<DocumentStore> {
    Arc::new(DocumentStore::in_memory())
}

fn student_manager(store: &Arc<DocumentStore>) -> StudentManager {
    StudentManager::new(Arc::new(DocumentRepository::<Student>::new(Arc::clone(store))))
}

fn course_manager(store: &Arc<DocumentStore>) -> CourseManager {
    CourseManager::new(Arc::new(DocumentRepository::<Course>::new(Arc::clone(store))))
}

#[tokio::test]
async fn initialize_loads_every_stored_entity_once() {
    let store = store();
    let repo = DocumentRepository::<Course>::new(Arc::clone(&store));
    repo.save(&Course::new("Algorithms", "CS")).await.unwrap();
    repo.save(&Course::new("Poetry", "Arts")).await.unwrap();

    let manager = course_manager(&store);
    assert!(!manager.is_initialized());
    manager.initialize().await.unwrap();
    assert!(manager.is_initialized());
    assert_eq!(manager.len().await, 2);

    repo.save(&Course::new("Compilers", "CS")).await.unwrap();
    manager.initialize().await.unwrap();
    assert_eq!(manager.get_all().await.len(), 2);
}

#[tokio::test]
async fn concurrent_initialize_loads_once() {
    let store = store();
    let repo = DocumentRepository::<Student>::new(Arc::clone(&store));
    repo.save(&Student::new("Ada", "ada@example.com")).await.unwrap();

    let manager = student_manager(&store);
    let (first, second) = tokio::join!(manager.initialize(), manager.initialize());
    first.unwrap();
    second.unwrap();
    assert_eq!(manager.len().await, 1);
}

#[tokio::test]
async fn add_writes_through_to_the_store() {
    let store = store();
    let manager = student_manager(&store);
    let ada = Student::new("Ada", "ada@example.com");
    manager.add(&ada).await.unwrap();

    let other = student_manager(&store);
    assert_eq!(other.get(ada.id()).await.unwrap(), Some(ada.clone()));
    assert_eq!(manager.get_all().await, vec![ada]);
}

#[tokio::test]
async fn failed_add_leaves_the_cache_untouched() {
    let store = store();
    let manager = student_manager(&store);
    manager
        .add(&Student::new("Ada", "ada@example.com"))
        .await
        .unwrap();

    let duplicate = Student::new("Ada Again", "ada@example.com");
    let err = manager.add(&duplicate).await.unwrap_err();
    assert!(matches!(
        err,
        ManagerError::Repo(RepoError::UniqueViolation { .. })
    ));
    assert_eq!(manager.len().await, 1);
    assert!(manager.get(duplicate.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn get_reads_through_on_a_cache_miss() {
    let store = store();
    let grace = Teacher::new("Grace", "grace@example.com");
    DocumentRepository::<Teacher>::new(Arc::clone(&store))
        .save(&grace)
        .await
        .unwrap();

    let manager = TeacherManager::new(Arc::new(DocumentRepository::<Teacher>::new(store)));
    assert!(manager.is_empty().await);
    assert_eq!(manager.get(grace.id()).await.unwrap(), Some(grace));
    assert_eq!(manager.len().await, 1);
}

#[tokio::test]
async fn require_reports_missing_entities() {
    let manager = course_manager(&store());
    let missing = Course::new("Ghost", "None");

    assert!(manager.get(missing.id()).await.unwrap().is_none());
    let err = manager.require(missing.id()).await.unwrap_err();
    assert!(matches!(
        err,
        ManagerError::NotFound { kind: EntityKind::Course, ref id } if id == missing.id()
    ));
}

#[tokio::test]
async fn update_and_delete_keep_cache_and_store_in_step() {
    let store = store();
    let manager = student_manager(&store);
    let mut ada = Student::new("Ada", "ada@example.com");
    manager.add(&ada).await.unwrap();

    ada.set_name("Ada Lovelace");
    manager.update(&ada).await.unwrap();
    let cached = manager.get(ada.id()).await.unwrap().unwrap();
    assert_eq!(cached.name(), "Ada Lovelace");

    manager.delete(ada.id()).await.unwrap();
    manager.delete(ada.id()).await.unwrap();
    assert!(manager.is_empty().await);
    assert!(student_manager(&store).get(ada.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn returned_entities_are_copies() {
    let manager = student_manager(&store());
    let ada = Student::new("Ada", "ada@example.com");
    manager.add(&ada).await.unwrap();

    let mut copy = manager.require(ada.id()).await.unwrap();
    copy.set_name("Changed Locally");
    assert_eq!(manager.require(ada.id()).await.unwrap().name(), "Ada");
}

#[tokio::test]
async fn lookups_pass_through_to_the_repository() {
    let store = store();
    let students = student_manager(&store);
    let courses = course_manager(&store);
    let algorithms = Course::new("Algorithms", "CS");
    courses.add(&algorithms).await.unwrap();

    let ada = Student::new("Ada", "ada@example.com");
    students.add(&ada).await.unwrap();
    assert!(students
        .enroll_in_course(ada.id(), algorithms.reference())
        .await
        .unwrap());
    assert!(students.add_service(ada.id(), "library").await.unwrap());
    assert!(!students.add_service(ada.id(), "library").await.unwrap());

    let found = students.get_by_email("ada@example.com").await.unwrap().unwrap();
    assert_eq!(found.extra_services(), ["library"]);
    assert_eq!(
        students.get_by_course(algorithms.id()).await.unwrap().len(),
        1
    );
    assert_eq!(courses.get_by_subject("CS").await.unwrap(), vec![algorithms]);
}

#[tokio::test]
async fn allocating_a_taken_resource_fails_without_writing() {
    let store = store();
    let manager = ResourceManager::new(Arc::new(DocumentRepository::<Resource>::new(
        Arc::clone(&store),
    )));
    let projector = Resource::new("Projector", "equipment");
    manager.add(&projector).await.unwrap();

    manager.allocate(projector.id()).await.unwrap();
    let err = manager.allocate(projector.id()).await.unwrap_err();
    assert!(matches!(err, ManagerError::InvalidStateTransition(_)));

    manager.release(projector.id()).await.unwrap();
    manager.release(projector.id()).await.unwrap();
    let stored = DocumentRepository::<Resource>::new(store)
        .find_by_id(projector.id())
        .await
        .unwrap()
        .unwrap();
    assert!(stored.is_available());
}

#[tokio::test]
async fn renamed_course_moves_between_subject_lookups() {
    let manager = course_manager(&store());
    let mut course = Course::new("Algorithms", "CS");
    manager.add(&course).await.unwrap();

    course.set_title("Discrete Maths");
    course.set_subject("Maths");
    manager.update(&course).await.unwrap();

    assert!(manager.get_by_subject("CS").await.unwrap().is_empty());
    let maths = manager.get_by_subject("Maths").await.unwrap();
    assert_eq!(maths.len(), 1);
    assert_eq!(maths[0].title(), "Discrete Maths");
}

/// Student repository whose reads pause after fetching until released.
struct GatedStudents {
    inner: DocumentRepository<Student>,
    fetched: Notify,
    release: Notify,
}

impl GatedStudents {
    async fn pause(&self) {
        self.fetched.notify_one();
        self.release.notified().await;
    }
}

#[async_trait]
impl Repository<Student> for GatedStudents {
    async fn save(&self, entity: &Student) -> RepoResult<()> {
        self.inner.save(entity).await
    }

    async fn find_by_id(&self, id: &EntityId) -> RepoResult<Option<Student>> {
        let found = self.inner.find_by_id(id).await?;
        self.pause().await;
        Ok(found)
    }

    async fn find_all(&self) -> RepoResult<Vec<Student>> {
        let all = self.inner.find_all().await?;
        self.pause().await;
        Ok(all)
    }

    async fn update(&self, entity: &Student) -> RepoResult<()> {
        self.inner.update(entity).await
    }

    async fn delete(&self, id: &EntityId) -> RepoResult<()> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl StudentRepository for GatedStudents {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Student>> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_course(&self, course_id: &EntityId) -> RepoResult<Vec<Student>> {
        self.inner.find_by_course(course_id).await
    }
}

async fn gated_manager_with(student: &Student) -> (StudentManager, Arc<GatedStudents>) {
    let inner = DocumentRepository::<Student>::new(store());
    inner.save(student).await.unwrap();
    let repo = Arc::new(GatedStudents {
        inner,
        fetched: Notify::new(),
        release: Notify::new(),
    });
    (StudentManager::new(repo.clone()), repo)
}

#[tokio::test]
async fn delete_during_warm_up_is_not_undone() {
    let ada = Student::new("Ada", "ada@example.com");
    let (manager, repo) = gated_manager_with(&ada).await;

    let (warmed, deleted) = tokio::join!(manager.initialize(), async {
        repo.fetched.notified().await;
        let deleted = manager.delete(ada.id()).await;
        repo.release.notify_one();
        deleted
    });
    warmed.unwrap();
    deleted.unwrap();

    assert!(repo.inner.find_by_id(ada.id()).await.unwrap().is_none());
    assert!(manager.get_all().await.is_empty());
    assert!(manager.is_empty().await);
}

#[tokio::test]
async fn delete_during_a_cache_miss_is_not_undone() {
    let ada = Student::new("Ada", "ada@example.com");
    let (manager, repo) = gated_manager_with(&ada).await;

    let (found, deleted) = tokio::join!(manager.get(ada.id()), async {
        repo.fetched.notified().await;
        let deleted = manager.delete(ada.id()).await;
        repo.release.notify_one();
        deleted
    });
    deleted.unwrap();

    assert!(found.unwrap().is_none());
    assert!(manager.is_empty().await);
}

#[tokio::test]
async fn entity_saved_again_after_delete_is_cached() {
    let ada = Student::new("Ada", "ada@example.com");
    let (manager, repo) = gated_manager_with(&ada).await;

    let (warmed, readded) = tokio::join!(manager.initialize(), async {
        repo.fetched.notified().await;
        manager.delete(ada.id()).await.unwrap();
        let readded = manager.add(&ada).await;
        repo.release.notify_one();
        readded
    });
    warmed.unwrap();
    readded.unwrap();

    assert_eq!(manager.get_all().await, vec![ada]);
}
