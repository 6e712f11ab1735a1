//! SQLite-backed implementation of the document store.
//!
//! # Responsibility
//! - Open the database once per store, on first use, and share the connection.
//! - Run every statement on tokio's blocking pool.
//! - Translate SQLite constraint failures into store-level errors.
//!
//! # Invariants
//! - Concurrent first callers of `open` observe the same connection.
//! - Documents are returned in insertion order; upserts keep their position.

use super::{Collection, StoreError, StoreResult};
use crate::config::{StoreConfig, StoreLocation};
use crate::db::{open_db, open_db_in_memory};
use log::{debug, error, info};
use rusqlite::{ffi, params, Connection, OptionalExtension, Params};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::OnceCell;

/// Shared handle to the open connection.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    conn: Arc<Mutex<Connection>>,
}

impl StoreHandle {
    /// Returns whether both handles point at the same underlying connection.
    pub fn same_connection(&self, other: &StoreHandle) -> bool {
        Arc::ptr_eq(&self.conn, &other.conn)
    }

    /// Runs `f` against the raw connection on the blocking pool.
    pub async fn with_connection<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await?
    }
}

/// Lazily-opened document store with one collection per entity kind.
pub struct DocumentStore {
    config: StoreConfig,
    handle: OnceCell<StoreHandle>,
}

impl DocumentStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            handle: OnceCell::new(),
        }
    }

    /// Store over a private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(StoreConfig::in_memory())
    }

    pub fn is_open(&self) -> bool {
        self.handle.initialized()
    }

    /// Opens the database on first call and returns the cached handle after.
    ///
    /// Migrations run as part of the first open.
    pub async fn open(&self) -> StoreResult<StoreHandle> {
        let handle = self.handle.get_or_try_init(|| self.connect()).await?;
        Ok(handle.clone())
    }

    async fn connect(&self) -> StoreResult<StoreHandle> {
        let location = self.config.location.clone();
        let conn = tokio::task::spawn_blocking(move || match location {
            StoreLocation::File(path) => open_db(path),
            StoreLocation::Memory => open_db_in_memory(),
        })
        .await??;

        info!(
            "event=store_open module=store status=ok collections={}",
            Collection::ALL.len()
        );
        Ok(StoreHandle {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Inserts a new document. Fails with `DuplicateKey` if the id exists.
    pub async fn save(&self, collection: Collection, document: &Value) -> StoreResult<()> {
        let key = document_key(collection, document)?;
        let body = serde_json::to_string(document)?;
        self.execute("save", collection, move |conn| {
            let sql = format!("INSERT INTO {collection} (id, doc) VALUES (?1, ?2);");
            conn.execute(&sql, params![key, body])
                .map_err(|err| classify_write_error(collection, &key, err))?;
            Ok(())
        })
        .await
    }

    /// Inserts or replaces the whole document keyed by its id.
    pub async fn update(&self, collection: Collection, document: &Value) -> StoreResult<()> {
        let key = document_key(collection, document)?;
        let body = serde_json::to_string(document)?;
        self.execute("update", collection, move |conn| {
            let sql = format!(
                "INSERT INTO {collection} (id, doc) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET doc = excluded.doc;"
            );
            conn.execute(&sql, params![key, body])
                .map_err(|err| classify_write_error(collection, &key, err))?;
            Ok(())
        })
        .await
    }

    pub async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> StoreResult<Option<Value>> {
        let id = id.to_string();
        self.execute("find_by_id", collection, move |conn| {
            let sql = format!("SELECT doc FROM {collection} WHERE id = ?1;");
            let body: Option<String> = conn
                .query_row(&sql, [id.as_str()], |row| row.get(0))
                .optional()?;
            body.as_deref().map(decode).transpose()
        })
        .await
    }

    /// First document, in insertion order, whose indexed value equals `value`.
    pub async fn find_by_index(
        &self,
        collection: Collection,
        index: &str,
        value: &str,
    ) -> StoreResult<Option<Value>> {
        let spec = collection.index(index)?;
        let value = value.to_string();
        self.execute("find_by_index", collection, move |conn| {
            let sql = format!(
                "SELECT doc FROM {collection}
                 WHERE json_extract(doc, '{}') = ?1
                 ORDER BY rowid
                 LIMIT 1;",
                spec.key_path
            );
            Ok(query_documents(conn, &sql, [value.as_str()])?
                .into_iter()
                .next())
        })
        .await
    }

    /// Every document whose indexed value equals `value`, in insertion order.
    pub async fn find_all_by_index(
        &self,
        collection: Collection,
        index: &str,
        value: &str,
    ) -> StoreResult<Vec<Value>> {
        let spec = collection.index(index)?;
        let value = value.to_string();
        self.execute("find_all_by_index", collection, move |conn| {
            let sql = format!(
                "SELECT doc FROM {collection}
                 WHERE json_extract(doc, '{}') = ?1
                 ORDER BY rowid;",
                spec.key_path
            );
            query_documents(conn, &sql, [value.as_str()])
        })
        .await
    }

    pub async fn find_all(&self, collection: Collection) -> StoreResult<Vec<Value>> {
        self.execute("find_all", collection, move |conn| {
            let sql = format!("SELECT doc FROM {collection} ORDER BY rowid;");
            query_documents(conn, &sql, [])
        })
        .await
    }

    /// Removes a document by id. Returns whether anything was removed;
    /// deleting a missing id is not an error.
    pub async fn delete(&self, collection: Collection, id: &str) -> StoreResult<bool> {
        let id = id.to_string();
        self.execute("delete", collection, move |conn| {
            let sql = format!("DELETE FROM {collection} WHERE id = ?1;");
            let removed = conn.execute(&sql, [id.as_str()])?;
            Ok(removed > 0)
        })
        .await
    }

    pub async fn count(&self, collection: Collection) -> StoreResult<u64> {
        self.execute("count", collection, move |conn| {
            let sql = format!("SELECT COUNT(*) FROM {collection};");
            let count = conn.query_row(&sql, [], |row| row.get::<_, i64>(0))?;
            Ok(count as u64)
        })
        .await
    }

    async fn execute<T, F>(
        &self,
        operation: &'static str,
        collection: Collection,
        f: F,
    ) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let handle = self.open().await?;
        let started_at = Instant::now();
        let result = handle.with_connection(f).await;

        match &result {
            Ok(_) => debug!(
                "event=store_{operation} module=store status=ok collection={collection} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_{operation} module=store status=error collection={collection} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            ),
        }
        result
    }
}

fn document_key(collection: Collection, document: &Value) -> StoreResult<String> {
    document
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(StoreError::MissingKey { collection })
}

fn decode(body: &str) -> StoreResult<Value> {
    Ok(serde_json::from_str(body)?)
}

fn query_documents(conn: &Connection, sql: &str, params: impl Params) -> StoreResult<Vec<Value>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| row.get::<_, String>(0))?;

    let mut documents = Vec::new();
    for body in rows {
        documents.push(decode(&body?)?);
    }
    Ok(documents)
}

fn classify_write_error(collection: Collection, key: &str, err: rusqlite::Error) -> StoreError {
    let (code, message) = match &err {
        rusqlite::Error::SqliteFailure(failure, message) => {
            (failure.extended_code, message.clone())
        }
        _ => return err.into(),
    };

    match code {
        ffi::SQLITE_CONSTRAINT_PRIMARYKEY => StoreError::DuplicateKey {
            collection,
            key: key.to_string(),
        },
        ffi::SQLITE_CONSTRAINT_UNIQUE => StoreError::ConstraintViolation {
            collection,
            message: message.unwrap_or_else(|| err.to_string()),
        },
        _ => err.into(),
    }
}
