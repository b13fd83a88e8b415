use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::record::{CategoryRecord, FileTypeRecord, TagRecord, UserRecord};

/// Read-only access to the reference collections joined into asset documents.
///
/// Implementations are shared by every concurrent invocation and by the three
/// joins inside one invocation, so they must be safe for concurrent use.
/// Set queries follow `$in` semantics: duplicate ids match once and ids with
/// no entity are simply absent from the result.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// Fetch a file type by id.
    async fn file_type(&self, id: ObjectId) -> Result<Option<FileTypeRecord>, StoreError>;
    /// Fetch a file category by id.
    async fn category(&self, id: ObjectId) -> Result<Option<CategoryRecord>, StoreError>;
    /// Fetch every tag whose id is in `ids`.
    async fn tags(&self, ids: &[ObjectId]) -> Result<Vec<TagRecord>, StoreError>;
    /// Fetch every user whose email is in `emails`.
    async fn users(&self, emails: &[String]) -> Result<Vec<UserRecord>, StoreError>;
}

/// Configuration for selecting and building a reference-store backend.
///
/// # Example
/// ```
/// use lookup::StoreConfig;
///
/// // In-memory (for testing)
/// let config = StoreConfig::in_memory();
///
/// // MongoDB
/// let config = StoreConfig::mongo("mongodb://localhost:27017", "digitile");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// MongoDB database holding the `file_type`, `file_category`, `tag` and
    /// `user` collections.
    ///
    /// Requires the `backend-mongo` feature (enabled by default).
    Mongo { uri: String, database: String },
    /// An empty in-memory store. Only useful for dry runs.
    #[default]
    InMemory,
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        StoreConfig::InMemory
    }

    pub fn mongo<U: Into<String>, D: Into<String>>(uri: U, database: D) -> Self {
        StoreConfig::Mongo {
            uri: uri.into(),
            database: database.into(),
        }
    }

    /// Build the backend described by this configuration.
    pub async fn build(&self) -> Result<Arc<dyn ReferenceStore>, StoreError> {
        match self {
            StoreConfig::InMemory => Ok(Arc::new(InMemoryReferenceStore::new())),
            StoreConfig::Mongo { uri, database } => {
                #[cfg(feature = "backend-mongo")]
                {
                    Ok(Arc::new(MongoReferenceStore::connect(uri, database).await?))
                }
                #[cfg(not(feature = "backend-mongo"))]
                {
                    let _ = (uri, database);
                    Err(StoreError::backend(
                        "mongo backend disabled at compile time",
                    ))
                }
            }
        }
    }
}

/// A reference store held in `HashMap`s.
///
/// Populated through the `with_*` builders and read-only afterwards. Counts
/// every query it answers so tests can assert that nothing was looked up.
#[derive(Default)]
pub struct InMemoryReferenceStore {
    file_types: HashMap<ObjectId, FileTypeRecord>,
    categories: HashMap<ObjectId, CategoryRecord>,
    tags: HashMap<ObjectId, TagRecord>,
    users: HashMap<String, UserRecord>,
    queries: AtomicUsize,
}

impl InMemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_type(mut self, record: FileTypeRecord) -> Self {
        self.file_types.insert(record.id, record);
        self
    }

    pub fn with_category(mut self, id: ObjectId, name: impl Into<String>) -> Self {
        self.categories
            .insert(id, CategoryRecord { name: name.into() });
        self
    }

    pub fn with_tag(mut self, id: ObjectId, name: impl Into<String>) -> Self {
        self.tags.insert(
            id,
            TagRecord {
                id,
                name: name.into(),
            },
        );
        self
    }

    pub fn with_user(mut self, email: impl Into<String>, name: impl Into<String>) -> Self {
        let email = email.into();
        self.users.insert(
            email.clone(),
            UserRecord {
                email,
                name: name.into(),
            },
        );
        self
    }

    /// Number of queries answered so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

fn unique<T: Clone + Eq + std::hash::Hash>(ids: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect()
}

#[async_trait]
impl ReferenceStore for InMemoryReferenceStore {
    async fn file_type(&self, id: ObjectId) -> Result<Option<FileTypeRecord>, StoreError> {
        self.count();
        Ok(self.file_types.get(&id).cloned())
    }

    async fn category(&self, id: ObjectId) -> Result<Option<CategoryRecord>, StoreError> {
        self.count();
        Ok(self.categories.get(&id).cloned())
    }

    async fn tags(&self, ids: &[ObjectId]) -> Result<Vec<TagRecord>, StoreError> {
        self.count();
        Ok(unique(ids)
            .iter()
            .filter_map(|id| self.tags.get(id).cloned())
            .collect())
    }

    async fn users(&self, emails: &[String]) -> Result<Vec<UserRecord>, StoreError> {
        self.count();
        Ok(unique(emails)
            .iter()
            .filter_map(|email| self.users.get(email).cloned())
            .collect())
    }
}

/// The MongoDB backend.
#[cfg(feature = "backend-mongo")]
pub mod mongo;

#[cfg(feature = "backend-mongo")]
pub use mongo::MongoReferenceStore;
