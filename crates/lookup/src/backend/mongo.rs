//! MongoDB backend for the reference collections.
//!
//! Each query projects only the fields the joins read, mirroring the shapes
//! in [`crate::record`]. Documents are fetched untyped and decoded
//! separately so transport, cursor and decode failures stay distinguishable.
//!
//! # Configuration Example
//! ```yaml
//! store:
//!   backend: "mongo"
//!   uri: "mongodb://localhost:27017"
//!   database: "digitile"
//! ```

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::TryStreamExt;
use mongodb::options::{FindOneOptions, FindOptions};
use mongodb::{Client, Collection, Database};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::backend::ReferenceStore;
use crate::error::StoreError;
use crate::record::{
    CategoryRecord, FileTypeRecord, TagRecord, UserRecord, CATEGORY_COLLECTION,
    FILE_TYPE_COLLECTION, TAG_COLLECTION, USER_COLLECTION,
};

/// Reference store backed by a MongoDB database.
///
/// The driver's `Client` pools connections internally and is cheap to clone,
/// so one store can serve every concurrent invocation.
#[derive(Clone)]
pub struct MongoReferenceStore {
    db: Database,
}

impl MongoReferenceStore {
    /// Connect to `uri` and use `database` for all lookups.
    ///
    /// # Example
    /// ```no_run
    /// use lookup::MongoReferenceStore;
    ///
    /// # async fn run() -> Result<(), lookup::StoreError> {
    /// let store = MongoReferenceStore::connect("mongodb://localhost:27017", "digitile").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;
        debug!(database, "connected reference store");
        Ok(Self::from_database(client.database(database)))
    }

    /// Use an already configured database handle.
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    async fn find_one<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: ObjectId,
        projection: Document,
    ) -> Result<Option<T>, StoreError> {
        let options = FindOneOptions::builder().projection(projection).build();
        let found = self
            .collection(collection)
            .find_one(doc! { "_id": id }, options)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        found
            .map(|raw| bson::from_document(raw).map_err(|e| StoreError::Decode(e.to_string())))
            .transpose()
    }

    async fn find_in<T: DeserializeOwned>(
        &self,
        collection: &str,
        ids: bson::Bson,
        projection: Document,
    ) -> Result<Vec<T>, StoreError> {
        let options = FindOptions::builder().projection(projection).build();
        let mut cursor = self
            .collection(collection)
            .find(doc! { "_id": { "$in": ids } }, options)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut records = Vec::new();
        while let Some(raw) = cursor
            .try_next()
            .await
            .map_err(|e| StoreError::Cursor(e.to_string()))?
        {
            records.push(bson::from_document(raw).map_err(|e| StoreError::Decode(e.to_string()))?);
        }
        Ok(records)
    }
}

#[async_trait]
impl ReferenceStore for MongoReferenceStore {
    async fn file_type(&self, id: ObjectId) -> Result<Option<FileTypeRecord>, StoreError> {
        self.find_one(
            FILE_TYPE_COLLECTION,
            id,
            doc! { "_id": 1, "extension": 1, "category": 1 },
        )
        .await
    }

    async fn category(&self, id: ObjectId) -> Result<Option<CategoryRecord>, StoreError> {
        self.find_one(CATEGORY_COLLECTION, id, doc! { "_id": 0, "name": 1 })
            .await
    }

    async fn tags(&self, ids: &[ObjectId]) -> Result<Vec<TagRecord>, StoreError> {
        let ids = ids.iter().copied().map(bson::Bson::ObjectId).collect();
        self.find_in(
            TAG_COLLECTION,
            bson::Bson::Array(ids),
            doc! { "_id": 1, "name": 1 },
        )
        .await
    }

    async fn users(&self, emails: &[String]) -> Result<Vec<UserRecord>, StoreError> {
        let ids = emails.iter().cloned().map(bson::Bson::String).collect();
        self.find_in(
            USER_COLLECTION,
            bson::Bson::Array(ids),
            doc! { "_id": 1, "name": 1 },
        )
        .await
    }
}
