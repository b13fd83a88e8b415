//! Reference entities as decoded from their collections.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Collection names in the asset database.
pub const FILE_TYPE_COLLECTION: &str = "file_type";
pub const CATEGORY_COLLECTION: &str = "file_category";
pub const TAG_COLLECTION: &str = "tag";
pub const USER_COLLECTION: &str = "user";

/// A file type, projected to `{_id, extension, category}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub extension: String,
    /// Reference into the category collection.
    pub category: ObjectId,
}

/// A file category, projected to `{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
}

/// A user. Users are keyed by email, so `_id` is the email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub email: String,
    pub name: String,
}
