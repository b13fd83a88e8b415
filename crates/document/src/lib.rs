//! Asset document layer.
//!
//! Change events carry the raw asset record as a BSON document. Before any
//! lookup runs we shrink it to the fields the search index cares about and
//! rewrite store-native identifiers into plain strings, so everything
//! downstream reads a stable shape.
//!
//! ## What we do
//!
//! - **Project** - drop every field outside the asset allow-list
//! - **Transform** - `_id` becomes `id`, `org` becomes a string, and
//!   `remote.source` is lifted to `remote_source`
//! - **Access** - typed accessors that fail with [`DocumentError`] instead
//!   of panicking on a shape mismatch
//!
//! Projection and transformation are infallible; only the accessors can fail.
//!
//! ## Example
//!
//! ```
//! use document::{bson::doc, bson::oid::ObjectId, project, transform};
//!
//! let id = ObjectId::new();
//! let mut asset = doc! {
//!     "_id": id,
//!     "org": "org-7",
//!     "filename": "q4.pdf",
//!     "last_accessed": "2024-01-01",
//!     "remote": { "source": "dropbox" },
//! };
//!
//! project(&mut asset);
//! transform(&mut asset);
//!
//! assert_eq!(asset.get_str("id").unwrap(), id.to_hex());
//! assert_eq!(asset.get_str("remote_source").unwrap(), "dropbox");
//! assert!(!asset.contains_key("last_accessed"));
//! ```

pub mod access;
mod error;
pub mod fields;
mod project;
mod transform;

pub use bson;
pub use bson::Document;

pub use crate::access::{asset_id, routing_key, string_form};
pub use crate::error::DocumentError;
pub use crate::fields::{
    is_asset_field, is_search_update_field, ASSET_FIELDS, DERIVED_FIELDS, SEARCH_UPDATE_FIELDS,
};
pub use crate::project::project;
pub use crate::transform::transform;
