//! Reference-store joins for asset search documents.
//!
//! An asset only stores references: a file type id, tag ids and user emails.
//! The search index needs the names behind them, so each join queries one
//! reference collection and returns a [`Fragment`] of search fields to be
//! merged into the asset later.
//!
//! ## Joins
//!
//! - [`file_type_fragment`] - file type, then its category
//! - [`tag_fragment`] - tag names, lower-cased; a short result is only observed
//! - [`user_fragment`] - user objects and their type-ahead strings; a short
//!   result is an error
//!
//! Joins are independent of each other and hold nothing across calls, so the
//! enricher can run all three at once against one [`ReferenceStore`].
//!
//! ## Backends
//!
//! [`StoreConfig`] selects a backend at runtime. MongoDB is behind the
//! `backend-mongo` feature; [`InMemoryReferenceStore`] is always available.

pub mod backend;
mod error;
mod file_type;
mod observer;
pub mod record;
mod tags;
mod type_ahead;
mod users;

use document::Document;

/// Search fields produced by one join, keyed by their final field names.
pub type Fragment = Document;

pub use crate::backend::{InMemoryReferenceStore, ReferenceStore, StoreConfig};
#[cfg(feature = "backend-mongo")]
pub use crate::backend::MongoReferenceStore;
pub use crate::error::{LookupError, LookupFailure, LookupKind, StoreError};
pub use crate::file_type::file_type_fragment;
pub use crate::observer::{LookupObserver, PartialTags, RecordingObserver, TracingObserver};
pub use crate::record::{CategoryRecord, FileTypeRecord, TagRecord, UserRecord};
pub use crate::tags::tag_fragment;
pub use crate::type_ahead::{type_ahead, TYPE_AHEAD_DELIMITER};
pub use crate::users::user_fragment;
