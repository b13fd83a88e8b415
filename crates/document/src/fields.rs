//! Field names of the asset document and the fixed field sets the pipeline
//! filters against.

/// Native store identifier, replaced by [`ID`] during transformation.
pub const NATIVE_ID: &str = "_id";
/// Stable string identifier written by the transformer.
pub const ID: &str = "id";
pub const ORG: &str = "org";
pub const FILENAME: &str = "filename";
pub const FILETYPE: &str = "filetype";
pub const CONTENT: &str = "content";
pub const TAGS: &str = "tags";
pub const THUMBNAIL_URL: &str = "thumbnail_url";
pub const REMOTE: &str = "remote";
/// Sub-field of [`REMOTE`] lifted to [`REMOTE_SOURCE`].
pub const SOURCE: &str = "source";
pub const REMOTE_SOURCE: &str = "remote_source";
pub const USERS: &str = "users";
pub const CREATED: &str = "created";
pub const REMOTE_MODIFIED: &str = "remote_modified";
pub const OWNER: &str = "owner";
pub const EDITORS: &str = "editors";
pub const COUNTERS: &str = "counters";
/// Marker field writers touch to force a resync without changing content.
pub const FORCE_SYNC: &str = "forceSync";

/// Fields added by enrichment.
pub const FILETYPE_TYPE_AHEAD: &str = "filetype_type_ahead";
pub const USERS_TYPE_AHEAD: &str = "users_type_ahead";

/// Fields of an incoming asset document that survive projection.
pub const ASSET_FIELDS: [&str; 14] = [
    NATIVE_ID,
    ORG,
    FILENAME,
    FILETYPE,
    CONTENT,
    TAGS,
    THUMBNAIL_URL,
    REMOTE,
    USERS,
    CREATED,
    REMOTE_MODIFIED,
    OWNER,
    EDITORS,
    COUNTERS,
];

/// Fields whose modification affects the search projection. Updates touching
/// none of these are skipped.
pub const SEARCH_UPDATE_FIELDS: [&str; 11] = [
    FILENAME,
    FILETYPE,
    CONTENT,
    TAGS,
    THUMBNAIL_URL,
    USERS,
    REMOTE_MODIFIED,
    OWNER,
    EDITORS,
    COUNTERS,
    FORCE_SYNC,
];

/// Fields the transformer and the enrichment joins may add after projection.
pub const DERIVED_FIELDS: [&str; 4] = [ID, REMOTE_SOURCE, FILETYPE_TYPE_AHEAD, USERS_TYPE_AHEAD];

pub fn is_asset_field(name: &str) -> bool {
    ASSET_FIELDS.contains(&name)
}

/// Whether an updated field path touches a search-relevant field.
///
/// Dotted paths (`counters.views`) are matched on their top-level segment.
pub fn is_search_update_field(path: &str) -> bool {
    let top = path.split('.').next().unwrap_or(path);
    SEARCH_UPDATE_FIELDS.contains(&top)
}
