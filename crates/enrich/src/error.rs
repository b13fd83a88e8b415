use lookup::LookupError;
use thiserror::Error;

/// Separator between causes in an aggregated failure message.
pub const CAUSE_SEPARATOR: &str = "; ";

/// One or more joins failed, so nothing was merged.
///
/// Carries every cause rather than the first one, in join order
/// (filetype, tags, users).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syncing asset with ID {asset_id} failed with the following errors: {}", join_causes(.causes))]
pub struct EnrichmentFailed {
    pub asset_id: String,
    pub causes: Vec<LookupError>,
}

fn join_causes(causes: &[LookupError]) -> String {
    causes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(CAUSE_SEPARATOR)
}
