use crate::AssetId;
use thiserror::Error;

/// Failure taxonomy of the lineage engine.
///
/// Only `FetchFailure` is ever surfaced to the user (as a dismissible
/// notification); everything else degrades silently and is logged by the
/// component that recovered from it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LineageError {
    /// The lineage query returned no nodes. Rendered as the "no lineage"
    /// placeholder, not as an error banner.
    #[error("lineage graph is empty")]
    EmptyGraph,

    /// An edge referenced a node id that is not part of the graph. The edge
    /// is dropped and the graph continues without it.
    #[error("edge {source_id} -> {target} references a node missing from the graph")]
    UnresolvedEdgeReference { source_id: AssetId, target: AssetId },

    /// Expand was requested on a node that has no column data.
    #[error("asset {0} has no column data")]
    NoColumnData(AssetId),

    /// A column mapping referenced an asset that could not be matched to
    /// any node currently in the graph. Skipped, never fatal.
    #[error("mapping target {0} is not present in the graph")]
    UnmatchedMappingTarget(String),

    /// A network or backend error from the lineage collaborator. Prior
    /// state is left intact and the operation may be retried.
    #[error("lineage fetch failed: {0}")]
    FetchFailure(String),
}
