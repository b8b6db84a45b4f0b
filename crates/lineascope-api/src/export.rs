use crate::dto::{ColumnLineageResponse, LineageResponse};
use crate::errors::ApiError;
use chrono::{DateTime, Utc};
use lineascope_core::AssetId;
use serde::{Deserialize, Serialize};

/// A read-only snapshot of the current lineage view for external download.
///
/// Mirrors the two GET contracts verbatim; there is no additional schema.
/// Column lineage is included only for assets it was actually resolved for
/// (i.e. nodes the user expanded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageSnapshot {
    pub asset_id: AssetId,
    pub exported_at: DateTime<Utc>,
    pub lineage: LineageResponse,
    pub column_lineage: Vec<AssetColumnLineage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetColumnLineage {
    pub asset_id: AssetId,
    pub columns: ColumnLineageResponse,
}

impl LineageSnapshot {
    pub fn capture(
        asset_id: AssetId,
        lineage: LineageResponse,
        column_lineage: Vec<(AssetId, ColumnLineageResponse)>,
    ) -> Self {
        Self {
            asset_id,
            exported_at: Utc::now(),
            lineage,
            column_lineage: column_lineage
                .into_iter()
                .map(|(asset_id, columns)| AssetColumnLineage { asset_id, columns })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, ApiError> {
        serde_json::to_string_pretty(self).map_err(|e| ApiError::internal(e.to_string()))
    }
}
