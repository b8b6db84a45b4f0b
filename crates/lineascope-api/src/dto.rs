use crate::errors::ApiError;
use lineascope_core as core;
use lineascope_core::{
    AssetId, AssetType, ColumnInfo, LineageDirection, MappingDirection, RelationshipKind,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageRequest {
    pub asset_id: String,
    pub direction: LineageDirection,
    pub depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageNodeDto {
    pub id: String,
    pub name: String,
    pub asset_type: AssetType,
    pub source: String,
    pub level: i32,
    pub is_target: bool,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

impl LineageNodeDto {
    pub fn to_core(&self) -> Result<core::LineageNode, ApiError> {
        let id = self.id.trim();
        if id.is_empty() {
            return Err(ApiError::invalid_argument("lineage node with empty id"));
        }
        Ok(core::LineageNode {
            id: AssetId::new(id),
            name: self.name.clone(),
            asset_type: self.asset_type,
            source: self.source.clone(),
            level: self.level,
            is_target: self.is_target,
            columns: self.columns.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageEdgeDto {
    pub source: String,
    pub target: String,
    pub relationship_kind: RelationshipKind,
    pub confidence: f32,
}

impl LineageEdgeDto {
    pub fn to_core(&self) -> Result<core::LineageEdge, ApiError> {
        let source = self.source.trim();
        let target = self.target.trim();
        if source.is_empty() || target.is_empty() {
            return Err(ApiError::invalid_argument("lineage edge with empty endpoint"));
        }
        Ok(core::LineageEdge {
            source: AssetId::new(source),
            target: AssetId::new(target),
            kind: self.relationship_kind,
            confidence: core::clamp_confidence(self.confidence),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineageResponse {
    pub nodes: Vec<LineageNodeDto>,
    pub edges: Vec<LineageEdgeDto>,
}

impl LineageResponse {
    /// Convert the wire response into core nodes and edges.
    ///
    /// Malformed entries fail the whole conversion; dangling edge
    /// references are a graph-model concern, not a wire concern, and pass
    /// through untouched.
    pub fn to_core(&self) -> Result<(Vec<core::LineageNode>, Vec<core::LineageEdge>), ApiError> {
        let nodes = self
            .nodes
            .iter()
            .map(LineageNodeDto::to_core)
            .collect::<Result<Vec<_>, _>>()?;
        let edges = self
            .edges
            .iter()
            .map(LineageEdgeDto::to_core)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((nodes, edges))
    }
}

/// One side of a column mapping as reported by the column-lineage endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRefDto {
    pub asset: String,
    pub column: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnLineageDto {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub upstream_columns: Vec<ColumnRefDto>,
    #[serde(default)]
    pub downstream_columns: Vec<ColumnRefDto>,
    #[serde(default)]
    pub transformations: Vec<String>,
}

impl ColumnLineageDto {
    /// Resolve this column from the perspective of the asset that owns it.
    ///
    /// The owning asset is always the mapping source; `direction` records
    /// which way the data flows relative to it.
    pub fn to_resolved(&self, owner: &AssetId) -> core::ResolvedColumn {
        let to_mapping = |entry: &ColumnRefDto, direction: MappingDirection| core::ColumnMapping {
            source_asset: owner.clone(),
            source_column: self.name.clone(),
            target_asset: AssetId::new(entry.asset.trim()),
            target_column: entry.column.clone(),
            direction,
            confidence: core::clamp_confidence(entry.confidence),
            transformations: self.transformations.clone(),
        };

        core::ResolvedColumn {
            name: self.name.clone(),
            data_type: self.data_type.clone(),
            description: self.description.clone(),
            upstream: self
                .upstream_columns
                .iter()
                .map(|entry| to_mapping(entry, MappingDirection::Upstream))
                .collect(),
            downstream: self
                .downstream_columns
                .iter()
                .map(|entry| to_mapping(entry, MappingDirection::Downstream))
                .collect(),
            transformations: self.transformations.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnLineageResponse {
    pub columns: Vec<ColumnLineageDto>,
}

impl ColumnLineageResponse {
    pub fn to_resolved(&self, owner: &AssetId) -> Vec<core::ResolvedColumn> {
        self.columns
            .iter()
            .map(|column| column.to_resolved(owner))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRelationshipRequest {
    pub source: String,
    pub target: String,
    pub relationship: RelationshipKind,
    pub confidence: f32,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRelationshipResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRelationshipResponse {
    pub acknowledged: bool,
}
