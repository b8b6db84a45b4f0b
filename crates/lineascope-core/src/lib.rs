use serde::{Deserialize, Serialize};
use std::fmt;

pub mod error;

pub use error::LineageError;

/// Stable identifier of a data asset, assigned by the lineage backend.
///
/// Asset ids are opaque strings (typically `source.schema.name`); the engine
/// never parses them, only compares and displays them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    TABLE,
    VIEW,
    TOPIC,
    DASHBOARD,
    JOB,
    FILE,
    #[serde(other)]
    UNKNOWN,
}

/// Kind of a node-level lineage relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    DERIVES_FROM,
    COPY_OF,
    JOINS,
    AGGREGATES,
    CUSTOM,
    #[serde(other)]
    UNKNOWN,
}

/// Direction of a lineage query relative to the focal asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineageDirection {
    Upstream,
    Downstream,
    Both,
}

/// Direction of a single column mapping relative to the asset that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingDirection {
    Upstream,
    Downstream,
}

/// A column of a data asset as reported by the lineage query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

/// A data asset participating in a lineage graph.
///
/// `level` is the signed distance from the focal asset: 0 is the focal
/// asset, negative levels are upstream, positive are downstream. Levels are
/// assigned by the upstream query and never changed by this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageNode {
    pub id: AssetId,
    pub name: String,
    pub asset_type: AssetType,
    pub source: String,
    pub level: i32,
    pub is_target: bool,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

/// A directed lineage relationship between two assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageEdge {
    pub source: AssetId,
    pub target: AssetId,
    pub kind: RelationshipKind,
    pub confidence: f32,
}

/// A directed, confidence-scored link between a column of one asset and a
/// column of another, from the perspective of the asset that resolved it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source_asset: AssetId,
    pub source_column: String,
    pub target_asset: AssetId,
    pub target_column: String,
    pub direction: MappingDirection,
    pub confidence: f32,
    #[serde(default)]
    pub transformations: Vec<String>,
}

/// One column of an expanded node together with its resolved mapping lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedColumn {
    pub name: String,
    pub data_type: String,
    pub description: Option<String>,
    pub upstream: Vec<ColumnMapping>,
    pub downstream: Vec<ColumnMapping>,
    #[serde(default)]
    pub transformations: Vec<String>,
}

/// Clamp a confidence score into `[0, 1]`.
///
/// Backend confidences are nominally in range already, but styling math
/// must never see values outside it. Non-finite input degrades to 0.
pub fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
