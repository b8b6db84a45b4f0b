use lineascope_core::{AssetId, LineageEdge, LineageError, LineageNode, RelationshipKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Index, IndexMut, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(pub usize);

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeIndex(pub usize);

impl fmt::Display for EdgeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An edge stored in the graph arena, with its endpoint indices resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: AssetId,
    pub target: AssetId,
    pub kind: RelationshipKind,
    pub confidence: f32,
    pub source_idx: NodeIndex,
    pub target_idx: NodeIndex,
}

#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<LineageNode>,
    edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: LineageNode) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len());
        self.nodes.push(node);
        idx
    }

    pub fn add_edge(&mut self, edge: GraphEdge) -> EdgeIndex {
        let idx = EdgeIndex(self.edges.len());
        self.edges.push(edge);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn edge_indices(&self) -> impl Iterator<Item = EdgeIndex> {
        (0..self.edges.len()).map(EdgeIndex)
    }

    pub fn edge_endpoints(&self, index: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.edges
            .get(index.0)
            .map(|e| (e.source_idx, e.target_idx))
    }

    pub fn node_weight(&self, index: NodeIndex) -> Option<&LineageNode> {
        self.nodes.get(index.0)
    }

    pub fn edge_weight(&self, index: EdgeIndex) -> Option<&GraphEdge> {
        self.edges.get(index.0)
    }
}

impl Index<NodeIndex> for Graph {
    type Output = LineageNode;
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl IndexMut<NodeIndex> for Graph {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}

impl Index<EdgeIndex> for Graph {
    type Output = GraphEdge;
    fn index(&self, index: EdgeIndex) -> &Self::Output {
        &self.edges[index.0]
    }
}

impl IndexMut<EdgeIndex> for Graph {
    fn index_mut(&mut self, index: EdgeIndex) -> &mut Self::Output {
        &mut self.edges[index.0]
    }
}

/// Everything the build dropped or found suspicious, reported instead of
/// thrown. Dropped edges keep the graph usable; the caller decides whether
/// the report is worth surfacing.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub dropped_edges: Vec<LineageError>,
    pub self_loops: usize,
    pub duplicate_nodes: usize,
    pub target_count: usize,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_edges.is_empty()
            && self.self_loops == 0
            && self.duplicate_nodes == 0
            && self.target_count == 1
    }
}

/// The lineage graph for one query result.
///
/// Constructed fresh on every lineage response (full replace, never an
/// incremental merge) and discarded when a different asset is selected or
/// the view is cleared.
#[derive(Debug, Default)]
pub struct GraphModel {
    pub graph: Graph,
    node_map: HashMap<AssetId, NodeIndex>,
    touching: HashMap<NodeIndex, Vec<EdgeIndex>>,
    target: Option<AssetId>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from a lineage query result.
    ///
    /// Never panics across this boundary: edges referencing unknown nodes
    /// and self-loops are dropped, counted in the report, and logged.
    pub fn build(nodes: Vec<LineageNode>, edges: Vec<LineageEdge>) -> (Self, BuildReport) {
        let mut model = Self::new();
        let mut report = BuildReport::default();

        for node in nodes {
            if model.node_map.contains_key(&node.id) {
                tracing::warn!("Duplicate lineage node {} dropped", node.id);
                report.duplicate_nodes += 1;
                continue;
            }
            if node.is_target {
                report.target_count += 1;
                if model.target.is_none() {
                    model.target = Some(node.id.clone());
                }
            }
            let id = node.id.clone();
            let idx = model.graph.add_node(node);
            model.node_map.insert(id, idx);
        }

        if report.target_count != 1 {
            tracing::warn!(
                "Lineage result has {} target nodes, expected exactly one",
                report.target_count
            );
        }

        for edge in edges {
            if edge.source == edge.target {
                tracing::warn!("Dropping self-loop edge on {}", edge.source);
                report.self_loops += 1;
                continue;
            }
            let (Some(&source_idx), Some(&target_idx)) = (
                model.node_map.get(&edge.source),
                model.node_map.get(&edge.target),
            ) else {
                tracing::warn!(
                    "Dropping edge {} -> {} because an endpoint is missing from the graph",
                    edge.source,
                    edge.target
                );
                report.dropped_edges.push(LineageError::UnresolvedEdgeReference {
                    source_id: edge.source,
                    target: edge.target,
                });
                continue;
            };

            let edge_idx = model.graph.add_edge(GraphEdge {
                source: edge.source,
                target: edge.target,
                kind: edge.kind,
                confidence: lineascope_core::clamp_confidence(edge.confidence),
                source_idx,
                target_idx,
            });
            model.touching.entry(source_idx).or_default().push(edge_idx);
            model.touching.entry(target_idx).or_default().push(edge_idx);
        }

        (model, report)
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn index_of(&self, id: &AssetId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub fn node_by_id(&self, id: &AssetId) -> Option<&LineageNode> {
        self.node_map.get(id).map(|&idx| &self.graph[idx])
    }

    /// Indices of every edge with `id` as either endpoint.
    pub fn edges_touching(&self, id: &AssetId) -> &[EdgeIndex] {
        self.node_map
            .get(id)
            .and_then(|idx| self.touching.get(idx))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn all_nodes(&self) -> impl Iterator<Item = &LineageNode> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    pub fn all_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.graph.edge_indices().map(|idx| &self.graph[idx])
    }

    /// The focal asset of this lineage query, if the result carried one.
    pub fn target(&self) -> Option<&AssetId> {
        self.target.as_ref()
    }

    /// Match a mapping's asset reference against the nodes in this graph.
    ///
    /// Tries an exact id match, then an exact name match, then a substring
    /// match in either direction. Iteration is in insertion order, so the
    /// first match is deterministic.
    pub fn match_asset(&self, reference: &str) -> Option<&AssetId> {
        if let Some((id, _)) = self.node_map.get_key_value(&AssetId::new(reference)) {
            return Some(id);
        }
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        self.all_nodes()
            .find(|node| node.name == reference)
            .or_else(|| {
                self.all_nodes().find(|node| {
                    node.name.contains(reference) || reference.contains(node.name.as_str())
                })
            })
            .map(|node| &node.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineascope_core::AssetType;

    fn node(id: &str, level: i32, is_target: bool) -> LineageNode {
        LineageNode {
            id: AssetId::new(id),
            name: id.rsplit('.').next().unwrap_or(id).to_string(),
            asset_type: AssetType::TABLE,
            source: "postgres".to_string(),
            level,
            is_target,
            columns: vec![],
        }
    }

    fn edge(source: &str, target: &str) -> LineageEdge {
        LineageEdge {
            source: AssetId::new(source),
            target: AssetId::new(target),
            kind: RelationshipKind::DERIVES_FROM,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_build_resolves_edges() {
        let (model, report) = GraphModel::build(
            vec![node("a", -1, false), node("b", 0, true)],
            vec![edge("a", "b")],
        );

        assert!(report.is_clean());
        assert_eq!(model.node_count(), 2);
        assert_eq!(model.edge_count(), 1);
        assert_eq!(model.target(), Some(&AssetId::new("b")));
        assert_eq!(model.edges_touching(&AssetId::new("a")).len(), 1);
    }

    #[test]
    fn test_build_drops_unresolved_edge_and_reports() {
        let (model, report) = GraphModel::build(
            vec![node("a", 0, true)],
            vec![edge("a", "ghost"), edge("phantom", "a")],
        );

        assert_eq!(model.edge_count(), 0);
        assert_eq!(report.dropped_edges.len(), 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_build_drops_self_loops() {
        let (model, report) =
            GraphModel::build(vec![node("a", 0, true)], vec![edge("a", "a")]);

        assert_eq!(model.edge_count(), 0);
        assert_eq!(report.self_loops, 1);
    }

    #[test]
    fn test_build_keeps_first_target_on_violation() {
        let (model, report) = GraphModel::build(
            vec![node("a", 0, true), node("b", 1, true)],
            vec![],
        );

        assert_eq!(report.target_count, 2);
        assert_eq!(model.target(), Some(&AssetId::new("a")));
    }

    #[test]
    fn test_match_asset_prefers_exact_id() {
        let (model, _) = GraphModel::build(
            vec![node("pg.public.orders", 0, true), node("orders", 1, false)],
            vec![],
        );

        assert_eq!(
            model.match_asset("pg.public.orders"),
            Some(&AssetId::new("pg.public.orders"))
        );
        // "orders" is itself a node id, so the id match wins over any name match.
        assert_eq!(model.match_asset("orders"), Some(&AssetId::new("orders")));
    }

    #[test]
    fn test_match_asset_substring_fallback() {
        let (model, _) = GraphModel::build(vec![node("dw.fact_orders", 0, true)], vec![]);

        assert_eq!(
            model.match_asset("fact_orders_v2"),
            Some(&AssetId::new("dw.fact_orders"))
        );
        assert_eq!(model.match_asset("unrelated"), None);
    }
}
