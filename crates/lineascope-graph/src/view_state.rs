use crate::graph::{GraphModel, NodeIndex, Vec2};
use lineascope_core::{AssetId, ResolvedColumn};
use std::collections::{HashMap, HashSet};

/// The two view states of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeView {
    #[default]
    Collapsed,
    Expanded,
}

/// All user-driven view state of the graph, in one place.
///
/// This is the only mutable view state in the engine: positions, per-node
/// view states, fetch generations, resolved column data, zoom and pan.
/// Owned and mutated exclusively by the controller; the render adapter
/// only reads it. Reset together with the graph model, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphViewState {
    view_states: HashMap<AssetId, NodeView>,
    positions: HashMap<AssetId, Vec2>,
    /// Monotonically increasing per-node fetch token. A column-lineage
    /// completion is applied only if it carries the node's current value.
    generations: HashMap<AssetId, u64>,
    pending: HashSet<AssetId>,
    columns: HashMap<AssetId, Vec<ResolvedColumn>>,
    pub zoom: f32,
    pub pan: Vec2,
}

impl GraphViewState {
    pub fn new() -> Self {
        Self {
            view_states: HashMap::new(),
            positions: HashMap::new(),
            generations: HashMap::new(),
            pending: HashSet::new(),
            columns: HashMap::new(),
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }

    /// Drop everything. Called whenever the graph model is replaced.
    pub fn reset(&mut self) {
        self.view_states.clear();
        self.positions.clear();
        self.generations.clear();
        self.pending.clear();
        self.columns.clear();
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
    }

    pub fn node_view(&self, id: &AssetId) -> NodeView {
        self.view_states.get(id).copied().unwrap_or_default()
    }

    pub fn set_node_view(&mut self, id: AssetId, view: NodeView) {
        self.view_states.insert(id, view);
    }

    pub fn is_expanded(&self, id: &AssetId) -> bool {
        self.node_view(id) == NodeView::Expanded
    }

    /// Asset ids currently in the Expanded view state, in no particular order.
    pub fn expanded_assets(&self) -> impl Iterator<Item = &AssetId> {
        self.view_states
            .iter()
            .filter(|(_, view)| **view == NodeView::Expanded)
            .map(|(id, _)| id)
    }

    pub fn position(&self, id: &AssetId) -> Option<Vec2> {
        self.positions.get(id).copied()
    }

    pub fn set_position(&mut self, id: AssetId, position: Vec2) {
        self.positions.insert(id, position);
    }

    pub fn positions(&self) -> &HashMap<AssetId, Vec2> {
        &self.positions
    }

    /// Seed positions from a fresh layout, keyed back to asset ids.
    pub fn seed_positions(&mut self, model: &GraphModel, layout: &HashMap<NodeIndex, Vec2>) {
        self.positions.clear();
        for (&idx, &pos) in layout {
            self.positions.insert(model.graph[idx].id.clone(), pos);
        }
    }

    pub fn generation(&self, id: &AssetId) -> u64 {
        self.generations.get(id).copied().unwrap_or(0)
    }

    /// Bump and return the node's generation, invalidating any in-flight
    /// fetch for it.
    pub fn bump_generation(&mut self, id: &AssetId) -> u64 {
        let next = self.generation(id) + 1;
        self.generations.insert(id.clone(), next);
        next
    }

    pub fn is_pending(&self, id: &AssetId) -> bool {
        self.pending.contains(id)
    }

    pub fn set_pending(&mut self, id: AssetId) {
        self.pending.insert(id);
    }

    pub fn clear_pending(&mut self, id: &AssetId) {
        self.pending.remove(id);
    }

    pub fn columns(&self, id: &AssetId) -> Option<&[ResolvedColumn]> {
        self.columns.get(id).map(Vec::as_slice)
    }

    pub fn set_columns(&mut self, id: AssetId, columns: Vec<ResolvedColumn>) {
        self.columns.insert(id, columns);
    }

    pub fn remove_columns(&mut self, id: &AssetId) {
        self.columns.remove(id);
    }

    /// Resolved column data for every expanded asset, for the export
    /// snapshot and re-routing passes.
    pub fn resolved_columns(&self) -> impl Iterator<Item = (&AssetId, &[ResolvedColumn])> {
        self.columns.iter().map(|(id, cols)| (id, cols.as_slice()))
    }

    /// Set the zoom level (clamped to 0.1 - 4.0 range)
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(0.1, 4.0);
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }
}

impl Default for GraphViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_view_is_collapsed() {
        let state = GraphViewState::new();
        assert_eq!(state.node_view(&AssetId::new("a")), NodeView::Collapsed);
        assert!(!state.is_expanded(&AssetId::new("a")));
    }

    #[test]
    fn test_generation_starts_at_zero_and_bumps() {
        let mut state = GraphViewState::new();
        let id = AssetId::new("a");
        assert_eq!(state.generation(&id), 0);
        assert_eq!(state.bump_generation(&id), 1);
        assert_eq!(state.bump_generation(&id), 2);
        assert_eq!(state.generation(&id), 2);
    }

    #[test]
    fn test_reset_clears_everything_together() {
        let mut state = GraphViewState::new();
        let id = AssetId::new("a");
        state.set_node_view(id.clone(), NodeView::Expanded);
        state.set_position(id.clone(), Vec2::new(5.0, 5.0));
        state.bump_generation(&id);
        state.set_pending(id.clone());
        state.set_columns(id.clone(), vec![]);
        state.set_zoom(2.0);

        state.reset();

        assert_eq!(state.node_view(&id), NodeView::Collapsed);
        assert_eq!(state.position(&id), None);
        assert_eq!(state.generation(&id), 0);
        assert!(!state.is_pending(&id));
        assert!(state.columns(&id).is_none());
        assert_eq!(state.zoom, 1.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut state = GraphViewState::new();
        state.set_zoom(9.0);
        assert_eq!(state.zoom, 4.0);
        state.set_zoom(0.0);
        assert_eq!(state.zoom, 0.1);
    }

    #[test]
    fn test_expanded_assets_filters_collapsed() {
        let mut state = GraphViewState::new();
        state.set_node_view(AssetId::new("a"), NodeView::Expanded);
        state.set_node_view(AssetId::new("b"), NodeView::Collapsed);

        let expanded: Vec<_> = state.expanded_assets().collect();
        assert_eq!(expanded, vec![&AssetId::new("a")]);
    }
}
