use crate::column_router::{ColumnRouter, ConnectionKey, ConnectionSet};
use crate::graph::{EdgeIndex, GraphModel, Vec2};
use crate::hit_tester::{HitTarget, HitTester};
use crate::layout::{LayeredLayouter, Layouter};
use crate::panel::{ColumnPanel, Rect};
use crate::view_state::{GraphViewState, NodeView};
use lineascope_core::{AssetId, LineageDirection, LineageError, MappingDirection, ResolvedColumn};
use lineascope_events::{Event, NoticeLevel};
use std::collections::HashMap;

/// Side effects the controller asks its host to perform.
///
/// The engine never does I/O itself: fetch commands are completed by the
/// host publishing `ColumnDataLoaded` / `LineageLoaded` events back into
/// the queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchLineage {
        asset_id: AssetId,
        direction: LineageDirection,
        depth: u32,
    },
    FetchColumnLineage {
        asset_id: AssetId,
        generation: u64,
    },
    CreateRelationship {
        source: AssetId,
        target: AssetId,
    },
    Notify {
        level: NoticeLevel,
        message: String,
    },
    ShowMappingDetails(MappingDetails),
}

/// Details surfaced when a connection curve (or its anchor) is clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingDetails {
    pub from_asset: AssetId,
    pub from_column: String,
    pub to_asset: AssetId,
    pub to_column: String,
    pub direction: MappingDirection,
    pub confidence_percent: u32,
    pub transformations: Vec<String>,
}

#[derive(Debug, Clone)]
struct DragSession {
    asset_id: AssetId,
    anchor_pos: Vec2,
    pointer_anchor: Vec2,
}

/// The interaction state machine.
///
/// Owns the graph model and every piece of view state; consumes events in
/// order and returns the commands they produce. All mutation happens on
/// the thread that drains the event queue -- there is no shared-memory
/// concurrency in the engine.
pub struct GraphController {
    model: GraphModel,
    view: GraphViewState,
    panels: HashMap<AssetId, ColumnPanel>,
    connections: ConnectionSet,
    /// Cached node-level edge segments, updated incrementally on drag.
    edge_lines: HashMap<EdgeIndex, (Vec2, Vec2)>,
    layouter: LayeredLayouter,
    router: ColumnRouter,
    hit: HitTester,
    drag: Option<DragSession>,
    edit_mode: bool,
    edit_source: Option<AssetId>,
    hovered: HitTarget,
    bounds: Rect,
}

impl GraphController {
    pub fn new(canvas: Rect) -> Self {
        Self {
            model: GraphModel::new(),
            view: GraphViewState::new(),
            panels: HashMap::new(),
            connections: ConnectionSet::new(),
            edge_lines: HashMap::new(),
            layouter: LayeredLayouter::new(canvas),
            router: ColumnRouter::new(),
            hit: HitTester::new(),
            drag: None,
            edit_mode: false,
            edit_source: None,
            hovered: HitTarget::None,
            bounds: canvas,
        }
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn view(&self) -> &GraphViewState {
        &self.view
    }

    pub fn panels(&self) -> &HashMap<AssetId, ColumnPanel> {
        &self.panels
    }

    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    pub fn edge_lines(&self) -> &HashMap<EdgeIndex, (Vec2, Vec2)> {
        &self.edge_lines
    }

    pub fn hovered(&self) -> &HitTarget {
        &self.hovered
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn edit_source(&self) -> Option<&AssetId> {
        self.edit_source.as_ref()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Widen or narrow the area node positions are clamped into.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.view.set_zoom(zoom);
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.view.set_pan(pan);
    }

    /// Consume one event, mutate state, and return the commands it caused.
    pub fn handle_event(&mut self, event: &Event) -> Vec<Command> {
        match event {
            Event::SelectAsset {
                id,
                direction,
                depth,
            } => vec![Command::FetchLineage {
                asset_id: id.clone(),
                direction: *direction,
                depth: *depth,
            }],
            Event::ClearGraph => {
                self.clear_all();
                vec![]
            }
            Event::LineageLoaded { nodes, edges } => {
                self.on_lineage_loaded(nodes.clone(), edges.clone())
            }
            Event::LineageFailed { error } => vec![Command::Notify {
                level: NoticeLevel::Error,
                message: LineageError::FetchFailure(error.clone()).to_string(),
            }],
            Event::ExpandNode { id } => self.expand_node(id),
            Event::CollapseNode { id } => self.collapse_node(id),
            Event::ColumnDataLoaded {
                asset_id,
                generation,
                columns,
            } => self.on_columns_loaded(asset_id, *generation, columns),
            Event::ColumnDataFailed {
                asset_id,
                generation,
                error,
            } => self.on_columns_failed(asset_id, *generation, error),
            Event::EditMode { enabled } => {
                self.set_edit_mode(*enabled);
                vec![]
            }
            Event::PointerDown { x, y } => self.pointer_down(Vec2::new(*x, *y)),
            Event::PointerMove { x, y } => self.pointer_move(Vec2::new(*x, *y)),
            Event::PointerUp { .. } => self.pointer_up(),
            Event::Click { x, y } => self.click(Vec2::new(*x, *y)),
            Event::RelationshipCreated { id } => vec![Command::Notify {
                level: NoticeLevel::Info,
                message: format!("Relationship {id} created"),
            }],
            Event::RelationshipDeleted { id } => vec![Command::Notify {
                level: NoticeLevel::Info,
                message: format!("Relationship {id} deleted"),
            }],
            // Viewport and notification events are consumed by the render
            // host, not the controller.
            Event::FitToContent | Event::ShowNotice { .. } => vec![],
        }
    }

    fn clear_all(&mut self) {
        self.model = GraphModel::new();
        self.view.reset();
        self.panels.clear();
        self.connections.clear();
        self.edge_lines.clear();
        self.drag = None;
        self.edit_source = None;
        self.hovered = HitTarget::None;
        self.refresh_hit_tester();
    }

    /// Full replace: a fresh lineage result discards the old model together
    /// with all view state.
    fn on_lineage_loaded(
        &mut self,
        nodes: Vec<lineascope_core::LineageNode>,
        edges: Vec<lineascope_core::LineageEdge>,
    ) -> Vec<Command> {
        let (model, report) = GraphModel::build(nodes, edges);
        if !report.is_clean() {
            tracing::warn!(
                "Lineage graph built with issues: {} dropped edges, {} self-loops, {} duplicates, {} targets",
                report.dropped_edges.len(),
                report.self_loops,
                report.duplicate_nodes,
                report.target_count
            );
        }

        self.model = model;
        self.view.reset();
        self.panels.clear();
        self.connections.clear();
        self.edge_lines.clear();
        self.drag = None;
        self.edit_source = None;
        self.hovered = HitTarget::None;

        if self.model.is_empty() {
            // A state, not an error: the render adapter shows the placeholder.
            tracing::info!("{}", LineageError::EmptyGraph);
        }

        let layout = self.layouter.execute(&self.model);
        self.view.seed_positions(&self.model, &layout);
        self.rebuild_edge_lines();
        self.refresh_hit_tester();
        vec![]
    }

    fn expand_node(&mut self, id: &AssetId) -> Vec<Command> {
        if self.edit_mode {
            return vec![];
        }
        let Some(node) = self.model.node_by_id(id) else {
            tracing::warn!("Expand requested for unknown asset {}", id);
            return vec![];
        };
        if self.view.is_pending(id) || self.view.is_expanded(id) {
            // A pending node ignores further expand requests for itself.
            return vec![];
        }
        if node.columns.is_empty() {
            return vec![Command::Notify {
                level: NoticeLevel::Info,
                message: LineageError::NoColumnData(node.id.clone()).to_string(),
            }];
        }

        let columns = node.columns.clone();
        let center = self.view.position(id).unwrap_or_else(|| self.bounds.center());
        let panel = ColumnPanel::build(id.clone(), center, &columns);

        let generation = self.view.bump_generation(id);
        self.view.set_pending(id.clone());
        self.view.set_node_view(id.clone(), NodeView::Expanded);
        self.panels.insert(id.clone(), panel);
        self.refresh_hit_tester();

        vec![Command::FetchColumnLineage {
            asset_id: id.clone(),
            generation,
        }]
    }

    fn collapse_node(&mut self, id: &AssetId) -> Vec<Command> {
        if !self.view.is_expanded(id) && !self.view.is_pending(id) {
            return vec![];
        }
        // Bumping the generation turns any in-flight column fetch into a
        // stale response that will be discarded on arrival.
        self.view.bump_generation(id);
        self.view.clear_pending(id);
        self.view.set_node_view(id.clone(), NodeView::Collapsed);
        self.view.remove_columns(id);
        self.panels.remove(id);
        let removed = self.connections.remove_touching(id);
        tracing::debug!("Collapsed {}, removed {} column connections", id, removed);
        self.refresh_hit_tester();
        vec![]
    }

    fn on_columns_loaded(
        &mut self,
        id: &AssetId,
        generation: u64,
        columns: &[ResolvedColumn],
    ) -> Vec<Command> {
        if generation != self.view.generation(id) {
            tracing::debug!(
                "Discarding stale column data for {} (generation {} != {})",
                id,
                generation,
                self.view.generation(id)
            );
            return vec![];
        }
        if !self.view.is_expanded(id) {
            tracing::debug!("Column data for {} arrived after collapse, discarding", id);
            return vec![];
        }

        self.view.clear_pending(id);
        self.view.set_columns(id.clone(), columns.to_vec());
        self.route_all_expanded();
        self.refresh_hit_tester();
        vec![]
    }

    fn on_columns_failed(&mut self, id: &AssetId, generation: u64, error: &str) -> Vec<Command> {
        if generation != self.view.generation(id) {
            return vec![];
        }
        // Revert to the state before the expand; the user can retry.
        self.view.clear_pending(id);
        self.view.set_node_view(id.clone(), NodeView::Collapsed);
        self.panels.remove(id);
        self.refresh_hit_tester();
        vec![Command::Notify {
            level: NoticeLevel::Error,
            message: LineageError::FetchFailure(format!("column lineage for {id}: {error}"))
                .to_string(),
        }]
    }

    /// Re-route every expanded node's stored mappings. Called when a new
    /// panel appears so existing nodes pick up connections into it; the
    /// canonical curve key makes repeated routing idempotent.
    fn route_all_expanded(&mut self) {
        let resolved: Vec<(AssetId, Vec<ResolvedColumn>)> = self
            .view
            .resolved_columns()
            .map(|(id, cols)| (id.clone(), cols.to_vec()))
            .collect();
        for (owner, columns) in &resolved {
            if !self.view.is_expanded(owner) {
                continue;
            }
            self.router
                .route_node(&self.model, owner, columns, &self.panels, &mut self.connections);
        }
    }

    fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode = enabled;
        self.edit_source = None;
        self.drag = None;
    }

    fn pointer_down(&mut self, pos: Vec2) -> Vec<Command> {
        if self.edit_mode {
            return vec![];
        }
        let asset = match self.hit.hit_test(pos) {
            HitTarget::Node(id) => Some(id),
            HitTarget::Column { asset_id, .. } => Some(asset_id),
            _ => None,
        };
        if let Some(asset_id) = asset
            && let Some(anchor_pos) = self.view.position(&asset_id)
        {
            self.drag = Some(DragSession {
                asset_id,
                anchor_pos,
                pointer_anchor: pos,
            });
        }
        vec![]
    }

    fn pointer_move(&mut self, pos: Vec2) -> Vec<Command> {
        if let Some(session) = self.drag.clone() {
            let delta = pos - session.pointer_anchor;
            let new_pos = self.bounds.clamp_point(session.anchor_pos + delta);
            self.move_node(&session.asset_id, new_pos);
        } else {
            self.hovered = self.hit.hit_test(pos);
        }
        vec![]
    }

    fn pointer_up(&mut self) -> Vec<Command> {
        if self.drag.take().is_some() {
            self.refresh_hit_tester();
        }
        vec![]
    }

    /// Move one node and incrementally update exactly the geometry that
    /// touches it -- cost is proportional to the node's degree, never a
    /// full re-layout.
    fn move_node(&mut self, id: &AssetId, new_pos: Vec2) {
        let Some(old) = self.view.position(id) else {
            return;
        };
        let diff = new_pos - old;
        if diff.x == 0.0 && diff.y == 0.0 {
            return;
        }

        self.view.set_position(id.clone(), new_pos);
        if let Some(panel) = self.panels.get_mut(id) {
            panel.translate(diff);
        }

        for &edge_idx in self.model.edges_touching(id) {
            let edge = &self.model.graph[edge_idx];
            if let (Some(from), Some(to)) = (
                self.view.position(&edge.source),
                self.view.position(&edge.target),
            ) {
                self.edge_lines.insert(edge_idx, (from, to));
            }
        }

        self.connections
            .reroute_touching(id, &self.panels, &self.router);
    }

    fn click(&mut self, pos: Vec2) -> Vec<Command> {
        let target = self.hit.hit_test(pos);

        if self.edit_mode {
            return match target {
                HitTarget::Node(id) | HitTarget::Column { asset_id: id, .. } => {
                    self.edit_click(id)
                }
                _ => vec![],
            };
        }

        match target {
            HitTarget::Node(id) => {
                if self.view.is_expanded(&id) {
                    self.collapse_node(&id)
                } else {
                    self.expand_node(&id)
                }
            }
            HitTarget::Curve(key) => self.mapping_details(&key),
            HitTarget::Anchor {
                asset_id, column, ..
            } => {
                let key = self
                    .connections
                    .curves()
                    .iter()
                    .find(|curve| {
                        (curve.key.from_asset == asset_id && curve.key.from_column == column)
                            || (curve.key.to_asset == asset_id && curve.key.to_column == column)
                    })
                    .map(|curve| curve.key.clone());
                match key {
                    Some(key) => self.mapping_details(&key),
                    None => vec![],
                }
            }
            _ => vec![],
        }
    }

    /// First click selects the relationship source, a second click on a
    /// different node completes the pair, clicking the source again
    /// deselects it.
    fn edit_click(&mut self, id: AssetId) -> Vec<Command> {
        match self.edit_source.take() {
            None => {
                self.edit_source = Some(id);
                vec![]
            }
            Some(source) if source == id => vec![],
            Some(source) => vec![Command::CreateRelationship { source, target: id }],
        }
    }

    fn mapping_details(&self, key: &ConnectionKey) -> Vec<Command> {
        let Some(curve) = self.connections.find(key) else {
            return vec![];
        };
        vec![Command::ShowMappingDetails(MappingDetails {
            from_asset: key.from_asset.clone(),
            from_column: key.from_column.clone(),
            to_asset: key.to_asset.clone(),
            to_column: key.to_column.clone(),
            direction: curve.direction,
            confidence_percent: (curve.confidence * 100.0).round() as u32,
            transformations: curve.transformations.clone(),
        })]
    }

    fn rebuild_edge_lines(&mut self) {
        self.edge_lines.clear();
        for edge_idx in self.model.graph.edge_indices() {
            let edge = &self.model.graph[edge_idx];
            if let (Some(from), Some(to)) = (
                self.view.position(&edge.source),
                self.view.position(&edge.target),
            ) {
                self.edge_lines.insert(edge_idx, (from, to));
            }
        }
    }

    fn refresh_hit_tester(&mut self) {
        let glyphs: HashMap<AssetId, Vec2> = self
            .model
            .all_nodes()
            .filter(|node| !self.view.is_expanded(&node.id))
            .filter_map(|node| self.view.position(&node.id).map(|pos| (node.id.clone(), pos)))
            .collect();
        self.hit.update(&glyphs, &self.panels, &self.connections);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineascope_core::{
        AssetType, ColumnInfo, ColumnMapping, LineageEdge, LineageNode, RelationshipKind,
    };

    fn canvas() -> Rect {
        Rect::from_min_max(Vec2::new(0.0, 0.0), Vec2::new(1200.0, 800.0))
    }

    fn node(id: &str, level: i32, column_names: &[&str]) -> LineageNode {
        LineageNode {
            id: AssetId::new(id),
            name: id.to_string(),
            asset_type: AssetType::TABLE,
            source: "postgres".to_string(),
            level,
            is_target: level == 0,
            columns: column_names
                .iter()
                .map(|name| ColumnInfo {
                    name: name.to_string(),
                    data_type: "text".to_string(),
                })
                .collect(),
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

    fn resolved(owner: &str, name: &str, downstream_to: &[(&str, &str)]) -> ResolvedColumn {
        ResolvedColumn {
            name: name.to_string(),
            data_type: "text".to_string(),
            description: None,
            upstream: vec![],
            downstream: downstream_to
                .iter()
                .map(|(asset, column)| ColumnMapping {
                    source_asset: AssetId::new(owner),
                    source_column: name.to_string(),
                    target_asset: AssetId::new(*asset),
                    target_column: column.to_string(),
                    direction: MappingDirection::Downstream,
                    confidence: 0.9,
                    transformations: vec![],
                })
                .collect(),
            transformations: vec![],
        }
    }

    fn loaded_controller(nodes: Vec<LineageNode>, edges: Vec<LineageEdge>) -> GraphController {
        let mut controller = GraphController::new(canvas());
        controller.handle_event(&Event::LineageLoaded { nodes, edges });
        controller
    }

    fn expand(controller: &mut GraphController, id: &str) -> u64 {
        let commands = controller.handle_event(&Event::ExpandNode {
            id: AssetId::new(id),
        });
        match commands.as_slice() {
            [Command::FetchColumnLineage { generation, .. }] => *generation,
            other => panic!("Expected a fetch command, got {other:?}"),
        }
    }

    fn load_columns(
        controller: &mut GraphController,
        id: &str,
        generation: u64,
        columns: Vec<ResolvedColumn>,
    ) {
        controller.handle_event(&Event::ColumnDataLoaded {
            asset_id: AssetId::new(id),
            generation,
            columns,
        });
    }

    #[test]
    fn test_expand_with_no_columns_is_rejected() {
        let mut controller = loaded_controller(vec![node("a", 0, &[])], vec![]);

        let commands = controller.handle_event(&Event::ExpandNode {
            id: AssetId::new("a"),
        });

        assert_eq!(
            controller.view().node_view(&AssetId::new("a")),
            NodeView::Collapsed
        );
        match commands.as_slice() {
            [Command::Notify { level, message }] => {
                assert_eq!(*level, NoticeLevel::Info);
                assert!(message.contains("no column data"));
            }
            other => panic!("Expected a notice, got {other:?}"),
        }
    }

    #[test]
    fn test_expand_emits_fetch_and_ignores_repeats_while_pending() {
        let mut controller = loaded_controller(vec![node("a", 0, &["id"])], vec![]);

        let generation = expand(&mut controller, "a");
        assert_eq!(generation, 1);
        assert!(controller.view().is_pending(&AssetId::new("a")));
        assert!(controller.view().is_expanded(&AssetId::new("a")));

        // A second expand while pending is ignored.
        let commands = controller.handle_event(&Event::ExpandNode {
            id: AssetId::new("a"),
        });
        assert!(commands.is_empty());
    }

    #[test]
    fn test_collapse_before_load_discards_stale_response() {
        let mut controller = loaded_controller(
            vec![node("a", 0, &["id"]), node("b", 1, &["id"])],
            vec![edge("a", "b")],
        );

        let generation = expand(&mut controller, "a");
        controller.handle_event(&Event::CollapseNode {
            id: AssetId::new("a"),
        });

        // The stale response arrives after the collapse.
        load_columns(
            &mut controller,
            "a",
            generation,
            vec![resolved("a", "id", &[("b", "id")])],
        );

        assert_eq!(
            controller.view().node_view(&AssetId::new("a")),
            NodeView::Collapsed
        );
        assert!(controller.panels().is_empty());
        assert!(controller.connections().is_empty());
    }

    #[test]
    fn test_three_matching_columns_make_three_downstream_curves() {
        let cols = ["order_id", "amount", "created_at"];
        let mut controller = loaded_controller(
            vec![node("a", 0, &cols), node("b", 1, &cols)],
            vec![edge("a", "b")],
        );

        let gen_a = expand(&mut controller, "a");
        let a_columns: Vec<_> = cols.iter().map(|c| resolved("a", c, &[("b", c)])).collect();
        load_columns(&mut controller, "a", gen_a, a_columns);
        // b not yet expanded: nothing to connect to.
        assert!(controller.connections().is_empty());

        let gen_b = expand(&mut controller, "b");
        load_columns(&mut controller, "b", gen_b, cols.iter().map(|c| resolved("b", c, &[])).collect());

        assert_eq!(controller.connections().len(), 3);
        for curve in controller.connections().curves() {
            assert_eq!(curve.direction, MappingDirection::Downstream);
        }
    }

    #[test]
    fn test_collapse_removes_only_touching_curves() {
        let mut controller = loaded_controller(
            vec![
                node("a", 0, &["id"]),
                node("b", 1, &["id"]),
                node("c", 1, &["id"]),
            ],
            vec![edge("a", "b"), edge("b", "c")],
        );

        for id in ["a", "b", "c"] {
            let generation = expand(&mut controller, id);
            let mappings: Vec<(&str, &str)> = match id {
                "a" => vec![("b", "id")],
                "b" => vec![("c", "id")],
                _ => vec![],
            };
            load_columns(
                &mut controller,
                id,
                generation,
                vec![resolved(id, "id", &mappings)],
            );
        }
        assert_eq!(controller.connections().len(), 2);

        let b_to_c = controller
            .connections()
            .curves_touching(&AssetId::new("c"))
            .next()
            .cloned()
            .unwrap();

        controller.handle_event(&Event::CollapseNode {
            id: AssetId::new("a"),
        });

        assert_eq!(controller.connections().len(), 1);
        assert_eq!(controller.connections().curves()[0], b_to_c);
        assert!(controller
            .connections()
            .curves_touching(&AssetId::new("a"))
            .next()
            .is_none());
    }

    #[test]
    fn test_drag_updates_only_touching_geometry() {
        let mut controller = loaded_controller(
            vec![
                node("a", 0, &["id"]),
                node("b", 1, &["id"]),
                node("c", -1, &["id"]),
                node("d", 1, &["id"]),
            ],
            vec![edge("a", "b"), edge("c", "d")],
        );

        let cd_idx = controller
            .model()
            .edges_touching(&AssetId::new("c"))
            .first()
            .copied()
            .unwrap();
        let cd_before = controller.edge_lines()[&cd_idx];
        let a_before = controller.view().position(&AssetId::new("a")).unwrap();

        // Drag a by (50, -30).
        controller.handle_event(&Event::PointerDown {
            x: a_before.x,
            y: a_before.y,
        });
        controller.handle_event(&Event::PointerMove {
            x: a_before.x + 50.0,
            y: a_before.y - 30.0,
        });
        controller.handle_event(&Event::PointerUp {
            x: a_before.x + 50.0,
            y: a_before.y - 30.0,
        });

        let a_after = controller.view().position(&AssetId::new("a")).unwrap();
        assert_eq!(a_after, a_before + Vec2::new(50.0, -30.0));

        // The unrelated c->d edge is bit-identical.
        assert_eq!(controller.edge_lines()[&cd_idx], cd_before);

        // The a->b edge follows the new position.
        let ab_idx = controller
            .model()
            .edges_touching(&AssetId::new("a"))
            .first()
            .copied()
            .unwrap();
        assert_eq!(controller.edge_lines()[&ab_idx].0, a_after);
    }

    #[test]
    fn test_drag_is_clamped_to_bounds() {
        let mut controller = loaded_controller(vec![node("a", 0, &["id"])], vec![]);
        let start = controller.view().position(&AssetId::new("a")).unwrap();

        controller.handle_event(&Event::PointerDown { x: start.x, y: start.y });
        controller.handle_event(&Event::PointerMove {
            x: start.x + 100_000.0,
            y: start.y + 100_000.0,
        });

        let pos = controller.view().position(&AssetId::new("a")).unwrap();
        assert_eq!(pos, canvas().max);
    }

    #[test]
    fn test_edit_mode_pairs_source_and_target() {
        let mut controller = loaded_controller(
            vec![node("a", 0, &["id"]), node("b", 1, &["id"])],
            vec![edge("a", "b")],
        );
        controller.handle_event(&Event::EditMode { enabled: true });

        let a_pos = controller.view().position(&AssetId::new("a")).unwrap();
        let b_pos = controller.view().position(&AssetId::new("b")).unwrap();

        // First click selects the source; expand must not trigger.
        let commands = controller.handle_event(&Event::Click { x: a_pos.x, y: a_pos.y });
        assert!(commands.is_empty());
        assert_eq!(controller.edit_source(), Some(&AssetId::new("a")));
        assert!(!controller.view().is_expanded(&AssetId::new("a")));

        // Second click on a different node yields the pending pair.
        let commands = controller.handle_event(&Event::Click { x: b_pos.x, y: b_pos.y });
        assert_eq!(
            commands,
            vec![Command::CreateRelationship {
                source: AssetId::new("a"),
                target: AssetId::new("b"),
            }]
        );
        assert_eq!(controller.edit_source(), None);
    }

    #[test]
    fn test_edit_mode_same_node_click_deselects() {
        let mut controller = loaded_controller(vec![node("a", 0, &["id"])], vec![]);
        controller.handle_event(&Event::EditMode { enabled: true });
        let a_pos = controller.view().position(&AssetId::new("a")).unwrap();

        controller.handle_event(&Event::Click { x: a_pos.x, y: a_pos.y });
        assert_eq!(controller.edit_source(), Some(&AssetId::new("a")));

        let commands = controller.handle_event(&Event::Click { x: a_pos.x, y: a_pos.y });
        assert!(commands.is_empty());
        assert_eq!(controller.edit_source(), None);
    }

    #[test]
    fn test_fetch_failure_reverts_and_notifies() {
        let mut controller = loaded_controller(vec![node("a", 0, &["id"])], vec![]);
        let generation = expand(&mut controller, "a");

        let commands = controller.handle_event(&Event::ColumnDataFailed {
            asset_id: AssetId::new("a"),
            generation,
            error: "backend unavailable".to_string(),
        });

        assert_eq!(
            controller.view().node_view(&AssetId::new("a")),
            NodeView::Collapsed
        );
        match commands.as_slice() {
            [Command::Notify { level, message }] => {
                assert_eq!(*level, NoticeLevel::Error);
                assert!(message.contains("backend unavailable"));
            }
            other => panic!("Expected an error notice, got {other:?}"),
        }

        // Retry works: a fresh expand issues a new generation.
        let retry_generation = expand(&mut controller, "a");
        assert!(retry_generation > generation);
    }

    #[test]
    fn test_select_asset_emits_fetch_and_keeps_state() {
        let mut controller = loaded_controller(vec![node("a", 0, &["id"])], vec![]);

        let commands = controller.handle_event(&Event::SelectAsset {
            id: AssetId::new("dw.other"),
            direction: LineageDirection::Both,
            depth: 3,
        });

        assert_eq!(
            commands,
            vec![Command::FetchLineage {
                asset_id: AssetId::new("dw.other"),
                direction: LineageDirection::Both,
                depth: 3,
            }]
        );
        // Prior graph survives until the new result replaces it.
        assert_eq!(controller.model().node_count(), 1);
    }

    #[test]
    fn test_click_on_curve_surfaces_mapping_details() {
        let mut controller = loaded_controller(
            vec![node("a", 0, &["id"]), node("b", 1, &["id"])],
            vec![edge("a", "b")],
        );

        let gen_a = expand(&mut controller, "a");
        load_columns(
            &mut controller,
            "a",
            gen_a,
            vec![resolved("a", "id", &[("b", "id")])],
        );
        let gen_b = expand(&mut controller, "b");
        load_columns(&mut controller, "b", gen_b, vec![resolved("b", "id", &[])]);
        assert_eq!(controller.connections().len(), 1);

        let midpoint = controller.connections().curves()[0].curve.sample(0.5);
        let commands = controller.handle_event(&Event::Click {
            x: midpoint.x,
            y: midpoint.y,
        });

        match commands.as_slice() {
            [Command::ShowMappingDetails(details)] => {
                assert_eq!(details.from_asset, AssetId::new("a"));
                assert_eq!(details.to_asset, AssetId::new("b"));
                assert_eq!(details.confidence_percent, 90);
            }
            other => panic!("Expected mapping details, got {other:?}"),
        }
    }
}
