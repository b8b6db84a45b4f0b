use crate::graph::{GraphModel, NodeIndex, Vec2};
use crate::panel::Rect;
use std::collections::{BTreeMap, HashMap};

pub trait Layouter {
    fn execute(&self, model: &GraphModel) -> HashMap<NodeIndex, Vec2>;
}

/// Deterministic level-banded placement.
///
/// Nodes are grouped by their signed level: the focal asset's band sits on
/// the canvas center line, upstream bands above it, downstream bands below.
/// There is no iterative relaxation; re-running on an unchanged node set
/// yields identical coordinates.
pub struct LayeredLayouter {
    pub canvas: Rect,
    pub max_level_spacing: f32,
    pub max_node_spacing: f32,
}

impl LayeredLayouter {
    pub const DEFAULT_MAX_LEVEL_SPACING: f32 = 180.0;
    pub const DEFAULT_MAX_NODE_SPACING: f32 = 220.0;

    pub fn new(canvas: Rect) -> Self {
        Self {
            canvas,
            max_level_spacing: Self::DEFAULT_MAX_LEVEL_SPACING,
            max_node_spacing: Self::DEFAULT_MAX_NODE_SPACING,
        }
    }

    /// Vertical distance between adjacent level bands for a given number of
    /// distinct levels, capped so sparse graphs don't stretch edge-to-edge.
    pub fn level_spacing(&self, level_count: usize) -> f32 {
        (self.canvas.height() / (level_count as f32 + 1.0)).min(self.max_level_spacing)
    }

    fn node_spacing(&self, nodes_in_level: usize) -> f32 {
        (self.canvas.width() / nodes_in_level as f32).min(self.max_node_spacing)
    }

    /// Group node indices by level, levels ascending, insertion order kept
    /// within each level.
    fn levels(model: &GraphModel) -> BTreeMap<i32, Vec<NodeIndex>> {
        let mut levels: BTreeMap<i32, Vec<NodeIndex>> = BTreeMap::new();
        for idx in model.graph.node_indices() {
            levels.entry(model.graph[idx].level).or_default().push(idx);
        }
        levels
    }
}

impl Layouter for LayeredLayouter {
    fn execute(&self, model: &GraphModel) -> HashMap<NodeIndex, Vec2> {
        let mut positions = HashMap::new();
        if model.is_empty() {
            // Empty graph is a state, not an error; the caller renders the
            // placeholder from GraphModel::is_empty.
            return positions;
        }

        let levels = Self::levels(model);
        let level_spacing = self.level_spacing(levels.len());
        let center = self.canvas.center();

        for (&level, nodes) in &levels {
            let y = center.y + level as f32 * level_spacing;
            let node_spacing = self.node_spacing(nodes.len());
            let mid = (nodes.len() as f32 - 1.0) / 2.0;

            for (k, &idx) in nodes.iter().enumerate() {
                let x = center.x + (k as f32 - mid) * node_spacing;
                positions.insert(idx, Vec2::new(x, y));
            }
        }

        positions
    }
}
