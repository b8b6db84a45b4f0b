use crate::column_router::{ConnectionKey, ConnectionSet, CubicBezier};
use crate::graph::Vec2;
use crate::panel::{AnchorSide, ColumnPanel, Rect, GLYPH_RADIUS};
use lineascope_core::AssetId;
use std::collections::HashMap;

/// Result of a hit test at a given position.
///
/// Priority order: Anchor > Column > Node > Curve > None
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    /// Nothing was hit at the tested position.
    None,
    /// A collapsed glyph or an expanded panel (but not a specific row).
    Node(AssetId),
    /// A specific column row within an expanded panel.
    Column { asset_id: AssetId, column: String },
    /// A column anchor point on a panel edge.
    Anchor {
        asset_id: AssetId,
        column: String,
        side: AnchorSide,
    },
    /// A column connection curve.
    Curve(ConnectionKey),
}

/// Hit tester over the current visual state of the graph.
///
/// Rebuilt from the controller's state whenever geometry changes; pointer
/// events are resolved against it with the priority ordering above.
#[derive(Debug, Clone)]
pub struct HitTester {
    /// Centers of collapsed node glyphs.
    glyphs: HashMap<AssetId, Vec2>,
    /// Bounding rectangles of expanded panels.
    panel_rects: HashMap<AssetId, Rect>,
    /// Row rectangles per expanded panel, in row order.
    row_rects: HashMap<AssetId, Vec<(String, Rect)>>,
    /// Anchor points for every row of every expanded panel.
    anchors: Vec<(AssetId, String, AnchorSide, Vec2)>,
    /// Curves for distance-based hit testing, in render order.
    curves: Vec<(ConnectionKey, CubicBezier)>,
    /// Tolerance (in canvas units) for curve hit testing.
    curve_tolerance: f32,
    /// Pick radius for anchors.
    anchor_radius: f32,
    /// Number of samples along bezier curves for distance computation.
    bezier_samples: usize,
}

impl Default for HitTester {
    fn default() -> Self {
        Self::new()
    }
}

impl HitTester {
    pub fn new() -> Self {
        Self {
            glyphs: HashMap::new(),
            panel_rects: HashMap::new(),
            row_rects: HashMap::new(),
            anchors: Vec::new(),
            curves: Vec::new(),
            curve_tolerance: 8.0,
            anchor_radius: 6.0,
            bezier_samples: 48,
        }
    }

    pub fn curve_tolerance(&self) -> f32 {
        self.curve_tolerance
    }

    pub fn set_curve_tolerance(&mut self, tolerance: f32) {
        self.curve_tolerance = tolerance;
    }

    /// Refresh all spatial data. Call after any layout, drag, expand,
    /// collapse, or routing change.
    pub fn update(
        &mut self,
        glyphs: &HashMap<AssetId, Vec2>,
        panels: &HashMap<AssetId, ColumnPanel>,
        connections: &ConnectionSet,
    ) {
        self.glyphs = glyphs.clone();
        self.panel_rects.clear();
        self.row_rects.clear();
        self.anchors.clear();
        self.curves.clear();

        for (asset_id, panel) in panels {
            self.panel_rects.insert(asset_id.clone(), panel.rect);
            let rows = panel
                .rows
                .iter()
                .map(|row| (row.name.clone(), row.rect))
                .collect();
            self.row_rects.insert(asset_id.clone(), rows);

            for row in &panel.rows {
                for side in [AnchorSide::Left, AnchorSide::Right] {
                    self.anchors.push((
                        asset_id.clone(),
                        row.name.clone(),
                        side,
                        row.anchor(side),
                    ));
                }
            }
        }

        for curve in connections.curves() {
            self.curves.push((curve.key.clone(), curve.curve));
        }
    }

    /// Perform a hit test at the given position.
    pub fn hit_test(&self, pos: Vec2) -> HitTarget {
        if let Some((asset_id, column, side)) = self.hit_test_anchor(pos) {
            return HitTarget::Anchor {
                asset_id,
                column,
                side,
            };
        }

        if let Some((asset_id, column)) = self.hit_test_column(pos) {
            return HitTarget::Column { asset_id, column };
        }

        if let Some(asset_id) = self.hit_test_node(pos) {
            return HitTarget::Node(asset_id);
        }

        if let Some(key) = self.hit_test_curve(pos) {
            return HitTarget::Curve(key);
        }

        HitTarget::None
    }

    fn hit_test_anchor(&self, pos: Vec2) -> Option<(AssetId, String, AnchorSide)> {
        let mut best: Option<(&AssetId, &String, AnchorSide, f32)> = None;
        for (asset_id, column, side, anchor) in &self.anchors {
            let delta = *anchor - pos;
            let dist = (delta.x * delta.x + delta.y * delta.y).sqrt();
            if dist <= self.anchor_radius && best.map(|(_, _, _, d)| dist < d).unwrap_or(true) {
                best = Some((asset_id, column, *side, dist));
            }
        }
        best.map(|(id, column, side, _)| (id.clone(), column.clone(), side))
    }

    fn hit_test_column(&self, pos: Vec2) -> Option<(AssetId, String)> {
        for (asset_id, rows) in &self.row_rects {
            for (column, rect) in rows {
                if rect.contains(pos) {
                    return Some((asset_id.clone(), column.clone()));
                }
            }
        }
        None
    }

    /// Test panels first, then collapsed glyphs. If panels overlap, the
    /// smallest-area panel wins (the most specific one).
    pub fn hit_test_node(&self, pos: Vec2) -> Option<AssetId> {
        let mut best: Option<(&AssetId, f32)> = None;
        for (asset_id, rect) in &self.panel_rects {
            if rect.contains(pos) {
                let area = rect.width() * rect.height();
                if best.map(|(_, a)| area < a).unwrap_or(true) {
                    best = Some((asset_id, area));
                }
            }
        }
        if let Some((asset_id, _)) = best {
            return Some(asset_id.clone());
        }

        for (asset_id, center) in &self.glyphs {
            let delta = *center - pos;
            if (delta.x * delta.x + delta.y * delta.y).sqrt() <= GLYPH_RADIUS {
                return Some(asset_id.clone());
            }
        }
        None
    }

    fn hit_test_curve(&self, pos: Vec2) -> Option<ConnectionKey> {
        let mut best: Option<(&ConnectionKey, f32)> = None;
        for (key, curve) in &self.curves {
            let dist = curve.point_distance(pos, self.bezier_samples);
            if dist <= self.curve_tolerance && best.map(|(_, d)| dist < d).unwrap_or(true) {
                best = Some((key, dist));
            }
        }
        best.map(|(key, _)| key.clone())
    }
}
