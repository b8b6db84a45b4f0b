use crate::graph::{GraphModel, Vec2};
use crate::panel::{AnchorSide, ColumnPanel};
use lineascope_core::{
    clamp_confidence, AssetId, ColumnMapping, LineageError, MappingDirection, ResolvedColumn,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A cubic bezier curve segment defined by four control points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl CubicBezier {
    /// Sample the curve at parameter t [0, 1]
    pub fn sample(&self, t: f32) -> Vec2 {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = self.start.x * mt3
            + 3.0 * self.control1.x * mt2 * t
            + 3.0 * self.control2.x * mt * t2
            + self.end.x * t3;
        let y = self.start.y * mt3
            + 3.0 * self.control1.y * mt2 * t
            + 3.0 * self.control2.y * mt * t2
            + self.end.y * t3;

        Vec2::new(x, y)
    }

    /// Minimum distance from a point to this curve, by uniform sampling.
    /// `num_samples` controls accuracy (typically 20-50).
    pub fn point_distance(&self, point: Vec2, num_samples: usize) -> f32 {
        let mut min_dist_sq = f32::INFINITY;
        let samples = num_samples.max(2);

        for i in 0..=samples {
            let t = i as f32 / samples as f32;
            let curve_point = self.sample(t);
            let dx = curve_point.x - point.x;
            let dy = curve_point.y - point.y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq < min_dist_sq {
                min_dist_sq = dist_sq;
            }
        }

        min_dist_sq.sqrt()
    }
}

/// Canonical identity of a column connection: the flow's upstream endpoint
/// followed by its downstream endpoint.
///
/// Backends report a mapping from both sides (A's downstream list and B's
/// upstream list describe the same flow); keying curves canonically makes
/// re-resolving the opposite endpoint a replacement, not a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionKey {
    pub from_asset: AssetId,
    pub from_column: String,
    pub to_asset: AssetId,
    pub to_column: String,
}

impl ConnectionKey {
    pub fn touches(&self, id: &AssetId) -> bool {
        &self.from_asset == id || &self.to_asset == id
    }
}

/// A routed column connection between two expanded panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionCurve {
    pub key: ConnectionKey,
    /// Perspective of the most recent resolution; drives the curve color.
    pub direction: MappingDirection,
    pub confidence: f32,
    pub transformations: Vec<String>,
    pub curve: CubicBezier,
}

/// The set of visible column connections, keyed canonically.
///
/// Kept as an ordered vec so render output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSet {
    curves: Vec<ConnectionCurve>,
}

impl ConnectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn curves(&self) -> &[ConnectionCurve] {
        &self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn clear(&mut self) {
        self.curves.clear();
    }

    pub fn find(&self, key: &ConnectionKey) -> Option<&ConnectionCurve> {
        self.curves.iter().find(|c| &c.key == key)
    }

    /// Insert a curve, replacing any existing curve with the same key.
    pub fn insert(&mut self, curve: ConnectionCurve) {
        match self.curves.iter_mut().find(|c| c.key == curve.key) {
            Some(existing) => *existing = curve,
            None => self.curves.push(curve),
        }
    }

    /// Remove every curve with `id` as either endpoint. Returns how many
    /// were removed; curves between two other nodes are untouched.
    pub fn remove_touching(&mut self, id: &AssetId) -> usize {
        let before = self.curves.len();
        self.curves.retain(|c| !c.key.touches(id));
        before - self.curves.len()
    }

    pub fn curves_touching<'a>(
        &'a self,
        id: &'a AssetId,
    ) -> impl Iterator<Item = &'a ConnectionCurve> {
        self.curves.iter().filter(move |c| c.key.touches(id))
    }

    /// Recompute geometry for exactly the curves with an endpoint on `id`.
    /// Cost is proportional to the node's connection degree.
    pub fn reroute_touching(
        &mut self,
        id: &AssetId,
        panels: &HashMap<AssetId, ColumnPanel>,
        router: &ColumnRouter,
    ) {
        for curve in self.curves.iter_mut().filter(|c| c.key.touches(id)) {
            let anchors = panels
                .get(&curve.key.from_asset)
                .and_then(|p| p.anchor(&curve.key.from_column, AnchorSide::Right))
                .zip(
                    panels
                        .get(&curve.key.to_asset)
                        .and_then(|p| p.anchor(&curve.key.to_column, AnchorSide::Left)),
                );
            if let Some((start, end)) = anchors {
                curve.curve = router.s_curve(start, end);
            }
        }
    }
}

/// Routes column mappings of expanded nodes into connection curves.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRouter {
    /// Horizontal control-point offset as a fraction of |Δx|.
    pub control_ratio: f32,
}

impl Default for ColumnRouter {
    fn default() -> Self {
        Self {
            control_ratio: Self::CONTROL_RATIO,
        }
    }
}

impl ColumnRouter {
    pub const CONTROL_RATIO: f32 = 0.3;

    pub fn new() -> Self {
        Self::default()
    }

    /// Build the S-curve between two anchors. Control points are offset
    /// horizontally from each anchor by `control_ratio * |Δx|` in the
    /// direction of travel, which keeps the curve smooth regardless of the
    /// panels' relative vertical offset.
    pub fn s_curve(&self, start: Vec2, end: Vec2) -> CubicBezier {
        let dx = end.x - start.x;
        let offset = self.control_ratio * dx.abs() * dx.signum();

        CubicBezier {
            start,
            control1: Vec2::new(start.x + offset, start.y),
            control2: Vec2::new(end.x - offset, end.y),
            end,
        }
    }

    /// Route every mapping of `owner`'s resolved columns whose referenced
    /// asset is also currently expanded. Returns the number of curves
    /// inserted or refreshed.
    ///
    /// Mappings that reference assets absent from the graph, assets that
    /// are not expanded, or columns the target panel doesn't carry are
    /// skipped silently; partial data is the normal case, not an error.
    pub fn route_node(
        &self,
        model: &GraphModel,
        owner: &AssetId,
        columns: &[ResolvedColumn],
        panels: &HashMap<AssetId, ColumnPanel>,
        connections: &mut ConnectionSet,
    ) -> usize {
        let Some(owner_panel) = panels.get(owner) else {
            return 0;
        };

        let mut routed = 0;
        for column in columns {
            for mapping in column.upstream.iter().chain(column.downstream.iter()) {
                let Some(target_id) = model.match_asset(mapping.target_asset.as_str()) else {
                    tracing::debug!(
                        "Skipping mapping {}.{}: {}",
                        owner,
                        mapping.source_column,
                        LineageError::UnmatchedMappingTarget(mapping.target_asset.to_string())
                    );
                    continue;
                };
                if target_id == owner {
                    continue;
                }
                let Some(target_panel) = panels.get(target_id) else {
                    // Referenced asset exists but is not expanded.
                    continue;
                };

                if let Some(curve) =
                    self.route_mapping(owner_panel, target_panel, target_id, mapping)
                {
                    connections.insert(curve);
                    routed += 1;
                }
            }
        }
        routed
    }

    fn route_mapping(
        &self,
        owner_panel: &ColumnPanel,
        target_panel: &ColumnPanel,
        target_id: &AssetId,
        mapping: &ColumnMapping,
    ) -> Option<ConnectionCurve> {
        // Canonically, flow runs from the upstream asset's right edge into
        // the downstream asset's left edge.
        let key = match mapping.direction {
            MappingDirection::Downstream => ConnectionKey {
                from_asset: owner_panel.asset_id.clone(),
                from_column: mapping.source_column.clone(),
                to_asset: target_id.clone(),
                to_column: mapping.target_column.clone(),
            },
            MappingDirection::Upstream => ConnectionKey {
                from_asset: target_id.clone(),
                from_column: mapping.target_column.clone(),
                to_asset: owner_panel.asset_id.clone(),
                to_column: mapping.source_column.clone(),
            },
        };

        let from_panel = if key.from_asset == owner_panel.asset_id {
            owner_panel
        } else {
            target_panel
        };
        let to_panel = if key.to_asset == owner_panel.asset_id {
            owner_panel
        } else {
            target_panel
        };

        let start = from_panel.anchor(&key.from_column, AnchorSide::Right)?;
        let end = to_panel.anchor(&key.to_column, AnchorSide::Left)?;

        Some(ConnectionCurve {
            key,
            direction: mapping.direction,
            confidence: clamp_confidence(mapping.confidence),
            transformations: mapping.transformations.clone(),
            curve: self.s_curve(start, end),
        })
    }
}
