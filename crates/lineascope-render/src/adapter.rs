use crate::primitives::{Primitive, RenderSurface, Stroke, TextAlign};
use lineascope_graph::panel::GLYPH_RADIUS;
use lineascope_graph::style::{
    COLOR_ANCHOR, COLOR_EDIT_CANDIDATE_RING, COLOR_EDIT_SOURCE_RING, COLOR_HOVER_OVERLAY,
    COLOR_LOADING_TEXT, COLOR_PANEL_BORDER, COLOR_PANEL_FILL, COLOR_PLACEHOLDER_TEXT,
    COLOR_ROW_TEXT, COLOR_ROW_TYPE_TEXT, COLOR_TARGET_RING,
};
use lineascope_graph::{
    curve_style, edge_style, node_colors, Color, ColumnPanel, ConnectionCurve, GraphController,
    HitTarget, Rect, Vec2,
};
use lineascope_core::LineageNode;

const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
const LABEL_SIZE: f32 = 12.0;
const HEADER_TEXT_SIZE: f32 = 13.0;
const ROW_TEXT_SIZE: f32 = 11.0;
const ANCHOR_RADIUS: f32 = 3.0;
const ANCHOR_RADIUS_HOVERED: f32 = 5.0;

/// Translates the controller's state into drawable primitives.
///
/// The adapter is the only component aware that a rendering surface exists;
/// it reads the view state and never stores any of its own.
#[derive(Debug, Default)]
pub struct RenderAdapter {
    viewport: Option<Rect>,
}

impl RenderAdapter {
    pub const PADDING_FLOOR: f32 = 50.0;
    pub const PADDING_RATIO: f32 = 0.2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    /// Compute the bounding box of the given extents plus padding, and set
    /// the visible viewport to exactly that box.
    ///
    /// Padding is `max(50, 0.2 * max(span_x, span_y))`. Returns None (and
    /// leaves the viewport unchanged) when there is nothing to fit.
    pub fn fit_to_content<I>(&mut self, extents: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Rect>,
    {
        let mut bounds: Option<Rect> = None;
        for extent in extents {
            bounds = Some(match bounds {
                Some(acc) => acc.union(&extent),
                None => extent,
            });
        }
        let bounds = bounds?;

        let span = bounds.width().max(bounds.height());
        let padding = (Self::PADDING_RATIO * span).max(Self::PADDING_FLOOR);
        let viewport = bounds.expand(padding);
        self.viewport = Some(viewport);
        Some(viewport)
    }

    /// The glyph extent of every positioned node: the collapsed circle's
    /// bounding square, or the full panel rect when expanded.
    pub fn glyph_extents(controller: &GraphController) -> Vec<Rect> {
        controller
            .model()
            .all_nodes()
            .filter_map(|node| {
                if let Some(panel) = controller.panels().get(&node.id) {
                    return Some(panel.rect);
                }
                controller.view().position(&node.id).map(|pos| {
                    Rect::from_center_size(
                        pos,
                        Vec2::new(2.0 * GLYPH_RADIUS, 2.0 * GLYPH_RADIUS),
                    )
                })
            })
            .collect()
    }

    /// Build the full scene, back to front: node-level edges, node glyphs
    /// and panels, then connection curves.
    pub fn scene(&self, controller: &GraphController) -> Vec<Primitive> {
        let mut primitives = Vec::new();
        let model = controller.model();

        if model.is_empty() {
            primitives.push(Primitive::Text {
                pos: controller.bounds().center(),
                text: "No asset selected or no lineage available".to_string(),
                size: 16.0,
                color: COLOR_PLACEHOLDER_TEXT,
                align: TextAlign::Center,
            });
            return primitives;
        }

        let mut edge_indices: Vec<_> = controller.edge_lines().keys().copied().collect();
        edge_indices.sort();
        for idx in edge_indices {
            let Some(&(from, to)) = controller.edge_lines().get(&idx) else {
                continue;
            };
            let Some(edge) = model.graph.edge_weight(idx) else {
                continue;
            };
            let style = edge_style(edge.kind, edge.confidence);
            primitives.push(Primitive::Line {
                from,
                to,
                stroke: Stroke {
                    color: style.color,
                    width: style.width,
                },
                dashed: style.dashed,
                arrow_head: style.arrow_head,
            });
        }

        for node in model.all_nodes() {
            if let Some(panel) = controller.panels().get(&node.id) {
                self.panel_primitives(controller, node, panel, &mut primitives);
            } else if let Some(pos) = controller.view().position(&node.id) {
                self.glyph_primitives(controller, node, pos, &mut primitives);
            }
        }

        for connection in controller.connections().curves() {
            let hovered = Self::connection_hovered(controller.hovered(), connection);
            let style = curve_style(connection.direction, connection.confidence, hovered);
            primitives.push(Primitive::Curve {
                curve: connection.curve,
                stroke: Stroke {
                    color: style.color,
                    width: style.width,
                },
                dashed: style.dashed,
                opacity: style.opacity,
            });
            if hovered {
                for point in [connection.curve.start, connection.curve.end] {
                    primitives.push(Primitive::Circle {
                        center: point,
                        radius: ANCHOR_RADIUS_HOVERED,
                        fill: style.color,
                        stroke: None,
                    });
                }
            }
        }

        primitives
    }

    pub fn draw_to(&self, surface: &mut dyn RenderSurface, controller: &GraphController) {
        let primitives = self.scene(controller);
        tracing::debug!("Drawing {} primitives", primitives.len());
        surface.draw(&primitives);
    }

    fn connection_hovered(hovered: &HitTarget, connection: &ConnectionCurve) -> bool {
        match hovered {
            HitTarget::Curve(key) => *key == connection.key,
            // Hovering an endpoint anchor highlights the curve as well.
            HitTarget::Anchor {
                asset_id, column, ..
            } => {
                (connection.key.from_asset == *asset_id && connection.key.from_column == *column)
                    || (connection.key.to_asset == *asset_id
                        && connection.key.to_column == *column)
            }
            _ => false,
        }
    }

    fn glyph_primitives(
        &self,
        controller: &GraphController,
        node: &LineageNode,
        pos: Vec2,
        primitives: &mut Vec<Primitive>,
    ) {
        let colors = node_colors(node.asset_type);

        if node.is_target {
            primitives.push(Primitive::Circle {
                center: pos,
                radius: GLYPH_RADIUS + 4.0,
                fill: TRANSPARENT,
                stroke: Some(Stroke {
                    color: COLOR_TARGET_RING,
                    width: 2.0,
                }),
            });
        }

        if controller.edit_mode() {
            match controller.edit_source() {
                Some(source) if *source == node.id => {
                    primitives.push(Primitive::Circle {
                        center: pos,
                        radius: GLYPH_RADIUS + 7.0,
                        fill: TRANSPARENT,
                        stroke: Some(Stroke {
                            color: COLOR_EDIT_SOURCE_RING,
                            width: 2.0,
                        }),
                    });
                }
                Some(_) => {
                    primitives.push(Primitive::Circle {
                        center: pos,
                        radius: GLYPH_RADIUS + 7.0,
                        fill: TRANSPARENT,
                        stroke: Some(Stroke {
                            color: COLOR_EDIT_CANDIDATE_RING,
                            width: 1.0,
                        }),
                    });
                }
                None => {}
            }
        }

        primitives.push(Primitive::Circle {
            center: pos,
            radius: GLYPH_RADIUS,
            fill: colors.fill,
            stroke: Some(Stroke {
                color: colors.border,
                width: 1.5,
            }),
        });

        if matches!(controller.hovered(), HitTarget::Node(id) if *id == node.id) {
            primitives.push(Primitive::Circle {
                center: pos,
                radius: GLYPH_RADIUS,
                fill: COLOR_HOVER_OVERLAY,
                stroke: None,
            });
        }

        primitives.push(Primitive::Text {
            pos: Vec2::new(pos.x, pos.y + GLYPH_RADIUS + 12.0),
            text: node.name.clone(),
            size: LABEL_SIZE,
            color: COLOR_ROW_TEXT,
            align: TextAlign::Center,
        });
    }

    fn panel_primitives(
        &self,
        controller: &GraphController,
        node: &LineageNode,
        panel: &ColumnPanel,
        primitives: &mut Vec<Primitive>,
    ) {
        let colors = node_colors(node.asset_type);
        let border = if node.is_target {
            COLOR_TARGET_RING
        } else if controller.edit_mode() && controller.edit_source() == Some(&node.id) {
            COLOR_EDIT_SOURCE_RING
        } else {
            COLOR_PANEL_BORDER
        };

        primitives.push(Primitive::Rect {
            rect: panel.rect,
            corner_radius: 4.0,
            fill: COLOR_PANEL_FILL,
            stroke: Some(Stroke {
                color: border,
                width: 1.5,
            }),
        });
        primitives.push(Primitive::Rect {
            rect: panel.header_rect,
            corner_radius: 4.0,
            fill: colors.fill,
            stroke: None,
        });
        primitives.push(Primitive::Text {
            pos: panel.header_rect.center(),
            text: node.name.clone(),
            size: HEADER_TEXT_SIZE,
            color: colors.text,
            align: TextAlign::Center,
        });

        if controller.view().is_pending(&node.id) {
            primitives.push(Primitive::Text {
                pos: Vec2::new(panel.rect.center().x, panel.header_rect.max.y + 12.0),
                text: "loading columns...".to_string(),
                size: ROW_TEXT_SIZE,
                color: COLOR_LOADING_TEXT,
                align: TextAlign::Center,
            });
            return;
        }

        for row in &panel.rows {
            primitives.push(Primitive::Text {
                pos: Vec2::new(row.rect.min.x + 10.0, row.rect.center().y),
                text: row.name.clone(),
                size: ROW_TEXT_SIZE,
                color: COLOR_ROW_TEXT,
                align: TextAlign::Left,
            });
            primitives.push(Primitive::Text {
                pos: Vec2::new(row.rect.max.x - 10.0, row.rect.center().y),
                text: row.data_type.clone(),
                size: ROW_TEXT_SIZE,
                color: COLOR_ROW_TYPE_TEXT,
                align: TextAlign::Right,
            });

            for anchor in [row.left_anchor(), row.right_anchor()] {
                let hovered = matches!(
                    controller.hovered(),
                    HitTarget::Anchor { asset_id, column, .. }
                        if *asset_id == node.id && *column == row.name
                );
                primitives.push(Primitive::Circle {
                    center: anchor,
                    radius: if hovered {
                        ANCHOR_RADIUS_HOVERED
                    } else {
                        ANCHOR_RADIUS
                    },
                    fill: COLOR_ANCHOR,
                    stroke: None,
                });
            }
        }
    }
}
