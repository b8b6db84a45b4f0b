use crate::graph::Vec2;
use lineascope_core::{AssetId, ColumnInfo};
use serde::{Deserialize, Serialize};

/// A rectangle defined by min and max corners
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Create a new rectangle from min and max corners
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a new rectangle from position and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: Vec2::new(pos.x + size.x, pos.y + size.y),
        }
    }

    /// Create a rectangle centered on a point
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size.scale(0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// An empty rectangle
    pub const NOTHING: Self = Self {
        min: Vec2 { x: 0.0, y: 0.0 },
        max: Vec2 { x: 0.0, y: 0.0 },
    };

    /// Get the width of the rectangle
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Get the size of the rectangle
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Get the center of the rectangle
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min.x + self.width() * 0.5,
            self.min.y + self.height() * 0.5,
        )
    }

    /// Check if the rectangle contains a point
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if this rectangle intersects with another rectangle
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Return a new rectangle expanded by `amount` on all sides
    pub fn expand(&self, amount: f32) -> Rect {
        Rect {
            min: Vec2::new(self.min.x - amount, self.min.y - amount),
            max: Vec2::new(self.max.x + amount, self.max.y + amount),
        }
    }

    /// The smallest rectangle containing both `self` and `other`
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Vec2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Vec2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Return this rectangle shifted by `delta`
    pub fn translate(&self, delta: Vec2) -> Rect {
        Rect {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Clamp a point into this rectangle
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }
}

/// Which edge of a panel a column anchor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorSide {
    Left,
    Right,
}

/// Radius of a collapsed node glyph.
pub const GLYPH_RADIUS: f32 = 18.0;
/// Fixed width of an expanded column panel.
pub const PANEL_WIDTH: f32 = 240.0;
/// Height of the panel header showing the asset name.
pub const HEADER_HEIGHT: f32 = 34.0;
/// Height of one column row.
pub const ROW_HEIGHT: f32 = 24.0;

/// One column row inside an expanded panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRow {
    pub name: String,
    pub data_type: String,
    pub rect: Rect,
}

impl ColumnRow {
    /// Anchor on the left edge of the row, vertically centered.
    pub fn left_anchor(&self) -> Vec2 {
        Vec2::new(self.rect.min.x, self.rect.center().y)
    }

    /// Anchor on the right edge of the row, vertically centered.
    pub fn right_anchor(&self) -> Vec2 {
        Vec2::new(self.rect.max.x, self.rect.center().y)
    }

    pub fn anchor(&self, side: AnchorSide) -> Vec2 {
        match side {
            AnchorSide::Left => self.left_anchor(),
            AnchorSide::Right => self.right_anchor(),
        }
    }
}

/// The expanded view of a node: a header plus one row per column, with a
/// fixed anchor point per row on each vertical edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnPanel {
    pub asset_id: AssetId,
    pub rect: Rect,
    pub header_rect: Rect,
    pub rows: Vec<ColumnRow>,
}

impl ColumnPanel {
    /// Build a panel centered on the node's position.
    pub fn build(asset_id: AssetId, center: Vec2, columns: &[ColumnInfo]) -> Self {
        let height = HEADER_HEIGHT + columns.len() as f32 * ROW_HEIGHT;
        let rect = Rect::from_center_size(center, Vec2::new(PANEL_WIDTH, height));
        let header_rect = Rect::from_pos_size(rect.min, Vec2::new(PANEL_WIDTH, HEADER_HEIGHT));

        let rows = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let row_min = Vec2::new(
                    rect.min.x,
                    rect.min.y + HEADER_HEIGHT + i as f32 * ROW_HEIGHT,
                );
                ColumnRow {
                    name: column.name.clone(),
                    data_type: column.data_type.clone(),
                    rect: Rect::from_pos_size(row_min, Vec2::new(PANEL_WIDTH, ROW_HEIGHT)),
                }
            })
            .collect();

        Self {
            asset_id,
            rect,
            header_rect,
            rows,
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.rect = self.rect.translate(delta);
        self.header_rect = self.header_rect.translate(delta);
        for row in &mut self.rows {
            row.rect = row.rect.translate(delta);
        }
    }

    pub fn row(&self, column: &str) -> Option<&ColumnRow> {
        self.rows.iter().find(|row| row.name == column)
    }

    /// The anchor point for a named column, or None if the panel has no
    /// such row (partial column data is expected, not an error).
    pub fn anchor(&self, column: &str, side: AnchorSide) -> Option<Vec2> {
        self.row(column).map(|row| row.anchor(side))
    }
}
