//! Graph View Style System
//!
//! Color mapping for node glyphs, node-level edges, and column-mapping
//! curves, keyed by asset type, relationship kind, and mapping direction.

use lineascope_core::{clamp_confidence, AssetType, MappingDirection, RelationshipKind};
use serde::{Deserialize, Serialize};

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_tuple(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    pub fn darken(&self, factor: f32) -> Self {
        Self {
            r: ((self.r as f32) * (1.0 - factor)) as u8,
            g: ((self.g as f32) * (1.0 - factor)) as u8,
            b: ((self.b as f32) * (1.0 - factor)) as u8,
            a: self.a,
        }
    }

    pub fn lighten(&self, factor: f32) -> Self {
        Self {
            r: ((self.r as f32) + (255.0 - self.r as f32) * factor) as u8,
            g: ((self.g as f32) + (255.0 - self.g as f32) * factor) as u8,
            b: ((self.b as f32) + (255.0 - self.b as f32) * factor) as u8,
            a: self.a,
        }
    }
}

/// Node glyph color palette
#[derive(Debug, Clone, Copy)]
pub struct NodeColors {
    pub fill: Color,
    pub border: Color,
    pub text: Color,
}

/// Style of a node-level lineage edge
#[derive(Debug, Clone, Copy)]
pub struct EdgeStyle {
    pub color: Color,
    pub width: f32,
    pub dashed: bool,
    pub arrow_head: bool,
}

/// Style of a column-mapping curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveStyle {
    pub color: Color,
    pub width: f32,
    pub dashed: bool,
    pub opacity: f32,
}

// ============================================================================
// Color Constants
// ============================================================================

// Tables (green tones)
pub const COLOR_TABLE_FILL: Color = Color::rgb(80, 140, 100);
pub const COLOR_TABLE_BORDER: Color = Color::rgb(60, 120, 80);
pub const COLOR_TABLE_TEXT: Color = Color::rgb(255, 255, 255);

// Views (blue tones)
pub const COLOR_VIEW_FILL: Color = Color::rgb(80, 130, 180);
pub const COLOR_VIEW_BORDER: Color = Color::rgb(60, 110, 160);
pub const COLOR_VIEW_TEXT: Color = Color::rgb(255, 255, 255);

// Topics and streams (orange tones)
pub const COLOR_TOPIC_FILL: Color = Color::rgb(200, 120, 80);
pub const COLOR_TOPIC_BORDER: Color = Color::rgb(180, 100, 60);
pub const COLOR_TOPIC_TEXT: Color = Color::rgb(255, 255, 255);

// Dashboards (purple tones)
pub const COLOR_DASHBOARD_FILL: Color = Color::rgb(130, 100, 160);
pub const COLOR_DASHBOARD_BORDER: Color = Color::rgb(110, 80, 140);
pub const COLOR_DASHBOARD_TEXT: Color = Color::rgb(255, 255, 255);

// Jobs and pipelines (yellow/gold tones)
pub const COLOR_JOB_FILL: Color = Color::rgb(200, 160, 80);
pub const COLOR_JOB_BORDER: Color = Color::rgb(170, 130, 60);
pub const COLOR_JOB_TEXT: Color = Color::rgb(30, 30, 30);

// Files (teal tones)
pub const COLOR_FILE_FILL: Color = Color::rgb(80, 150, 150);
pub const COLOR_FILE_BORDER: Color = Color::rgb(60, 130, 130);
pub const COLOR_FILE_TEXT: Color = Color::rgb(255, 255, 255);

// Unknown/Default
pub const COLOR_UNKNOWN_FILL: Color = Color::rgb(100, 100, 100);
pub const COLOR_UNKNOWN_BORDER: Color = Color::rgb(80, 80, 80);
pub const COLOR_UNKNOWN_TEXT: Color = Color::rgb(255, 255, 255);

// Focal target and interaction states
pub const COLOR_TARGET_RING: Color = Color::rgb(255, 200, 100);
pub const COLOR_EDIT_SOURCE_RING: Color = Color::rgb(230, 90, 90);
pub const COLOR_EDIT_CANDIDATE_RING: Color = Color::rgba(230, 90, 90, 110);
pub const COLOR_HOVER_OVERLAY: Color = Color::rgba(255, 255, 255, 30);

// Expanded panel surfaces
pub const COLOR_PANEL_FILL: Color = Color::rgb(40, 42, 46);
pub const COLOR_PANEL_BORDER: Color = Color::rgb(70, 72, 78);
pub const COLOR_ROW_TEXT: Color = Color::rgb(210, 210, 215);
pub const COLOR_ROW_TYPE_TEXT: Color = Color::rgb(140, 140, 150);
pub const COLOR_ANCHOR: Color = Color::rgb(170, 170, 180);
pub const COLOR_LOADING_TEXT: Color = Color::rgb(160, 160, 170);
pub const COLOR_PLACEHOLDER_TEXT: Color = Color::rgb(130, 130, 140);

// Mapping curve direction colors
pub const COLOR_UPSTREAM_CURVE: Color = Color::rgb(86, 156, 214);
pub const COLOR_DOWNSTREAM_CURVE: Color = Color::rgb(106, 176, 76);

// Node-level edge colors by relationship kind
pub const COLOR_EDGE_DERIVES: Color = Color::rgb(160, 160, 170);
pub const COLOR_EDGE_COPY: Color = Color::rgb(120, 150, 190);
pub const COLOR_EDGE_JOIN: Color = Color::rgb(190, 150, 110);
pub const COLOR_EDGE_AGGREGATE: Color = Color::rgb(150, 120, 180);
pub const COLOR_EDGE_CUSTOM: Color = Color::rgb(200, 130, 130);
pub const COLOR_EDGE_UNKNOWN: Color = Color::rgb(120, 120, 120);

/// Confidence at or above which strokes are drawn solid.
pub const CONFIDENCE_SOLID_THRESHOLD: f32 = 0.8;
/// Curve opacity never drops below this, however low the confidence.
pub const OPACITY_FLOOR: f32 = 0.4;

const CURVE_WIDTH: f32 = 1.5;
const CURVE_WIDTH_HOVERED: f32 = 3.0;

pub fn node_colors(asset_type: AssetType) -> NodeColors {
    match asset_type {
        AssetType::TABLE => NodeColors {
            fill: COLOR_TABLE_FILL,
            border: COLOR_TABLE_BORDER,
            text: COLOR_TABLE_TEXT,
        },
        AssetType::VIEW => NodeColors {
            fill: COLOR_VIEW_FILL,
            border: COLOR_VIEW_BORDER,
            text: COLOR_VIEW_TEXT,
        },
        AssetType::TOPIC => NodeColors {
            fill: COLOR_TOPIC_FILL,
            border: COLOR_TOPIC_BORDER,
            text: COLOR_TOPIC_TEXT,
        },
        AssetType::DASHBOARD => NodeColors {
            fill: COLOR_DASHBOARD_FILL,
            border: COLOR_DASHBOARD_BORDER,
            text: COLOR_DASHBOARD_TEXT,
        },
        AssetType::JOB => NodeColors {
            fill: COLOR_JOB_FILL,
            border: COLOR_JOB_BORDER,
            text: COLOR_JOB_TEXT,
        },
        AssetType::FILE => NodeColors {
            fill: COLOR_FILE_FILL,
            border: COLOR_FILE_BORDER,
            text: COLOR_FILE_TEXT,
        },
        AssetType::UNKNOWN => NodeColors {
            fill: COLOR_UNKNOWN_FILL,
            border: COLOR_UNKNOWN_BORDER,
            text: COLOR_UNKNOWN_TEXT,
        },
    }
}

pub fn edge_style(kind: RelationshipKind, confidence: f32) -> EdgeStyle {
    let color = match kind {
        RelationshipKind::DERIVES_FROM => COLOR_EDGE_DERIVES,
        RelationshipKind::COPY_OF => COLOR_EDGE_COPY,
        RelationshipKind::JOINS => COLOR_EDGE_JOIN,
        RelationshipKind::AGGREGATES => COLOR_EDGE_AGGREGATE,
        RelationshipKind::CUSTOM => COLOR_EDGE_CUSTOM,
        RelationshipKind::UNKNOWN => COLOR_EDGE_UNKNOWN,
    };
    EdgeStyle {
        color,
        width: 1.5,
        dashed: clamp_confidence(confidence) < CONFIDENCE_SOLID_THRESHOLD,
        arrow_head: true,
    }
}

/// Style for a column-mapping curve.
///
/// Opacity tracks confidence with a floor of [`OPACITY_FLOOR`]; strokes
/// below [`CONFIDENCE_SOLID_THRESHOLD`] are dashed. Hovering widens and
/// brightens the stroke.
pub fn curve_style(direction: MappingDirection, confidence: f32, hovered: bool) -> CurveStyle {
    let confidence = clamp_confidence(confidence);
    let color = match direction {
        MappingDirection::Upstream => COLOR_UPSTREAM_CURVE,
        MappingDirection::Downstream => COLOR_DOWNSTREAM_CURVE,
    };

    if hovered {
        CurveStyle {
            color: color.lighten(0.35),
            width: CURVE_WIDTH_HOVERED,
            dashed: confidence < CONFIDENCE_SOLID_THRESHOLD,
            opacity: 1.0,
        }
    } else {
        CurveStyle {
            color,
            width: CURVE_WIDTH,
            dashed: confidence < CONFIDENCE_SOLID_THRESHOLD,
            opacity: confidence.max(OPACITY_FLOOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_opacity_floor_applies() {
        let style = curve_style(MappingDirection::Upstream, 0.1, false);
        assert_eq!(style.opacity, OPACITY_FLOOR);
        assert!(style.dashed);
    }

    #[test]
    fn test_high_confidence_is_solid_and_opaque() {
        let style = curve_style(MappingDirection::Downstream, 0.95, false);
        assert!(!style.dashed);
        assert_eq!(style.opacity, 0.95);
    }

    #[test]
    fn test_direction_colors_are_distinct() {
        let up = curve_style(MappingDirection::Upstream, 0.9, false);
        let down = curve_style(MappingDirection::Downstream, 0.9, false);
        assert_ne!(up.color, down.color);
    }

    #[test]
    fn test_hover_widens_the_stroke() {
        let plain = curve_style(MappingDirection::Upstream, 0.9, false);
        let hovered = curve_style(MappingDirection::Upstream, 0.9, true);
        assert!(hovered.width > plain.width);
        assert_eq!(hovered.opacity, 1.0);
    }

    proptest! {
        #[test]
        fn prop_opacity_is_monotone_in_confidence(c1 in -1.0f32..2.0, c2 in -1.0f32..2.0) {
            let (lo, hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
            let lo_style = curve_style(MappingDirection::Downstream, lo, false);
            let hi_style = curve_style(MappingDirection::Downstream, hi, false);
            prop_assert!(lo_style.opacity <= hi_style.opacity);
        }

        #[test]
        fn prop_opacity_stays_in_unit_range(c in -10.0f32..10.0) {
            let style = curve_style(MappingDirection::Upstream, c, false);
            prop_assert!((OPACITY_FLOOR..=1.0).contains(&style.opacity));
        }
    }
}
