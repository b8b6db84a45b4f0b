use lineascope_graph::{Color, CubicBezier, Rect, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A drawable primitive.
///
/// This is the entire contract between the engine and a rendering surface:
/// whatever can draw circles, rectangles, lines, cubic curves, and text can
/// host the graph. Primitives are serializable so a remote surface can
/// consume a scene over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Circle {
        center: Vec2,
        radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Rect {
        rect: Rect,
        corner_radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
        dashed: bool,
        arrow_head: bool,
    },
    Curve {
        curve: CubicBezier,
        stroke: Stroke,
        dashed: bool,
        opacity: f32,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// The one seam to a concrete rendering surface.
pub trait RenderSurface {
    fn draw(&mut self, primitives: &[Primitive]);
}
