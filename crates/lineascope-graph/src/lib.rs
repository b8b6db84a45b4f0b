pub mod column_router;
pub mod graph;
pub mod hit_tester;
pub mod interaction;
pub mod layout;
pub mod panel;
pub mod style;
pub mod view_state;

pub use column_router::{
    ColumnRouter, ConnectionCurve, ConnectionKey, ConnectionSet, CubicBezier,
};
pub use graph::{BuildReport, EdgeIndex, GraphEdge, GraphModel, NodeIndex, Vec2};
pub use hit_tester::{HitTarget, HitTester};
pub use interaction::{Command, GraphController, MappingDetails};
pub use layout::{LayeredLayouter, Layouter};
pub use panel::{AnchorSide, ColumnPanel, ColumnRow, Rect};
pub use style::{
    Color, CurveStyle, EdgeStyle, NodeColors, curve_style, edge_style, node_colors,
};
pub use view_state::{GraphViewState, NodeView};
