mod adapter;
mod primitives;

pub use adapter::RenderAdapter;
pub use primitives::{Primitive, RenderSurface, Stroke, TextAlign};
