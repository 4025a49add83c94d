//! Support math for the renderer core: vectors and matrices come from `glam`;
//! this crate adds the axis-aligned bound types, screen-window/raster
//! transform composition, and small numeric helpers the renderer needs on
//! top of that.

pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

mod numeric;
pub use numeric::*;

mod bounds;
pub use bounds::*;

mod screen;
pub use screen::*;
