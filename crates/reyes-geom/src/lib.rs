//! The geometry interface: the abstract `Geometry`/`TessellationContext`
//! seam the split/dice driver uses, plus the two concrete surface kinds this
//! core ships (bilinear patch, convex polygon mesh).

mod attributes;
pub use attributes::Attributes;

mod geometry;
pub use geometry::{GeometryRef, TessellationContext};
pub use geometry::Geometry;

mod patch;
pub use patch::BilinearPatch;

mod mesh;
pub use mesh::PolygonMesh;
