use std::sync::Arc;

use reyes_grid::{Grid, GridStorageBuilder};
use reyes_math::{Box3, Mat4};

use crate::attributes::Attributes;

pub type GeometryRef = Arc<dyn Geometry>;

/// Abstract piece of geometry to be rendered.
///
/// A `Geometry` is immutable once inserted into the render: `transform` is
/// only ever called before insertion, and every other method takes `&self`.
pub trait Geometry: Send + Sync {
    /// Object-space bounding box, computed once by the renderer per holder.
    fn bound(&self) -> Box3;

    /// True when `other` can serve as a motion key for `self` — same
    /// concrete topology, so that per-key tessellation produces matching
    /// children in the same order.
    fn motion_compatible(&self, other: &dyn Geometry) -> bool;

    /// Downcast support for [`Geometry::motion_compatible`] implementations
    /// that need to compare concrete topology.
    fn as_any(&self) -> &dyn std::any::Any;

    /// The split/dice decision. Implementations call exactly one of
    /// [`TessellationContext::push_geometry`] (split) or dice the surface
    /// and call [`TessellationContext::push_grid`], using
    /// `ctx.grid_storage_builder()` to allocate the grid's storage.
    ///
    /// `trans` transforms into the coordinate system in which
    /// `ctx.poly_length()` is measured; it is not necessarily a projection,
    /// so implementations must not discard its z component when sizing
    /// themselves.
    fn tessellate(&self, trans: Mat4, ctx: &mut dyn TessellationContext) -> anyhow::Result<()>;

    /// Apply a point transform. Only ever called before the geometry is
    /// inserted into the render.
    fn transform(&mut self, m: Mat4);
}

/// Drives one geometry's split/dice step: supplies the renderer state the
/// decision depends on, and collects whatever the geometry produces.
pub trait TessellationContext {
    /// Desired micropolygon edge length, in the `trans`-space passed to
    /// [`Geometry::tessellate`], already coarsened for depth of field.
    fn poly_length(&self) -> f32;

    /// Target micropolygon count (per side) a diceable surface should not
    /// exceed before it must split instead.
    fn grid_size(&self) -> u32;

    /// True if the current holder crossed `z = epsilon` and so must split
    /// rather than dice, regardless of its apparent raster size.
    fn force_split(&self) -> bool;

    /// Number of forced splits already applied to this holder; used to
    /// alternate the forced split direction by parity.
    fn force_split_count(&self) -> u32;

    fn attributes(&self) -> &Attributes;

    /// Push a child geometry resulting from a split.
    fn push_geometry(&mut self, geom: GeometryRef);

    /// Push a grid resulting from a dice.
    fn push_grid(&mut self, grid: Grid);

    /// Builder for the grid storage a dice step is about to fill; pre-seeded
    /// by the tessellation driver with every variable a shader or the
    /// renderer's outputs require.
    fn grid_storage_builder(&mut self) -> &mut GridStorageBuilder;
}
