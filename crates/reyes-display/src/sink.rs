use glam::IVec2;
use reyes_varspec::VarSpec;

/// A destination for one output variable's finished pixel tiles.
///
/// Implementations must serialize their own writes (the filter processor
/// calls `write_tile` from whichever worker finished that output tile,
/// with no external lock held).
pub trait DisplaySink: Send + Sync {
    fn variable(&self) -> &VarSpec;

    /// `tile_origin` is the tile's top-left pixel in image coordinates;
    /// `tile_size` its width/height in pixels; `data` is
    /// `tile_size.x * tile_size.y * variable().scalar_size()` floats in
    /// row-major, component-interleaved order.
    fn write_tile(&self, tile_origin: IVec2, tile_size: IVec2, data: &[f32]);
}
