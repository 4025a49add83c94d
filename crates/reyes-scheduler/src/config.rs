use std::sync::Arc;

use glam::IVec2;
use reyes_math::Mat4;
use reyes_raster::HiderParams;
use reyes_sample::TileCache;
use reyes_shader::ShadingContext;
use reyes_tessellate::DriverLimits;
use reyes_varspec::VarSet;

/// Everything a bucket's render pass needs that's shared, read-only, across
/// every worker for the whole render.
pub struct RenderConfig {
    pub cam_to_raster: Mat4,
    pub driver_limits: DriverLimits,
    pub hider_params: HiderParams,
    pub shading_ctx: ShadingContext,
    pub output_vars: VarSet,
    /// Samples per pixel along each axis.
    pub samples_per_pixel: IVec2,
    /// Bucket size in pixels.
    pub bucket_size_px: IVec2,
    /// `(samples_per_pixel.x * samples_per_pixel.y)` jittered offsets within
    /// a unit pixel, shared and re-tiled across every bucket.
    pub base_positions: Arc<Vec<reyes_math::Vec2>>,
    pub tile_cache: Arc<TileCache>,
    pub time_strat_quality: f32,
    pub shutter_open: f32,
    pub shutter_close: f32,
    pub lens_radius: f32,
}

impl RenderConfig {
    pub fn tile_size_samples(&self) -> IVec2 {
        self.bucket_size_px * self.samples_per_pixel
    }
}
