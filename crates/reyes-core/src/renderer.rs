use std::sync::Arc;

use reyes_display::DisplaySink;
use reyes_filter::{BoxFilter, CachedFilter, DiscFilter, FilterKernel, FilterProcessor, GaussianFilter, SincFilter};
use reyes_geom::{Attributes, GeometryRef};
use reyes_math::{Box2, Box2i, Mat4, Vec2};
use reyes_raster::HiderParams;
use reyes_sample::{stratified_positions, TileCache};
use reyes_scheduler::{BucketOrder, RenderConfig, Scheduler};
use reyes_shader::ShadingContext;
use reyes_splitstore::SplitStore;
use reyes_tessellate::{DriverLimits, GeomHolder};
use reyes_varspec::VarSet;

use crate::error::RenderError;
use crate::options::{Options, PixelFilter};

/// Runaway-split safety net: independent of `eye_splits` (which only bounds
/// forced eye-clip splits), this caps ordinary split recursion so a
/// degenerate geometry implementation can't spin forever.
const MAX_SPLITS: u32 = 64;

/// Keeps a render's stratified jitter pattern reproducible across runs with
/// identical options; not a correctness requirement.
const STRATIFIED_SEED: u64 = 0x5245_5945_5330_0001;

/// Ties options, geometry submission, and a render-to-completion call
/// together. One `Renderer` per render; geometry is submitted before
/// [`Renderer::render`] is called (§4.5's split store is built up-front,
/// single-threaded, before the worker pool starts).
pub struct Renderer {
    options: Options,
    cam_to_raster: Mat4,
    output_vars: VarSet,
    sinks: Vec<Arc<dyn DisplaySink>>,
    store: SplitStore,
}

impl Renderer {
    pub fn new(
        mut options: Options,
        cam_to_screen: Mat4,
        output_vars: VarSet,
        sinks: Vec<Arc<dyn DisplaySink>>,
        diagnostics: &dyn crate::diagnostics::DiagnosticSink,
    ) -> Self {
        options.sanitize(diagnostics);
        let cam_to_raster = reyes_math::cam_to_raster(cam_to_screen, options.resolution.0, options.resolution.1);
        let image_bound = Box2 {
            min: Vec2::ZERO,
            max: Vec2::new(options.resolution.0 as f32, options.resolution.1 as f32),
        };
        let nx = options.resolution.0.div_ceil(options.bucket_size.0) as i32;
        let ny = options.resolution.1.div_ceil(options.bucket_size.1) as i32;
        let store = SplitStore::new(nx, ny, image_bound);
        Self {
            options,
            cam_to_raster,
            output_vars,
            sinks,
            store,
        }
    }

    /// Insert a piece of geometry (or, for motion blur, a set of time keys)
    /// into every bucket its raster bound touches.
    ///
    /// Keys must satisfy pairwise `motion_compatible` (not checked here —
    /// checked lazily the first time the holder is tessellated, per §4.1,
    /// since computing it up front would mean tessellating twice).
    pub fn submit(&mut self, keys: Vec<GeometryRef>, attributes: Attributes) {
        debug_assert!(!keys.is_empty());
        let bound3 = keys[0].bound();
        let bucket_bound = Box2 {
            min: bound3.min.truncate(),
            max: bound3.max.truncate(),
        };
        let holder = Arc::new(GeomHolder::new(keys, Arc::new(attributes), bound3, bucket_bound, 0, 0));
        self.store.insert(holder);
    }

    fn driver_limits(&self) -> DriverLimits {
        DriverLimits {
            max_eye_splits: self.options.eye_splits,
            max_splits: MAX_SPLITS,
            grid_size: self.options.grid_size,
            fstop: self.options.fstop,
            focal_length: self.options.focal_length,
            focal_distance: self.options.focal_distance,
            raster_pixel_size: 1.0,
            clip_near: self.options.clip_near,
        }
    }

    fn filter_kernel(&self) -> Box<dyn FilterKernel> {
        match self.options.pixel_filter {
            PixelFilter::Box { width } => Box::new(BoxFilter::new(Vec2::from(width))),
            PixelFilter::Disc { width } => Box::new(DiscFilter::new(Vec2::from(width))),
            PixelFilter::Gaussian { width } => Box::new(GaussianFilter::new(Vec2::from(width))),
            PixelFilter::Sinc { width } => Box::new(SincFilter::new(Vec2::from(width))),
        }
    }

    /// Run the render to completion: dispatches every bucket across a
    /// worker pool, filters finished sample tiles (unless `do_filter` is
    /// false, in which case raw samples pass straight through a unit-width
    /// box filter), and writes filtered tiles to every sink.
    pub fn render(self) -> Result<(), RenderError> {
        let samples_per_pixel = glam::IVec2::new(self.options.super_samp.0 as i32, self.options.super_samp.1 as i32);
        let bucket_size_px = glam::IVec2::new(self.options.bucket_size.0 as i32, self.options.bucket_size.1 as i32);
        let base_positions = Arc::new(stratified_positions(
            self.options.super_samp.0,
            self.options.super_samp.1,
            STRATIFIED_SEED,
        ));

        let kernel = if self.options.do_filter {
            self.filter_kernel()
        } else {
            Box::new(BoxFilter::new(Vec2::new(1.0, 1.0)))
        };
        let filter = Arc::new(CachedFilter::new(kernel.as_ref(), samples_per_pixel));

        let config = Arc::new(RenderConfig {
            cam_to_raster: self.cam_to_raster,
            driver_limits: self.driver_limits(),
            hider_params: HiderParams {
                smooth_shading: true,
                fstop: self.options.fstop,
                focal_length: self.options.focal_length,
                focal_distance: self.options.focal_distance,
                raster_pixel_size: 1.0,
            },
            shading_ctx: ShadingContext {
                time: self.options.shutter_min,
                shutter_open: self.options.shutter_min,
                shutter_close: self.options.shutter_max,
            },
            output_vars: self.output_vars.clone(),
            samples_per_pixel,
            bucket_size_px,
            base_positions,
            tile_cache: Arc::new(TileCache::new()),
            time_strat_quality: self.options.interleave_width as f32,
            shutter_open: self.options.shutter_min,
            shutter_close: self.options.shutter_max,
            lens_radius: if self.options.fstop.is_finite() {
                self.options.focal_length / (2.0 * self.options.fstop)
            } else {
                0.0
            },
        });

        let nx = self.store.nx_buckets();
        let ny = self.store.ny_buckets();
        let out_tile_range = Box2i::new(glam::IVec2::ZERO, glam::IVec2::new(nx, ny));
        let filter_processor = Arc::new(FilterProcessor::new(
            self.sinks,
            filter,
            samples_per_pixel,
            config.tile_size_samples(),
            out_tile_range,
            self.output_vars.clone(),
        ));

        let num_threads = if self.options.num_threads > 0 {
            Some(self.options.num_threads as usize)
        } else {
            None
        };
        let order = BucketOrder::TwoBlockRaster {
            block: glam::IVec2::new(4, 4),
        };
        let scheduler = Scheduler::new(self.store, config, filter_processor, order, num_threads);
        scheduler.render().map_err(RenderError::Scheduler)
    }
}
