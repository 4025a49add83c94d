use glam::IVec2;

use crate::kernel::FilterKernel;

/// Pre-tabulated filter coefficients on the supersample lattice.
///
/// Recomputing a filter's value (often a transcendental function) per
/// sample per pixel is wasteful; this samples it once per `(filter,
/// samples-per-pixel)` pair and caches the result, as a flat 1-D pair of
/// arrays when the filter is separable or a single 2-D array otherwise.
pub struct CachedFilter {
    size: IVec2,
    offset: IVec2,
    separable: bool,
    /// Separable: `size.x + size.y` entries, x-weights then y-weights.
    /// Non-separable: `size.x * size.y` entries, row-major.
    weights: Vec<f32>,
}

/// Discrete filter size in samples along one axis: `2*floor(r*s + 0.5)` for
/// even `s`, `2*floor(r*s) + 1` for odd `s`, where `r` is the half-width in
/// pixels and `s` the samples-per-pixel rate.
fn filter_size(half_width: f32, samples_per_pixel: i32) -> i32 {
    let r = half_width;
    let s = samples_per_pixel;
    if s % 2 == 0 {
        2 * (r * s as f32 + 0.5).floor() as i32
    } else {
        2 * (r * s as f32).floor() as i32 + 1
    }
}

/// Continuous pixel-space position of discrete filter-sample index `i`
/// (`0..size`), relative to the filter's center.
fn sample_pos(i: i32, size: i32, samples_per_pixel: i32) -> f32 {
    (i as f32 - size as f32 / 2.0 + 0.5) / samples_per_pixel as f32
}

impl CachedFilter {
    pub fn new(kernel: &dyn FilterKernel, samples_per_pixel: IVec2) -> Self {
        let half_width = kernel.width() * 0.5;
        let size = IVec2::new(
            filter_size(half_width.x, samples_per_pixel.x).max(1),
            filter_size(half_width.y, samples_per_pixel.y).max(1),
        );
        let offset = (size - samples_per_pixel) / 2;
        let separable = kernel.is_separable();

        let weights = if separable {
            let mut xw: Vec<f32> = (0..size.x)
                .map(|i| kernel.eval(sample_pos(i, size.x, samples_per_pixel.x), 0.0))
                .collect();
            let mut yw: Vec<f32> = (0..size.y)
                .map(|i| kernel.eval(0.0, sample_pos(i, size.y, samples_per_pixel.y)))
                .collect();
            normalize(&mut xw);
            normalize(&mut yw);
            xw.into_iter().chain(yw).collect()
        } else {
            let mut w = Vec::with_capacity((size.x * size.y) as usize);
            for j in 0..size.y {
                let py = sample_pos(j, size.y, samples_per_pixel.y);
                for i in 0..size.x {
                    let px = sample_pos(i, size.x, samples_per_pixel.x);
                    w.push(kernel.eval(px, py));
                }
            }
            normalize(&mut w);
            w
        };

        Self {
            size,
            offset,
            separable,
            weights,
        }
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn offset(&self) -> IVec2 {
        self.offset
    }

    pub fn is_separable(&self) -> bool {
        self.separable
    }

    /// 2-D weight at `(x, y)` (non-separable storage only; for separable
    /// filters use [`Self::xweight1d`]/[`Self::yweight1d`] and multiply).
    pub fn weight(&self, x: i32, y: i32) -> f32 {
        debug_assert!(!self.separable);
        self.weights[(self.size.x * y + x) as usize]
    }

    pub fn xweight1d(&self, x: i32) -> f32 {
        debug_assert!(self.separable);
        self.weights[x as usize]
    }

    pub fn yweight1d(&self, y: i32) -> f32 {
        debug_assert!(self.separable);
        self.weights[(self.size.x + y) as usize]
    }
}

fn normalize(w: &mut [f32]) {
    let sum: f32 = w.iter().sum();
    if sum.abs() > 1e-12 {
        for v in w.iter_mut() {
            *v /= sum;
        }
    }
}
