use reyes_math::Vec2;

/// A pixel reconstruction filter: weights samples within a box of size
/// `width()` centered on the pixel, in pixel units (not samples).
///
/// Matches the original renderer's `Filter` functor: an evaluator plus the
/// metadata (`width`, separability) the coefficient cache needs to build a
/// discrete table from it.
pub trait FilterKernel: Send + Sync {
    /// Evaluate the (unnormalized) filter at `(x, y)` pixels from its center.
    fn eval(&self, x: f32, y: f32) -> f32;

    /// A separable filter satisfies `eval(x, y) == eval1d(x) * eval1d(y)`,
    /// letting the cache (and the processor's two-pass execution) work in
    /// `O(r)` rather than `O(r^2)`.
    fn is_separable(&self) -> bool;

    /// Support width in each axis, in pixels; nonzero only within
    /// `[-width/2, width/2]`.
    fn width(&self) -> Vec2;
}

/// Uniform weight over the support box.
pub struct BoxFilter {
    width: Vec2,
}

impl BoxFilter {
    pub fn new(width: Vec2) -> Self {
        Self { width }
    }
}

impl FilterKernel for BoxFilter {
    fn eval(&self, _x: f32, _y: f32) -> f32 {
        1.0
    }

    fn is_separable(&self) -> bool {
        true
    }

    fn width(&self) -> Vec2 {
        self.width
    }
}

/// Uniform weight over an elliptical support; not separable, since the
/// support boundary mixes `x` and `y`.
pub struct DiscFilter {
    width: Vec2,
}

impl DiscFilter {
    pub fn new(width: Vec2) -> Self {
        Self { width }
    }
}

impl FilterKernel for DiscFilter {
    fn eval(&self, x: f32, y: f32) -> f32 {
        let rx = self.width.x * 0.5;
        let ry = self.width.y * 0.5;
        if rx <= 0.0 || ry <= 0.0 {
            return 0.0;
        }
        let d = (x / rx) * (x / rx) + (y / ry) * (y / ry);
        if d <= 1.0 {
            1.0
        } else {
            0.0
        }
    }

    fn is_separable(&self) -> bool {
        false
    }

    fn width(&self) -> Vec2 {
        self.width
    }
}

/// Separable Gaussian, truncated to the support box.
pub struct GaussianFilter {
    width: Vec2,
    alpha: f32,
}

impl GaussianFilter {
    pub fn new(width: Vec2) -> Self {
        Self { width, alpha: 2.0 }
    }

    fn eval1d(&self, x: f32, half_width: f32) -> f32 {
        if half_width <= 0.0 {
            return 0.0;
        }
        let t = x / half_width;
        (-self.alpha * t * t).exp()
    }
}

impl FilterKernel for GaussianFilter {
    fn eval(&self, x: f32, y: f32) -> f32 {
        self.eval1d(x, self.width.x * 0.5) * self.eval1d(y, self.width.y * 0.5)
    }

    fn is_separable(&self) -> bool {
        true
    }

    fn width(&self) -> Vec2 {
        self.width
    }
}

/// Separable windowed-sinc filter.
pub struct SincFilter {
    width: Vec2,
}

impl SincFilter {
    pub fn new(width: Vec2) -> Self {
        Self { width }
    }

    fn sinc(t: f32) -> f32 {
        if t.abs() < 1e-6 {
            1.0
        } else {
            let pt = std::f32::consts::PI * t;
            pt.sin() / pt
        }
    }
}

impl FilterKernel for SincFilter {
    fn eval(&self, x: f32, y: f32) -> f32 {
        Self::sinc(x) * Self::sinc(y)
    }

    fn is_separable(&self) -> bool {
        true
    }

    fn width(&self) -> Vec2 {
        self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_filter_is_uniform_and_separable() {
        let f = BoxFilter::new(Vec2::new(2.0, 2.0));
        assert!(f.is_separable());
        assert_eq!(f.eval(0.0, 0.0), f.eval(0.9, -0.9));
    }

    #[test]
    fn disc_filter_rejects_corners_of_its_bounding_box() {
        let f = DiscFilter::new(Vec2::new(2.0, 2.0));
        assert!(!f.is_separable());
        assert_eq!(f.eval(0.0, 0.0), 1.0);
        assert_eq!(f.eval(0.9, 0.9), 0.0);
    }

    #[test]
    fn gaussian_filter_peaks_at_center() {
        let f = GaussianFilter::new(Vec2::new(4.0, 4.0));
        assert!(f.eval(0.0, 0.0) > f.eval(1.0, 0.0));
        assert!(f.eval(1.0, 0.0) > f.eval(1.9, 0.0));
    }

    #[test]
    fn sinc_filter_vanishes_at_integer_pixels() {
        let f = SincFilter::new(Vec2::new(6.0, 6.0));
        assert!(f.eval(1.0, 0.0).abs() < 1e-5);
        assert_eq!(f.eval(0.0, 0.0), 1.0);
    }
}
