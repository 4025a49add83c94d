//! Property-based tests for filter kernel symmetry and cached-weight
//! normalization.

use glam::IVec2;
use proptest::prelude::*;
use reyes_filter::{BoxFilter, CachedFilter, DiscFilter, FilterKernel, GaussianFilter, SincFilter};
use reyes_math::Vec2;

fn assert_weights_sum_to_one(kernel: &dyn FilterKernel, samples_per_pixel: IVec2) {
    let cache = CachedFilter::new(kernel, samples_per_pixel);
    if cache.is_separable() {
        let xsum: f32 = (0..cache.size().x).map(|i| cache.xweight1d(i)).sum();
        let ysum: f32 = (0..cache.size().y).map(|i| cache.yweight1d(i)).sum();
        assert!((xsum - 1.0).abs() < 1e-3, "xsum={xsum}");
        assert!((ysum - 1.0).abs() < 1e-3, "ysum={ysum}");
    } else {
        let mut sum = 0.0;
        for y in 0..cache.size().y {
            for x in 0..cache.size().x {
                sum += cache.weight(x, y);
            }
        }
        assert!((sum - 1.0).abs() < 1e-3, "sum={sum}");
    }
}

proptest! {
    #[test]
    fn box_filter_weights_sum_to_one_across_widths_and_sample_rates(
        w in 1.0f32..8.0,
        h in 1.0f32..8.0,
        sx in 1i32..4,
        sy in 1i32..4,
    ) {
        let kernel = BoxFilter::new(Vec2::new(w, h));
        assert_weights_sum_to_one(&kernel, IVec2::new(sx, sy));
    }

    #[test]
    fn gaussian_filter_weights_sum_to_one_across_widths_and_sample_rates(
        w in 1.0f32..8.0,
        h in 1.0f32..8.0,
        sx in 1i32..4,
        sy in 1i32..4,
    ) {
        let kernel = GaussianFilter::new(Vec2::new(w, h));
        assert_weights_sum_to_one(&kernel, IVec2::new(sx, sy));
    }

    #[test]
    fn disc_filter_weights_sum_to_one_across_widths_and_sample_rates(
        w in 1.0f32..8.0,
        h in 1.0f32..8.0,
        sx in 1i32..4,
        sy in 1i32..4,
    ) {
        let kernel = DiscFilter::new(Vec2::new(w, h));
        assert_weights_sum_to_one(&kernel, IVec2::new(sx, sy));
    }

    #[test]
    fn gaussian_and_sinc_and_box_are_symmetric_about_the_center(x in -3.0f32..3.0, y in -3.0f32..3.0) {
        let g = GaussianFilter::new(Vec2::new(6.0, 6.0));
        prop_assert!((g.eval(x, y) - g.eval(-x, -y)).abs() < 1e-5);
        prop_assert!((g.eval(x, y) - g.eval(-x, y)).abs() < 1e-5);

        let s = SincFilter::new(Vec2::new(6.0, 6.0));
        prop_assert!((s.eval(x, y) - s.eval(-x, -y)).abs() < 1e-4);

        let b = BoxFilter::new(Vec2::new(6.0, 6.0));
        prop_assert!((b.eval(x, y) - b.eval(-x, -y)).abs() < 1e-6);
    }

    #[test]
    fn disc_filter_is_symmetric_about_the_center(x in -3.0f32..3.0, y in -3.0f32..3.0) {
        let d = DiscFilter::new(Vec2::new(6.0, 6.0));
        prop_assert!((d.eval(x, y) - d.eval(-x, -y)).abs() < 1e-6);
    }
}
