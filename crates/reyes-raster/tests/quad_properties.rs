//! Property-based tests for `point_in_quad` / `inverse_bilinear`.

use proptest::prelude::*;
use reyes_math::Vec2;
use reyes_raster::{inverse_bilinear, point_in_quad};

fn bilinear(a: Vec2, b: Vec2, c: Vec2, d: Vec2, u: f32, v: f32) -> Vec2 {
    a * (1.0 - u) * (1.0 - v) + b * u * (1.0 - v) + d * (1.0 - u) * v + c * u * v
}

/// A sub-pixel-scale, mildly skewed quad, matching what dicing actually
/// produces — `inverse_bilinear`'s two Newton iterations only converge
/// tightly at this scale.
fn skewed_quad(skew: f32) -> (Vec2, Vec2, Vec2, Vec2) {
    let a = Vec2::new(0.0, 0.0);
    let b = Vec2::new(0.02, skew * 0.002);
    let c = Vec2::new(0.018 + skew * 0.001, 0.021);
    let d = Vec2::new(-0.001, 0.02 - skew * 0.0015);
    (a, b, c, d)
}

proptest! {
    #[test]
    fn inverse_bilinear_recovers_the_parameter_it_was_evaluated_at(
        skew in -1.0f32..1.0,
        u in 0.05f32..0.95,
        v in 0.05f32..0.95,
    ) {
        let (a, b, c, d) = skewed_quad(skew);
        let p = bilinear(a, b, c, d, u, v);
        let (ru, rv) = inverse_bilinear(a, b, c, d, p);
        prop_assert!((ru - u).abs() < 1e-3, "u={u} ru={ru}");
        prop_assert!((rv - v).abs() < 1e-3, "v={v} rv={rv}");
    }

    #[test]
    fn point_in_quad_contains_every_strictly_interior_bilinear_point(
        skew in -1.0f32..1.0,
        u in 0.05f32..0.95,
        v in 0.05f32..0.95,
    ) {
        let (a, b, c, d) = skewed_quad(skew);
        let p = bilinear(a, b, c, d, u, v);
        prop_assert!(point_in_quad([a, b, c, d], 0, 0, p));
    }

    #[test]
    fn point_in_quad_excludes_points_well_outside_the_quad(
        skew in -1.0f32..1.0,
        dx in 1.0f32..10.0,
    ) {
        let (a, b, c, d) = skewed_quad(skew);
        let far = Vec2::new(a.x + dx, a.y + dx);
        prop_assert!(!point_in_quad([a, b, c, d], 0, 0, far));
    }
}
