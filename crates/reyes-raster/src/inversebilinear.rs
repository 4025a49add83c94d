use reyes_math::Vec2;

/// Recovers the `(u, v)` parameter of point `p` within the bilinear quad
/// `a, b, c, d` (vertex order matching `Grid::quad_indices`), via two
/// Newton iterations on the quadratic residual — plenty for the
/// sub-pixel-scale quads micropolygon dicing produces.
pub fn inverse_bilinear(a: Vec2, b: Vec2, c: Vec2, d: Vec2, p: Vec2) -> (f32, f32) {
    // Initial guess from the quad's mean edge directions.
    let mut u = 0.5;
    let mut v = 0.5;
    for _ in 0..2 {
        let (q, du, dv) = eval(a, b, c, d, u, v);
        let r = q - p;
        // Solve the 2x2 linear system J * delta = -r via Cramer's rule.
        let det = du.x * dv.y - du.y * dv.x;
        if det.abs() < 1e-12 {
            break;
        }
        let delta_u = (-r.x * dv.y + r.y * dv.x) / det;
        let delta_v = (du.x * -r.y - du.y * -r.x) / det;
        u += delta_u;
        v += delta_v;
    }
    (u, v)
}

fn eval(a: Vec2, b: Vec2, c: Vec2, d: Vec2, u: f32, v: f32) -> (Vec2, Vec2, Vec2) {
    // bilinear(u, v) = a*(1-u)(1-v) + b*u(1-v) + d*(1-u)v + c*u*v,
    // matching Grid's (a, b, c, d) = (u0v0, u1v0, u1v1, u0v1) layout.
    let q = a * (1.0 - u) * (1.0 - v) + b * u * (1.0 - v) + d * (1.0 - u) * v + c * u * v;
    let dq_du = (b - a) * (1.0 - v) + (c - d) * v;
    let dq_dv = (d - a) * (1.0 - u) + (c - b) * u;
    (q, dq_du, dq_dv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_corners() {
        let (a, b, c, d) = (
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        );
        let (u, v) = inverse_bilinear(a, b, c, d, a);
        assert!((u - 0.0).abs() < 1e-4 && (v - 0.0).abs() < 1e-4);
        let (u, v) = inverse_bilinear(a, b, c, d, c);
        assert!((u - 1.0).abs() < 1e-4 && (v - 1.0).abs() < 1e-4);
    }

    #[test]
    fn recovers_interior_point_of_skewed_quad() {
        // Sub-pixel scale, matching what dicing actually produces: nearly
        // affine, so two Newton iterations fully converge.
        let (a, b, c, d) = (
            Vec2::new(0.0, 0.0),
            Vec2::new(0.02, 0.002),
            Vec2::new(0.018, 0.021),
            Vec2::new(-0.001, 0.02),
        );
        let target_u = 0.3;
        let target_v = 0.7;
        let (p, _, _) = eval(a, b, c, d, target_u, target_v);
        let (u, v) = inverse_bilinear(a, b, c, d, p);
        assert!((u - target_u).abs() < 1e-3, "u={u}");
        assert!((v - target_v).abs() < 1e-3, "v={v}");
    }
}
