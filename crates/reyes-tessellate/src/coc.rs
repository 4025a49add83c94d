/// Circle-of-confusion radius at camera-space depth `z`, in raster pixels.
///
/// `fstop = +inf` (no lens) yields `0.0` regardless of `z`.
pub fn circle_of_confusion(
    z: f32,
    fstop: f32,
    focal_length: f32,
    focal_distance: f32,
    raster_pixel_size: f32,
) -> f32 {
    if !fstop.is_finite() {
        return 0.0;
    }
    let a = focal_length / (2.0 * fstop);
    let b = (focal_distance * focal_length) / (focal_distance - focal_length);
    let c = 1.0 / z - 1.0 / focal_distance;
    (a * b * c).abs() * raster_pixel_size
}

/// Coarsening factor applied to `poly_length` for a holder spanning camera
/// depths `[z_near, z_far]`: the *minimum* CoC over the range (the sharpest
/// point of the holder), since dicing must be fine enough for the
/// best-focused part.
pub fn min_coc_over_range(
    z_near: f32,
    z_far: f32,
    fstop: f32,
    focal_length: f32,
    focal_distance: f32,
    raster_pixel_size: f32,
) -> f32 {
    // The CoC crosses zero at the focal plane, so if the range straddles it
    // the true minimum is 0 regardless of the endpoints.
    if (z_near <= focal_distance && z_far >= focal_distance) || (z_far <= focal_distance && z_near >= focal_distance) {
        return 0.0;
    }
    let c_near = circle_of_confusion(z_near, fstop, focal_length, focal_distance, raster_pixel_size);
    let c_far = circle_of_confusion(z_far, fstop, focal_length, focal_distance, raster_pixel_size);
    c_near.min(c_far)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_fstop_disables_dof() {
        assert_eq!(circle_of_confusion(5.0, f32::INFINITY, 1.0, 10.0, 1.0), 0.0);
    }

    #[test]
    fn coc_is_zero_at_focal_distance() {
        let c = circle_of_confusion(10.0, 2.0, 1.0, 10.0, 1.0);
        assert!(c.abs() < 1e-5);
    }

    #[test]
    fn min_coc_is_zero_when_range_straddles_focal_plane() {
        let min = min_coc_over_range(5.0, 15.0, 2.0, 1.0, 10.0, 1.0);
        assert_eq!(min, 0.0);
    }

    #[test]
    fn min_coc_falls_back_to_endpoint_min_outside_focal_plane() {
        let min = min_coc_over_range(20.0, 30.0, 2.0, 1.0, 10.0, 1.0);
        let c_near = circle_of_confusion(20.0, 2.0, 1.0, 10.0, 1.0);
        let c_far = circle_of_confusion(30.0, 2.0, 1.0, 10.0, 1.0);
        assert_eq!(min, c_near.min(c_far));
        assert!(min > 0.0);
    }
}
