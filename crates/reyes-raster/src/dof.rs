use reyes_math::Vec2;

/// The per-vertex raster-space shift a depth-of-field sample applies to a
/// projected point at depth `z`: `-lens_uv * c(z)`, per §4.2. `coc` is the
/// circle-of-confusion radius already evaluated at `z` (see
/// `reyes_tessellate::circle_of_confusion`, which this reuses the same
/// formula for, scaled to this sample's actual depth rather than the
/// grid-coarsening bound).
pub fn circle_of_confusion_shift(lens_uv: Vec2, coc: f32) -> Vec2 {
    -lens_uv * coc
}
