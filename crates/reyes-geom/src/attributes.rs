use reyes_shader::ShaderRef;

/// Read-only per-surface attribute record inherited by every child produced
/// from a split.
#[derive(Clone)]
pub struct Attributes {
    /// Target micropolygon area, in pixels².
    pub shading_rate: f32,
    /// How aggressively to coarsen dicing under depth of field.
    pub focus_factor: f32,
    pub smooth_shading: bool,
    pub displacement_bound: f32,
    pub surface_shader: Option<ShaderRef>,
    pub displacement_shader: Option<ShaderRef>,
}

impl Attributes {
    pub fn new(shading_rate: f32) -> Self {
        Self {
            shading_rate,
            focus_factor: 1.0,
            smooth_shading: true,
            displacement_bound: 0.0,
            surface_shader: None,
            displacement_shader: None,
        }
    }

    /// The desired micropolygon edge length in raster pixels, `√shading_rate`.
    pub fn poly_length(&self) -> f32 {
        self.shading_rate.sqrt()
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poly_length_is_sqrt_shading_rate() {
        let attrs = Attributes::new(4.0);
        assert_eq!(attrs.poly_length(), 2.0);
    }
}
