use reyes_geom::Attributes;
use reyes_grid::Grid;
use reyes_math::Mat4;
use reyes_shader::ShadingContext;

use crate::derive::derive_standard_variables;

/// Run one grid through the shading order: derive unset standard variables,
/// displacement shader (may write `P`/`N`), project to raster space, then
/// (for the primary key only) the surface shader.
///
/// A shader execution failure is the caller's to classify — it's returned
/// rather than logged here, so the caller can apply the renderer's `Error`
/// severity (discard this grid, keep rendering).
pub fn shade_grid(
    grid: &mut Grid,
    attributes: &Attributes,
    cam_to_raster: Mat4,
    ctx: &ShadingContext,
    is_primary: bool,
) -> anyhow::Result<()> {
    derive_standard_variables(grid);

    if let Some(shader) = &attributes.displacement_shader {
        shader.shade(ctx, grid)?;
    }

    grid.project(cam_to_raster);

    if is_primary {
        if let Some(shader) = &attributes.surface_shader {
            shader.shade(ctx, grid)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reyes_grid::{GridStorageBuilder, StorClass};
    use reyes_varspec::Stdvar;

    #[test]
    fn shading_runs_without_shaders_attached() {
        let mut builder = GridStorageBuilder::new();
        builder.add(Stdvar::p(), StorClass::Varying);
        let storage = builder.build(4);
        let mut grid = Grid::new(2, 2, storage);
        let attrs = Attributes::default();
        let ctx = ShadingContext {
            time: 0.0,
            shutter_open: 0.0,
            shutter_close: 0.0,
        };
        shade_grid(&mut grid, &attrs, Mat4::IDENTITY, &ctx, true).unwrap();
    }
}
