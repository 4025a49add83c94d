//! The shader execution contract. Shader *execution* (a RenderMan SL/OSL
//! interpreter) is explicitly out of scope for this renderer core; what
//! lives here is just the seam the tessellation and sampling pipeline calls
//! through, so the core can be linked against any real shading engine.

use std::sync::Arc;

use reyes_grid::Grid;
use reyes_varspec::VarSpec;

/// Per-shade-call context: the things a shader needs that aren't already on
/// the grid (current shading time for motion-blurred grids, shutter bounds
/// for `time`-dependent shading).
#[derive(Debug, Clone, Copy)]
pub struct ShadingContext {
    pub time: f32,
    pub shutter_open: f32,
    pub shutter_close: f32,
}

/// An opaque shader: declares the variables it reads and writes, and runs
/// over every shading point of a grid in place.
///
/// `shade` takes `&mut Grid` rather than returning a new one — shaders read
/// and write variables already present in the grid's storage (built with
/// those variables reserved ahead of time by the tessellation context via
/// [`Shader::input_vars`]/[`Shader::output_vars`]).
pub trait Shader: Send + Sync {
    /// Variables this shader reads from the grid.
    fn input_vars(&self) -> &[VarSpec];

    /// Variables this shader writes to the grid. The tessellation context
    /// reserves these in the grid's storage before the shader runs.
    fn output_vars(&self) -> &[VarSpec];

    fn shade(&self, ctx: &ShadingContext, grid: &mut Grid) -> anyhow::Result<()>;
}

pub type ShaderRef = Arc<dyn Shader>;

#[cfg(test)]
mod tests {
    use super::*;
    use reyes_grid::{GridStorageBuilder, StorClass};
    use reyes_varspec::Stdvar;

    struct ConstantColor {
        inputs: Vec<VarSpec>,
        outputs: Vec<VarSpec>,
        color: [f32; 3],
    }

    impl Shader for ConstantColor {
        fn input_vars(&self) -> &[VarSpec] {
            &self.inputs
        }

        fn output_vars(&self) -> &[VarSpec] {
            &self.outputs
        }

        fn shade(&self, _ctx: &ShadingContext, grid: &mut Grid) -> anyhow::Result<()> {
            let ci_view = grid
                .storage()
                .view_for(&Stdvar::ci())
                .ok_or_else(|| anyhow::anyhow!("grid missing Ci storage"))?;
            let n = grid.nu() * grid.nv();
            for i in 0..n {
                let slot = ci_view.get_mut(grid.storage_mut().raw_mut(), i);
                slot.copy_from_slice(&self.color);
            }
            Ok(())
        }
    }

    #[test]
    fn constant_shader_fills_every_shading_point() {
        let mut builder = GridStorageBuilder::new();
        builder.add(Stdvar::p(), StorClass::Varying);
        builder.add(Stdvar::ci(), StorClass::Varying);
        let storage = builder.build(4);
        let mut grid = Grid::new(2, 2, storage);

        let shader = ConstantColor {
            inputs: vec![],
            outputs: vec![Stdvar::ci()],
            color: [1.0, 0.5, 0.25],
        };
        let ctx = ShadingContext {
            time: 0.0,
            shutter_open: 0.0,
            shutter_close: 1.0,
        };
        shader.shade(&ctx, &mut grid).unwrap();

        let ci_view = grid.storage().view_for(&Stdvar::ci()).unwrap();
        for i in 0..4 {
            assert_eq!(ci_view.get(grid.storage().raw(), i), &[1.0, 0.5, 0.25]);
        }
    }
}
