use glam::IVec2;
use reyes_math::Vec2;
use reyes_varspec::VarSet;

use crate::fragment::Fragment;
use crate::sample::Sample;

/// Per-bucket storage: a `(width x height)` array of samples plus a
/// same-shape array of fragments, anchored at a raster-space top-left
/// corner. Tile dimensions are constant across a render.
pub struct SampleTile {
    width: u32,
    height: u32,
    anchor: IVec2,
    bucket: IVec2,
    samples: Vec<Sample>,
    fragments: Vec<Fragment>,
}

impl SampleTile {
    pub fn new(width: u32, height: u32, anchor: IVec2, bucket: IVec2, output_vars: &VarSet) -> Self {
        assert!(width > 0 && height > 0);
        let n = (width * height) as usize;
        let samples = (0..n).map(|_| Sample::new(Vec2::ZERO)).collect();
        let fragments = (0..n).map(|_| Fragment::new(output_vars)).collect();
        Self {
            width,
            height,
            anchor,
            bucket,
            samples,
            fragments,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn anchor(&self) -> IVec2 {
        self.anchor
    }

    pub fn bucket(&self) -> IVec2 {
        self.bucket
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y * self.width + x) as usize
    }

    pub fn sample(&self, x: u32, y: u32) -> &Sample {
        &self.samples[self.index(x, y)]
    }

    pub fn sample_mut(&mut self, x: u32, y: u32) -> &mut Sample {
        let i = self.index(x, y);
        &mut self.samples[i]
    }

    pub fn fragment(&self, x: u32, y: u32) -> &Fragment {
        &self.fragments[self.index(x, y)]
    }

    pub fn fragment_mut(&mut self, x: u32, y: u32) -> &mut Fragment {
        let i = self.index(x, y);
        &mut self.fragments[i]
    }

    pub fn reset(&mut self, output_vars: &VarSet) {
        for s in &mut self.samples {
            s.reset();
        }
        for f in &mut self.fragments {
            f.reset(output_vars);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reyes_varspec::{Stdvar, VarSet};

    #[test]
    fn tile_indexing_addresses_every_cell_once() {
        let vars = VarSet::from_unsorted(vec![Stdvar::z()]);
        let mut tile = SampleTile::new(4, 3, IVec2::new(16, 8), IVec2::new(1, 0), &vars);
        for y in 0..3 {
            for x in 0..4 {
                tile.sample_mut(x, y).z = (x + y * 4) as f32;
            }
        }
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(tile.sample(x, y).z, (x + y * 4) as f32);
            }
        }
    }

    #[test]
    fn reset_restores_infinite_z_defaults() {
        let vars = VarSet::from_unsorted(vec![Stdvar::z()]);
        let mut tile = SampleTile::new(2, 2, IVec2::ZERO, IVec2::ZERO, &vars);
        tile.sample_mut(0, 0).z = 3.0;
        tile.reset(&vars);
        assert_eq!(tile.sample(0, 0).z, f32::INFINITY);
    }
}
