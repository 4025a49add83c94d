use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use reyes_math::Vec2;

use crate::wangtile::TileSet;

/// Builds the `(sx * sy)` jittered sample offsets (in `[0, 1)^2`, relative
/// to a pixel) shared by every pixel in the image. Each sample is jittered
/// strictly within its own stratum cell, so strata can never swap order.
/// Generated once per render and shared (by `Arc`) across buckets.
pub fn stratified_positions(sx: u32, sy: u32, seed: u64) -> Vec<Vec2> {
    assert!(sx > 0 && sy > 0);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut positions = Vec::with_capacity((sx * sy) as usize);
    for j in 0..sy {
        for i in 0..sx {
            let jx: f32 = rng.random_range(0.0..1.0);
            let jy: f32 = rng.random_range(0.0..1.0);
            let x = (i as f32 + jx) / sx as f32;
            let y = (j as f32 + jy) / sy as f32;
            positions.push(Vec2::new(x, y));
        }
    }
    positions
}

/// Maps a pixel's canonical `(t, u, v)` tile sample (per §4.3) onto the
/// render's actual shutter interval and lens aperture.
pub struct TimeLensSampler {
    tiles: std::sync::Arc<TileSet>,
    shutter_open: f32,
    shutter_close: f32,
    lens_radius: f32,
}

impl TimeLensSampler {
    pub fn new(tiles: std::sync::Arc<TileSet>, shutter_open: f32, shutter_close: f32, lens_radius: f32) -> Self {
        Self {
            tiles,
            shutter_open,
            shutter_close,
            lens_radius,
        }
    }

    /// `(time, lens_u, lens_v)` for the sample at pixel `(px, py)`.
    pub fn sample(&self, px: i32, py: i32) -> (f32, Vec2) {
        let (t, u, v) = self.tiles.sample_at(px, py);
        let time = self.shutter_open + t * (self.shutter_close - self.shutter_open);
        let lens = Vec2::new(u, v) * self.lens_radius;
        (time, lens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wangtile::{TileKey, TileSet};

    #[test]
    fn stratified_positions_stay_within_their_own_cell() {
        let positions = stratified_positions(4, 3, 7);
        assert_eq!(positions.len(), 12);
        for (idx, p) in positions.iter().enumerate() {
            let i = (idx % 4) as f32;
            let j = (idx / 4) as f32;
            assert!(p.x >= i / 4.0 && p.x < (i + 1.0) / 4.0);
            assert!(p.y >= j / 3.0 && p.y < (j + 1.0) / 3.0);
        }
    }

    #[test]
    fn time_lens_sampler_remaps_into_shutter_and_aperture() {
        let tiles = std::sync::Arc::new(TileSet::build(TileKey::new(8, 0.5, 0.0, 1.0)));
        let sampler = TimeLensSampler::new(tiles, 2.0, 4.0, 0.1);
        let (t, lens) = sampler.sample(3, 5);
        assert!((2.0..=4.0).contains(&t));
        assert!(lens.length() <= 0.1 + 1e-5);
    }
}
