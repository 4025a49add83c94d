use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use glam::IVec2;
use reyes_display::DisplaySink;
use reyes_math::Box2i;
use reyes_sample::SampleTile;
use reyes_varspec::VarSet;

use crate::cache::CachedFilter;

/// A 2x2 block of adjacent input sample tiles, as needed to fill one output
/// tile under the dual-tessellation layout (the output tile's corners sit
/// at the centers of these four input tiles).
struct FilterBlock {
    tiles: [[Option<Arc<SampleTile>>; 2]; 2],
}

impl FilterBlock {
    fn empty() -> Self {
        Self {
            tiles: [[None, None], [None, None]],
        }
    }

    fn ready(&self) -> bool {
        self.tiles.iter().flatten().all(|t| t.is_some())
    }
}

/// Gathers completed sample tiles into 2x2 neighborhoods and emits filtered
/// output pixel tiles to a set of display sinks, one per output variable.
///
/// The output-tile grid is the dual of the input grid (§4.6): each output
/// tile's pixel footprint is the same size as an input tile's, but shifted
/// by half a tile so its corners land on input-tile centers. An input tile
/// at bucket `(ix, iy)` therefore contributes to up to four output tiles:
/// `(ix-1, iy-1)` .. `(ix, iy)`.
pub struct FilterProcessor {
    sinks: Vec<Arc<dyn DisplaySink>>,
    filter: Arc<CachedFilter>,
    samples_per_pixel: IVec2,
    tile_size_samples: IVec2,
    out_tile_range: Box2i,
    output_vars: VarSet,
    waiting: Mutex<HashMap<(i32, i32), FilterBlock>>,
}

impl FilterProcessor {
    pub fn new(
        sinks: Vec<Arc<dyn DisplaySink>>,
        filter: Arc<CachedFilter>,
        samples_per_pixel: IVec2,
        tile_size_samples: IVec2,
        out_tile_range: Box2i,
        output_vars: VarSet,
    ) -> Self {
        Self {
            sinks,
            filter,
            samples_per_pixel,
            tile_size_samples,
            out_tile_range,
            output_vars,
            waiting: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a finished sample tile, filtering and emitting any output
    /// tiles it completes.
    pub fn insert(&self, tile: SampleTile) {
        let tile = Arc::new(tile);
        let bucket = tile.bucket();

        for dy in -1..=0 {
            for dx in -1..=0 {
                let out_pos = IVec2::new(bucket.x + dx, bucket.y + dy);
                let in_range = out_pos.x >= self.out_tile_range.min.x
                    && out_pos.x < self.out_tile_range.max.x
                    && out_pos.y >= self.out_tile_range.min.y
                    && out_pos.y < self.out_tile_range.max.y;
                if !in_range {
                    continue;
                }
                let row = (bucket.y - out_pos.y) as usize;
                let col = (bucket.x - out_pos.x) as usize;

                let ready_block = {
                    let mut waiting = self.waiting.lock().expect("filter processor poisoned");
                    let block = waiting
                        .entry((out_pos.x, out_pos.y))
                        .or_insert_with(FilterBlock::empty);
                    block.tiles[row][col] = Some(tile.clone());
                    if block.ready() {
                        waiting.remove(&(out_pos.x, out_pos.y)).map(|b| (out_pos, b))
                    } else {
                        None
                    }
                };

                if let Some((out_pos, block)) = ready_block {
                    self.filter_and_emit(out_pos, &block);
                }
            }
        }
    }

    fn tile_size_px(&self) -> IVec2 {
        self.tile_size_samples / self.samples_per_pixel
    }

    fn filter_and_emit(&self, out_pos: IVec2, block: &FilterBlock) {
        let tile_px = self.tile_size_px();
        let ncomp: usize = self.output_vars.iter().map(|v| v.scalar_size()).sum();
        let npixels = (tile_px.x * tile_px.y) as usize;
        let mut output = vec![0.0f32; npixels * ncomp];

        for oy in 0..tile_px.y {
            for ox in 0..tile_px.x {
                let dst = &mut output[(oy * tile_px.x + ox) as usize * ncomp..][..ncomp];
                self.gather(block, ox, oy, dst);
            }
        }

        // tile00's center is this output tile's raster-pixel anchor.
        let anchor_samples = block.tiles[0][0].as_ref().unwrap().anchor();
        let anchor_px = anchor_samples / self.samples_per_pixel + self.tile_size_px() / 2;

        let mut offset = 0usize;
        for var in self.output_vars.iter() {
            let size = var.scalar_size();
            let mut var_data = Vec::with_capacity(npixels * size);
            for p in 0..npixels {
                var_data.extend_from_slice(&output[p * ncomp + offset..p * ncomp + offset + size]);
            }
            if let Some(sink) = self.sinks.iter().find(|s| s.variable() == var) {
                sink.write_tile(anchor_px, tile_px, &var_data);
            }
            offset += size;
        }
    }

    /// Accumulate the weighted contribution of every sample in the filter
    /// support for output pixel `(ox, oy)` into `dst` (one fragment-sized
    /// slot). Returns the sum of weights applied (always 1 away from tile
    /// edges; samples that fall outside the 2x2 block are simply skipped).
    fn gather(&self, block: &FilterBlock, ox: i32, oy: i32, dst: &mut [f32]) -> f32 {
        let size = self.filter.size();
        let offset = self.filter.offset();
        let tile = self.tile_size_samples;

        let start_x = tile.x / 2 + ox * self.samples_per_pixel.x - offset.x;
        let start_y = tile.y / 2 + oy * self.samples_per_pixel.y - offset.y;

        let mut weight_sum = 0.0f32;
        for j in 0..size.y {
            let gy = start_y + j;
            if gy < 0 || gy >= 2 * tile.y {
                continue;
            }
            for i in 0..size.x {
                let gx = start_x + i;
                if gx < 0 || gx >= 2 * tile.x {
                    continue;
                }
                let w = if self.filter.is_separable() {
                    self.filter.xweight1d(i) * self.filter.yweight1d(j)
                } else {
                    self.filter.weight(i, j)
                };
                if w == 0.0 {
                    continue;
                }
                let row = if gy < tile.y { 0 } else { 1 };
                let col = if gx < tile.x { 0 } else { 1 };
                let local = IVec2::new(gx - col as i32 * tile.x, gy - row as i32 * tile.y);
                if let Some(tile) = &block.tiles[row][col] {
                    let frag = tile.fragment(local.x as u32, local.y as u32);
                    for (d, &s) in dst.iter_mut().zip(frag.as_slice()) {
                        *d += w * s;
                    }
                    weight_sum += w;
                }
            }
        }
        weight_sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::BoxFilter;
    use reyes_math::Vec2;
    use reyes_varspec::Stdvar;
    use std::sync::Mutex as StdMutex;

    struct RecordingSink {
        variable: reyes_varspec::VarSpec,
        writes: StdMutex<Vec<(IVec2, IVec2, Vec<f32>)>>,
    }

    impl DisplaySink for RecordingSink {
        fn variable(&self) -> &reyes_varspec::VarSpec {
            &self.variable
        }

        fn write_tile(&self, tile_origin: IVec2, tile_size: IVec2, data: &[f32]) {
            self.writes
                .lock()
                .unwrap()
                .push((tile_origin, tile_size, data.to_vec()));
        }
    }

    fn filled_tile(bucket: IVec2, anchor: IVec2, vars: &VarSet, z: f32) -> SampleTile {
        let mut tile = SampleTile::new(4, 4, anchor, bucket, vars);
        for y in 0..4 {
            for x in 0..4 {
                tile.fragment_mut(x, y).as_mut_slice()[0] = z;
            }
        }
        tile
    }

    #[test]
    fn a_complete_2x2_block_produces_exactly_one_output_tile() {
        let vars = VarSet::from_unsorted(vec![Stdvar::z()]);
        let kernel = BoxFilter::new(Vec2::new(1.0, 1.0));
        let filter = Arc::new(CachedFilter::new(&kernel, IVec2::new(2, 2)));
        let sink = Arc::new(RecordingSink {
            variable: Stdvar::z(),
            writes: StdMutex::new(Vec::new()),
        });
        let processor = FilterProcessor::new(
            vec![sink.clone()],
            filter,
            IVec2::new(2, 2),
            IVec2::new(4, 4),
            Box2i::new(IVec2::new(-10, -10), IVec2::new(10, 10)),
            vars.clone(),
        );

        processor.insert(filled_tile(IVec2::new(0, 0), IVec2::new(0, 0), &vars, 1.0));
        assert!(sink.writes.lock().unwrap().is_empty());
        processor.insert(filled_tile(IVec2::new(1, 0), IVec2::new(4, 0), &vars, 1.0));
        processor.insert(filled_tile(IVec2::new(0, 1), IVec2::new(0, 4), &vars, 1.0));
        processor.insert(filled_tile(IVec2::new(1, 1), IVec2::new(4, 4), &vars, 1.0));

        let writes = sink.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert!(writes[0].2.iter().all(|&v| (v - 1.0).abs() < 1e-4));
    }
}
