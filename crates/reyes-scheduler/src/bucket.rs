use std::sync::{Arc, Mutex};

use glam::IVec2;
use reyes_filter::FilterProcessor;
use reyes_occlusion::OcclusionTree;
use reyes_raster::sample_grid;
use reyes_sample::{SampleTile, TimeLensSampler};
use reyes_splitstore::{GeometryQueue, SplitStore};
use reyes_tessellate::{shade_grid, tessellate_holder, GeomHolder, TessellateOutcome};

use crate::config::RenderConfig;

/// Render everything queued for bucket `(bx, by)`, pushing the finished
/// sample tile to `filter`.
///
/// `store` is locked only for the brief moments of building the bucket's
/// queue and releasing it on completion; the queue itself, and every
/// tessellate/shade/rasterize call made while draining it, run lock-free.
pub fn render_bucket(
    store: &Mutex<SplitStore>,
    bx: i32,
    by: i32,
    cfg: &RenderConfig,
    filter: &FilterProcessor,
) -> anyhow::Result<()> {
    let mut queue = {
        let store = store.lock().expect("split store poisoned");
        GeometryQueue::for_bucket(&store, bx, by)
    };

    let tile_size = cfg.tile_size_samples();
    let anchor_samples = IVec2::new(bx, by) * tile_size;
    let tile_width = tile_size.x.max(tile_size.y).max(1) as u32;
    let tiles = cfg.tile_cache.get_or_build(
        tile_width,
        cfg.time_strat_quality,
        cfg.shutter_open,
        cfg.shutter_close,
    );
    let sampler = TimeLensSampler::new(tiles, cfg.shutter_open, cfg.shutter_close, cfg.lens_radius);

    let mut tile = SampleTile::new(
        tile_size.x as u32,
        tile_size.y as u32,
        anchor_samples,
        IVec2::new(bx, by),
        &cfg.output_vars,
    );

    let sx = cfg.samples_per_pixel.x;
    let sy = cfg.samples_per_pixel.y;
    let sample_count = (tile_size.x * tile_size.y) as usize;
    let mut lens_uv = Vec::with_capacity(sample_count);
    let mut times = Vec::with_capacity(sample_count);
    for ty in 0..tile_size.y {
        for tx in 0..tile_size.x {
            let global = anchor_samples + IVec2::new(tx, ty);
            let px = global.x.div_euclid(sx);
            let py = global.y.div_euclid(sy);
            let lx = global.x.rem_euclid(sx);
            let ly = global.y.rem_euclid(sy);
            let local = cfg.base_positions[(ly * sx + lx) as usize];
            let pos = reyes_math::Vec2::new(px as f32, py as f32) + local;
            tile.sample_mut(tx as u32, ty as u32).pos = pos;

            let (time, lens) = sampler.sample(global.x, global.y);
            lens_uv.push(lens);
            times.push(time);
        }
    }

    let mut occlusion = OcclusionTree::new(tile_size);

    while let Some(holder) = queue.pop() {
        tessellate_holder(&holder, cfg.cam_to_raster, &cfg.driver_limits, holder.eye_split_depth)?;

        // Key times are assumed evenly spaced across the shutter interval;
        // neither `Options` nor `GeomHolder` carries explicit per-key
        // timestamps.
        let key_times = evenly_spaced_key_times(holder.keys.len(), cfg.shutter_open, cfg.shutter_close);

        let (children, forced, grid_count) = holder.with_outcome(|outcome| match outcome {
            Some(TessellateOutcome::Children { keys, forced }) => (keys.clone(), *forced, 0),
            Some(TessellateOutcome::Grids(grids)) => (Vec::new(), false, grids[0].len()),
            None => (Vec::new(), false, 0),
        });

        let child_count = children.first().map_or(0, Vec::len);
        for i in 0..child_count {
            let child_keys: Vec<_> = children.iter().map(|per_key| per_key[i].clone()).collect();
            let eye_split_depth = if forced { holder.eye_split_depth + 1 } else { holder.eye_split_depth };
            let child_holder = Arc::new(GeomHolder::new(
                child_keys,
                holder.attributes.clone(),
                holder.bound,
                holder.bucket_bound,
                holder.split_count + 1,
                eye_split_depth,
            ));
            queue.push(child_holder);
        }

        for i in 0..grid_count {
            let mut key_grids: Vec<_> = holder.with_outcome(|outcome| match outcome {
                Some(TessellateOutcome::Grids(grids)) => grids.iter().map(|per_key| per_key[i].clone()).collect(),
                _ => unreachable!("grid_count was read from the same outcome"),
            });
            for (k, grid) in key_grids.iter_mut().enumerate() {
                shade_grid(grid, &holder.attributes, cfg.cam_to_raster, &cfg.shading_ctx, k == 0)?;
            }
            sample_grid(&key_grids, &key_times, &times, &lens_uv, &cfg.hider_params, Some(&occlusion), &mut tile);
            record_occlusion(&mut occlusion, &tile, tile_size);
        }
    }

    {
        let mut store = store.lock().expect("split store poisoned");
        store.finish_bucket(bx, by);
    }

    filter.insert(tile);
    Ok(())
}

/// Evenly spaces `key_count` timestamps across `[shutter_open, shutter_close]`
/// for a deforming holder's motion keys. Neither `Options` nor `GeomHolder`
/// carries explicit per-key timestamps, so uniform spacing is the only
/// assumption available; a single key (no motion) degenerates to the
/// shutter's midpoint.
fn evenly_spaced_key_times(key_count: usize, shutter_open: f32, shutter_close: f32) -> Vec<f32> {
    if key_count <= 1 {
        return vec![(shutter_open + shutter_close) * 0.5];
    }
    let span = shutter_close - shutter_open;
    (0..key_count).map(|i| shutter_open + span * (i as f32) / ((key_count - 1) as f32)).collect()
}

/// Fold the tile's current nearest-z values into the occlusion tree so the
/// next holder popped off the queue benefits from what was just rasterized.
fn record_occlusion(tree: &mut OcclusionTree, tile: &SampleTile, tile_size: IVec2) {
    for ty in 0..tile_size.y {
        for tx in 0..tile_size.x {
            let z = tile.sample(tx as u32, ty as u32).z;
            if z.is_finite() {
                let idx = tree.node_index(tx, ty);
                tree.set_depth(idx, z);
            }
        }
    }
}
