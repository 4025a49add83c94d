use glam::IVec2;
use reyes_grid::Grid;
use reyes_math::{bilerp, Vec2, Vec3};
use reyes_occlusion::OcclusionTree;
use reyes_sample::SampleTile;
use reyes_tessellate::circle_of_confusion;

use crate::inversebilinear::inverse_bilinear;
use crate::quad::point_in_quad;

/// Per-grid parameters the hider needs that aren't already baked into the
/// grid's storage.
pub struct HiderParams {
    pub smooth_shading: bool,
    pub fstop: f32,
    pub focal_length: f32,
    pub focal_distance: f32,
    pub raster_pixel_size: f32,
}

impl Default for HiderParams {
    fn default() -> Self {
        Self {
            smooth_shading: true,
            fstop: f32::INFINITY,
            focal_length: 1.0,
            focal_distance: 1.0,
            raster_pixel_size: 1.0,
        }
    }
}

/// Rasterizes every micropolygon of a holder's key grid(s) into `tile`.
///
/// `grids` holds one grid per motion key (in time order, `grids[0]` the
/// primary), all sharing the same connectivity — a static (non-deforming)
/// holder passes a single-element slice. `key_times[i]` is the shutter time
/// `grids[i]` was diced at; a sample at `times[cell]` has its quad corners
/// linearly interpolated between the two straddling keys before any of the
/// point-in-quad/depth tests run (§4.2). Only `grids[0]`'s attributes (color,
/// etc) are read for the fragment — secondary keys contribute position only.
///
/// Each tile cell's sample position and lens offset are expected to already
/// be set by the caller (the stratified base position plus, for DoF, that
/// sample's `lens_uv`); this walks every cell whose position could fall
/// within a quad's raster bound (unioned across every key, to cover the
/// quad's full motion extent), applying the constant-per-quad
/// circle-of-confusion shift from the quad's mean depth — an approximation
/// of a true per-vertex shift, reasonable since dicing already bounds a
/// micropolygon's depth range to sub-pixel scale. `lens_uv` supplies one
/// lens offset per tile cell (row-major, same shape as the tile); pass an
/// all-zero slice to disable DoF regardless of `params.fstop`.
pub fn sample_grid(
    grids: &[Grid],
    key_times: &[f32],
    times: &[f32],
    lens_uv: &[Vec2],
    params: &HiderParams,
    occlusion: Option<&OcclusionTree>,
    tile: &mut SampleTile,
) {
    assert!(!grids.is_empty(), "sample_grid needs at least the primary key's grid");
    assert_eq!(grids.len(), key_times.len());

    let primary = &grids[0];
    let storage = primary.storage();
    let output_vars = storage.var_set().clone();
    let tw = tile.width();
    let th = tile.height();
    debug_assert_eq!(lens_uv.len(), (tw * th) as usize);
    debug_assert_eq!(times.len(), (tw * th) as usize);

    let key_p_views: Vec<_> = grids.iter().map(|g| g.storage().p()).collect();

    for (_u, _v, quad) in primary.iter_quads() {
        let corners_by_key: Vec<[Vec3; 4]> = grids
            .iter()
            .zip(&key_p_views)
            .map(|(g, view)| {
                [
                    read_p(*view, g.storage().raw(), quad.a),
                    read_p(*view, g.storage().raw(), quad.b),
                    read_p(*view, g.storage().raw(), quad.c),
                    read_p(*view, g.storage().raw(), quad.d),
                ]
            })
            .collect();

        let (z_min, z_max) = corners_by_key.iter().flatten().fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.z), hi.max(p.z))
        });
        let z_mean = (z_min + z_max) * 0.5;

        let coc = circle_of_confusion(
            z_mean,
            params.fstop,
            params.focal_length,
            params.focal_distance,
            params.raster_pixel_size,
        );

        let (raster_min, raster_max) = corners_by_key.iter().flatten().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(p.truncate()), hi.max(p.truncate())),
        );
        // A DoF-shifted sample can fall up to `coc` outside the sharp quad's
        // bound, so pad the candidate search region by it.
        let pad = Vec2::splat(coc.abs());

        let anchor = tile.anchor().as_vec2();
        let lo = (raster_min - pad - anchor).floor();
        let hi = (raster_max + pad - anchor).ceil();
        let lo_x = lo.x.max(0.0) as u32;
        let lo_y = lo.y.max(0.0) as u32;
        let hi_x = (hi.x as i32).clamp(0, tw as i32) as u32;
        let hi_y = (hi.y as i32).clamp(0, th as i32) as u32;
        if lo_x >= hi_x || lo_y >= hi_y {
            continue;
        }

        if let Some(tree) = occlusion {
            let bound = reyes_math::Box2i::new(IVec2::new(lo_x as i32, lo_y as i32), IVec2::new(hi_x as i32, hi_y as i32));
            if tree.is_occluded(bound, z_min) {
                continue;
            }
        }

        for ty in lo_y..hi_y {
            for tx in lo_x..hi_x {
                let cell = (ty * tw + tx) as usize;
                let t = times.get(cell).copied().unwrap_or(key_times[0]);
                let (key_lo, key_hi, w) = straddle(t, key_times);
                let corners2d: [Vec2; 4] = std::array::from_fn(|i| {
                    corners_by_key[key_lo][i].truncate().lerp(corners_by_key[key_hi][i].truncate(), w)
                });
                let zs: [f32; 4] = std::array::from_fn(|i| {
                    let a = corners_by_key[key_lo][i].z;
                    let b = corners_by_key[key_hi][i].z;
                    a + (b - a) * w
                });

                let lens = lens_uv.get(cell).copied().unwrap_or(Vec2::ZERO);
                let shift = crate::dof::circle_of_confusion_shift(lens, coc);
                // Testing `pos - shift` against the unshifted quad is
                // equivalent to shifting the quad's vertices by `shift`.
                let test_point = tile.sample(tx, ty).pos - shift;
                if !point_in_quad(corners2d, _u as u32, _v as u32, test_point) {
                    continue;
                }
                let (bu, bv) = inverse_bilinear(corners2d[0], corners2d[1], corners2d[2], corners2d[3], test_point);
                let z = bilerp(zs[0], zs[1], zs[2], zs[3], bu, bv);

                let sample = tile.sample_mut(tx, ty);
                if !sample.record(z) {
                    continue;
                }

                let fragment = tile.fragment_mut(tx, ty);
                write_fragment(storage, &output_vars, quad, bu, bv, params.smooth_shading, fragment);
            }
        }
    }
}

/// Finds the two key indices straddling `time` and the interpolation weight
/// toward the later one. `key_times` must be sorted ascending; a single key
/// straddles itself with weight `0.0`.
fn straddle(time: f32, key_times: &[f32]) -> (usize, usize, f32) {
    let k = key_times.len();
    if k == 1 {
        return (0, 0, 0.0);
    }
    if time <= key_times[0] {
        return (0, 1, 0.0);
    }
    if time >= key_times[k - 1] {
        return (k - 2, k - 1, 1.0);
    }
    for i in 0..k - 1 {
        if time >= key_times[i] && time <= key_times[i + 1] {
            let span = key_times[i + 1] - key_times[i];
            let w = if span > 0.0 { (time - key_times[i]) / span } else { 0.0 };
            return (i, i + 1, w);
        }
    }
    (0, 0, 0.0)
}

fn read_p(view: reyes_grid::FvecView, raw: &[f32], vert: usize) -> Vec3 {
    let s = view.get(raw, vert);
    Vec3::new(s[0], s[1], s[2])
}

fn write_fragment(
    storage: &reyes_grid::GridStorage,
    output_vars: &reyes_varspec::VarSet,
    quad: reyes_grid::MicroQuadIndices,
    u: f32,
    v: f32,
    smooth_shading: bool,
    fragment: &mut reyes_sample::Fragment,
) {
    let mut frag_offset = 0usize;
    for out_spec in output_vars.iter() {
        let size = out_spec.scalar_size();
        if let Some(grid_idx) = storage.var_set().find(out_spec) {
            let view = storage.view(grid_idx);
            let raw = storage.raw();
            let dst = &mut fragment.as_mut_slice()[frag_offset..frag_offset + size];
            if view.is_uniform() {
                dst.copy_from_slice(view.get(raw, 0));
            } else if smooth_shading {
                let a = view.get(raw, quad.a);
                let b = view.get(raw, quad.b);
                let c = view.get(raw, quad.c);
                let d = view.get(raw, quad.d);
                for i in 0..size {
                    dst[i] = bilerp(a[i], b[i], c[i], d[i], u, v);
                }
            } else {
                // Flat shading: every sample within the micropolygon takes
                // the upper-left corner's value.
                dst.copy_from_slice(view.get(raw, quad.d));
            }
        }
        frag_offset += size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2 as GIVec2;
    use reyes_grid::{GridStorageBuilder, StorClass};
    use reyes_varspec::Stdvar;

    fn flat_shaded_grid(dx: f32) -> Grid {
        let mut builder = GridStorageBuilder::new();
        builder.add(Stdvar::p(), StorClass::Varying);
        builder.add(Stdvar::ci(), StorClass::Varying);
        let mut storage = builder.build(4);
        let p = storage.view_for(&Stdvar::p()).unwrap();
        let pts = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)];
        for (i, (x, y)) in pts.iter().enumerate() {
            p.get_mut(storage.raw_mut(), i).copy_from_slice(&[*x + dx, *y, 5.0]);
        }
        let ci = storage.view_for(&Stdvar::ci()).unwrap();
        let colors = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0, 1.0]];
        for (i, c) in colors.iter().enumerate() {
            ci.get_mut(storage.raw_mut(), i).copy_from_slice(c);
        }
        Grid::new(2, 2, storage)
    }

    fn tile_with_positions(w: u32, h: u32, output_vars: &reyes_varspec::VarSet) -> SampleTile {
        let mut tile = SampleTile::new(w, h, GIVec2::new(0, 0), GIVec2::new(0, 0), output_vars);
        for y in 0..h {
            for x in 0..w {
                tile.sample_mut(x, y).pos = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            }
        }
        tile
    }

    #[test]
    fn sample_inside_quad_gets_nearer_z_and_interpolated_color() {
        let grid = flat_shaded_grid(0.0);
        let output_vars = reyes_varspec::VarSet::from_unsorted(vec![Stdvar::ci(), Stdvar::z()]);
        let mut tile = tile_with_positions(4, 4, &output_vars);
        let lens_uv = vec![Vec2::ZERO; 16];
        let times = vec![0.0; 16];
        let params = HiderParams::default();
        sample_grid(&[grid], &[0.0], &times, &lens_uv, &params, None, &mut tile);

        assert_eq!(tile.sample(2, 2).z, 5.0);
        let frag = tile.fragment(2, 2);
        assert!(frag.as_slice().iter().any(|&x| x > 0.0));
    }

    #[test]
    fn farther_sample_does_not_overwrite_nearer_hit() {
        let grid = flat_shaded_grid(0.0);
        let output_vars = reyes_varspec::VarSet::from_unsorted(vec![Stdvar::ci(), Stdvar::z()]);
        let mut tile = SampleTile::new(1, 1, GIVec2::new(0, 0), GIVec2::new(0, 0), &output_vars);
        tile.sample_mut(0, 0).pos = Vec2::new(2.0, 2.0);
        tile.sample_mut(0, 0).z = 1.0;
        let lens_uv = vec![Vec2::ZERO; 1];
        let times = vec![0.0; 1];
        let params = HiderParams::default();
        sample_grid(&[grid], &[0.0], &times, &lens_uv, &params, None, &mut tile);
        assert_eq!(tile.sample(0, 0).z, 1.0);
    }

    #[test]
    fn motion_blurred_sample_uses_the_straddling_keys_position() {
        // Key 0 at t=0 covers raster x in [0,4]; key 1 at t=1 covers x in
        // [4,8] (translated by +4). A sample's hit should track whichever
        // key(s) straddle its own time, per §4.2.
        let key0 = flat_shaded_grid(0.0);
        let key1 = flat_shaded_grid(4.0);
        let key_times = [0.0, 1.0];
        let output_vars = reyes_varspec::VarSet::from_unsorted(vec![Stdvar::ci(), Stdvar::z()]);
        let n = (8 * 4) as usize;
        let lens_uv = vec![Vec2::ZERO; n];
        let params = HiderParams::default();

        let mut tile_t0 = tile_with_positions(8, 4, &output_vars);
        let times_t0 = vec![0.0; n];
        sample_grid(&[key0.clone(), key1.clone()], &key_times, &times_t0, &lens_uv, &params, None, &mut tile_t0);
        assert!(tile_t0.sample(1, 2).z.is_finite());
        assert!(!tile_t0.sample(6, 2).z.is_finite());

        let mut tile_t1 = tile_with_positions(8, 4, &output_vars);
        let times_t1 = vec![1.0; n];
        sample_grid(&[key0, key1], &key_times, &times_t1, &lens_uv, &params, None, &mut tile_t1);
        assert!(!tile_t1.sample(1, 2).z.is_finite());
        assert!(tile_t1.sample(6, 2).z.is_finite());
    }
}
