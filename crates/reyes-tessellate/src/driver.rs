use reyes_geom::{Attributes, GeometryRef, TessellationContext};
use reyes_grid::{Grid, GridStorageBuilder};
use reyes_math::Mat4;

use crate::coc::min_coc_over_range;
use crate::holder::{GeomHolder, TessellateOutcome};

/// Renderer-wide limits and lens parameters the driver needs but doesn't
/// own; constructed from `Options` by the facade crate.
#[derive(Debug, Clone, Copy)]
pub struct DriverLimits {
    pub max_eye_splits: u32,
    pub max_splits: u32,
    pub grid_size: u32,
    pub fstop: f32,
    pub focal_length: f32,
    pub focal_distance: f32,
    pub raster_pixel_size: f32,
    pub clip_near: f32,
}

/// One holder's tessellation pass. Implements [`TessellationContext`] for
/// exactly the geometry it drives, collecting whatever the geometry pushes.
pub struct TessDriver<'a> {
    attributes: &'a Attributes,
    poly_length: f32,
    grid_size: u32,
    force_split: bool,
    force_split_count: u32,
    builder: GridStorageBuilder,
    children: Vec<GeometryRef>,
    grids: Vec<Grid>,
}

impl<'a> TessDriver<'a> {
    pub fn new(
        attributes: &'a Attributes,
        holder: &GeomHolder,
        limits: &DriverLimits,
        force_split_count: u32,
    ) -> Self {
        let z_near = holder.bound.min.z;
        let z_far = holder.bound.max.z;
        let coc = min_coc_over_range(
            z_near,
            z_far,
            limits.fstop,
            limits.focal_length,
            limits.focal_distance,
            limits.raster_pixel_size,
        );
        let poly_length = attributes.poly_length() * (1.0 + attributes.focus_factor * coc);
        let force_split = holder.bound.min.z < limits.clip_near && holder.bound.max.z > limits.clip_near;
        Self {
            attributes,
            poly_length,
            grid_size: limits.grid_size,
            force_split,
            force_split_count,
            builder: GridStorageBuilder::new(),
            children: Vec::new(),
            grids: Vec::new(),
        }
    }

    /// One key's raw tessellation output, before the per-holder outcome is
    /// assembled across all keys.
    pub(crate) fn into_outcome(self) -> RawOutcome {
        if !self.grids.is_empty() {
            RawOutcome::Grids(self.grids)
        } else {
            RawOutcome::Children(self.children)
        }
    }
}

/// One motion key's tessellation result, kept distinct from
/// [`TessellateOutcome`] until every key has run and `zip_outcomes` can
/// check they all agree.
pub(crate) enum RawOutcome {
    Children(Vec<GeometryRef>),
    Grids(Vec<Grid>),
}

impl<'a> TessellationContext for TessDriver<'a> {
    fn poly_length(&self) -> f32 {
        self.poly_length
    }

    fn grid_size(&self) -> u32 {
        self.grid_size
    }

    fn force_split(&self) -> bool {
        self.force_split
    }

    fn force_split_count(&self) -> u32 {
        self.force_split_count
    }

    fn attributes(&self) -> &Attributes {
        self.attributes
    }

    fn push_geometry(&mut self, geom: GeometryRef) {
        self.children.push(geom);
    }

    fn push_grid(&mut self, grid: Grid) {
        self.grids.push(grid);
    }

    fn grid_storage_builder(&mut self) -> &mut GridStorageBuilder {
        &mut self.builder
    }
}

/// Run the full tessellation pass for `holder`, respecting the
/// tessellate-once lock, the eye-split limit, and the split-count limit.
/// Returns `Ok(true)` if the holder produced an outcome, `Ok(false)` if it
/// was discarded (limits exceeded, or already done).
pub fn tessellate_holder(
    holder: &GeomHolder,
    split_trans: Mat4,
    limits: &DriverLimits,
    eye_split_depth: u32,
) -> anyhow::Result<bool> {
    if holder.is_done() {
        return Ok(true);
    }
    if holder.split_count > limits.max_splits {
        tracing::warn!(target: "reyes_tessellate", split_count = holder.split_count, "surface discarded: max_splits exceeded");
        return Ok(false);
    }
    if eye_split_depth > limits.max_eye_splits {
        tracing::warn!(target: "reyes_tessellate", eye_split_depth, "surface discarded: max_eye_splits exceeded");
        return Ok(false);
    }

    let mut err: Option<anyhow::Error> = None;
    holder.tessellate_once(|| {
        let mut driver = TessDriver::new(&holder.attributes, holder, limits, eye_split_depth);
        let forced = driver.force_split();
        if let Err(e) = holder.primary().tessellate(split_trans, &mut driver) {
            err = Some(e);
        }
        let primary_outcome = driver.into_outcome();
        let mut per_key = vec![primary_outcome];
        if holder.is_deforming() {
            for key in &holder.keys[1..] {
                let mut key_driver = TessDriver::new(&holder.attributes, holder, limits, eye_split_depth);
                let _ = key.tessellate(split_trans, &mut key_driver);
                let key_outcome = key_driver.into_outcome();
                if !outcomes_match(&per_key[0], &key_outcome) {
                    tracing::error!(target: "reyes_tessellate", "motion-blurred surface discarded: keys produced mismatched tessellation");
                    return Ok(TessellateOutcome::Children { keys: vec![vec![]], forced });
                }
                per_key.push(key_outcome);
            }
        }
        Ok(zip_outcomes(per_key, forced))
    })?;
    if let Some(e) = err {
        return Err(e);
    }
    Ok(true)
}

fn outcomes_match(a: &RawOutcome, b: &RawOutcome) -> bool {
    match (a, b) {
        (RawOutcome::Children(ca), RawOutcome::Children(cb)) => ca.len() == cb.len(),
        (RawOutcome::Grids(ga), RawOutcome::Grids(gb)) => ga.len() == gb.len(),
        _ => false,
    }
}

/// Assemble each key's raw outcome (already checked pairwise-consistent by
/// `outcomes_match`) into the holder's single [`TessellateOutcome`], keeping
/// every key's children/grids rather than collapsing to the primary's.
fn zip_outcomes(per_key: Vec<RawOutcome>, forced: bool) -> TessellateOutcome {
    if matches!(per_key[0], RawOutcome::Grids(_)) {
        let grids = per_key
            .into_iter()
            .map(|raw| match raw {
                RawOutcome::Grids(g) => g,
                RawOutcome::Children(_) => unreachable!("outcomes_match guarantees matching variants"),
            })
            .collect();
        TessellateOutcome::Grids(grids)
    } else {
        let keys = per_key
            .into_iter()
            .map(|raw| match raw {
                RawOutcome::Children(c) => c,
                RawOutcome::Grids(_) => unreachable!("outcomes_match guarantees matching variants"),
            })
            .collect();
        TessellateOutcome::Children { keys, forced }
    }
}
