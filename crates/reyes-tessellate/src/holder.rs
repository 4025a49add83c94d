use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use reyes_geom::{Attributes, GeometryRef};
use reyes_grid::Grid;
use reyes_math::{Box2, Box3};

/// What a holder's tessellation produced.
///
/// Every motion key is tessellated independently, so both variants carry one
/// entry per key (index 0 is the primary key) rather than collapsing down to
/// the primary's result — the hider needs each key's `P` to interpolate
/// across the shutter per §4.2.
pub enum TessellateOutcome {
    /// Each key's primary split into children at the same index; `forced`
    /// records whether this split was an eye-split (crossed `clip_near`) as
    /// opposed to an ordinary shading-rate split.
    Children { keys: Vec<Vec<GeometryRef>>, forced: bool },
    /// Every key diced to a grid; `keys[0]` is the primary key's grids.
    Grids(Vec<Vec<Grid>>),
}

impl std::fmt::Debug for TessellateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TessellateOutcome::Children { keys, forced } => {
                write!(f, "Children {{ keys: {} motion keys, forced: {forced} }}", keys.len())
            }
            TessellateOutcome::Grids(grids) => write!(f, "Grids({} motion keys)", grids.len()),
        }
    }
}

/// A piece of geometry (or time-keyed set, for motion blur) inserted into
/// the render, tracked through exactly one tessellation pass.
///
/// `tessellate` on a given holder happens at most once: callers take the
/// per-holder lock, check `is_done`, and if not done, perform the
/// tessellation and call `finish`. Once `is_done()` is observed `true`, the
/// outcome can be read without taking the lock again.
pub struct GeomHolder {
    pub keys: Vec<GeometryRef>,
    pub attributes: Arc<Attributes>,
    pub bound: Box3,
    pub bucket_bound: Box2,
    pub split_count: u32,
    /// Forced (eye-)split recursion depth, tracked separately from
    /// `split_count`: only incremented for children of a split that crossed
    /// `clip_near`, so ordinary shading-rate splits never count against
    /// `max_eye_splits`.
    pub eye_split_depth: u32,
    outcome: Mutex<Option<TessellateOutcome>>,
    done: AtomicBool,
}

impl GeomHolder {
    pub fn new(
        keys: Vec<GeometryRef>,
        attributes: Arc<Attributes>,
        bound: Box3,
        bucket_bound: Box2,
        split_count: u32,
        eye_split_depth: u32,
    ) -> Self {
        Self {
            keys,
            attributes,
            bound,
            bucket_bound,
            split_count,
            eye_split_depth,
            outcome: Mutex::new(None),
            done: AtomicBool::new(false),
        }
    }

    pub fn primary(&self) -> &GeometryRef {
        &self.keys[0]
    }

    pub fn is_deforming(&self) -> bool {
        self.keys.len() > 1
    }

    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Run `f` to tessellate, store the outcome, and mark the holder done —
    /// all under the holder's lock. If another caller already finished the
    /// holder (or is mid-tessellation) by the time the lock is acquired,
    /// `f` is skipped.
    pub fn tessellate_once(
        &self,
        f: impl FnOnce() -> anyhow::Result<TessellateOutcome>,
    ) -> anyhow::Result<()> {
        if self.is_done() {
            return Ok(());
        }
        let mut guard = self.outcome.lock().unwrap();
        if self.done.load(Ordering::Relaxed) {
            return Ok(());
        }
        let outcome = f()?;
        *guard = Some(outcome);
        self.done.store(true, Ordering::Release);
        Ok(())
    }

    pub fn with_outcome<R>(&self, f: impl FnOnce(Option<&TessellateOutcome>) -> R) -> R {
        let guard = self.outcome.lock().unwrap();
        f(guard.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reyes_math::Vec3;

    fn empty_holder() -> GeomHolder {
        GeomHolder::new(
            vec![],
            Arc::new(Attributes::default()),
            Box3 {
                min: Vec3::ZERO,
                max: Vec3::ONE,
            },
            Box2 {
                min: glam::Vec2::ZERO,
                max: glam::Vec2::ONE,
            },
            0,
            0,
        )
    }

    #[test]
    fn tessellate_once_skips_second_call() {
        let holder = empty_holder();
        let mut calls = 0;
        holder
            .tessellate_once(|| {
                calls += 1;
                Ok(TessellateOutcome::Children { keys: vec![vec![]], forced: false })
            })
            .unwrap();
        holder
            .tessellate_once(|| {
                calls += 1;
                Ok(TessellateOutcome::Children { keys: vec![vec![]], forced: false })
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert!(holder.is_done());
    }
}
