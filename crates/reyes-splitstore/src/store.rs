use std::sync::Arc;

use reyes_math::{ifloor, Box2};
use reyes_tessellate::GeomHolder;

struct Bucket {
    geoms: Vec<Arc<GeomHolder>>,
    bound: Box2,
}

/// Geometry storage for splitting, indexed by bucket so that any bucket's
/// top-level geometry can be retrieved independent of render order.
///
/// `insert` is single-threaded (run once before rendering starts); after
/// that, each bucket's vector is read-only until that bucket completes and
/// frees it.
pub struct SplitStore {
    buckets: Vec<Bucket>,
    nx_buckets: i32,
    ny_buckets: i32,
    bound: Box2,
}

impl SplitStore {
    pub fn new(nx_buckets: i32, ny_buckets: i32, bound: Box2) -> Self {
        let size = bound.max - bound.min;
        let bucket_size = glam::Vec2::new(size.x / nx_buckets as f32, size.y / ny_buckets as f32);
        let mut buckets = Vec::with_capacity((nx_buckets * ny_buckets) as usize);
        for j in 0..ny_buckets {
            for i in 0..nx_buckets {
                let min = bound.min + bucket_size * glam::Vec2::new(i as f32, j as f32);
                let max = bound.min + bucket_size * glam::Vec2::new((i + 1) as f32, (j + 1) as f32);
                buckets.push(Bucket {
                    geoms: Vec::new(),
                    bound: Box2 { min, max },
                });
            }
        }
        Self {
            buckets,
            nx_buckets,
            ny_buckets,
            bound,
        }
    }

    pub fn nx_buckets(&self) -> i32 {
        self.nx_buckets
    }

    pub fn ny_buckets(&self) -> i32 {
        self.ny_buckets
    }

    fn bucket_index(&self, x: i32, y: i32) -> usize {
        (y * self.nx_buckets + x) as usize
    }

    /// Range of bucket coordinates `[x0, x1) x [y0, y1)` that `bnd` touches.
    pub fn bucket_range_for_bound(&self, bnd: &Box2) -> (i32, i32, i32, i32) {
        let width = self.bound.max.x - self.bound.min.x;
        let height = self.bound.max.y - self.bound.min.y;
        let x0 = (ifloor(self.nx_buckets as f32 * (bnd.min.x - self.bound.min.x) / width))
            .clamp(0, self.nx_buckets - 1);
        let x1 = (ifloor(self.nx_buckets as f32 * (bnd.max.x - self.bound.min.x) / width) + 1)
            .clamp(0, self.nx_buckets);
        let y0 = (ifloor(self.ny_buckets as f32 * (bnd.min.y - self.bound.min.y) / height))
            .clamp(0, self.ny_buckets - 1);
        let y1 = (ifloor(self.ny_buckets as f32 * (bnd.max.y - self.bound.min.y) / height) + 1)
            .clamp(0, self.ny_buckets);
        (x0, x1, y0, y1)
    }

    /// Insert a root holder into every bucket its raster bound touches.
    /// Not thread-safe; only for associating initial geometry with buckets
    /// before the render's worker pool starts.
    pub fn insert(&mut self, holder: Arc<GeomHolder>) {
        if !self.bound.intersects(&holder.bucket_bound) {
            return;
        }
        let (x0, x1, y0, y1) = self.bucket_range_for_bound(&holder.bucket_bound);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = self.bucket_index(x, y);
                self.buckets[idx].geoms.push(holder.clone());
            }
        }
    }

    pub(crate) fn bucket_geoms(&self, x: i32, y: i32) -> &[Arc<GeomHolder>] {
        &self.buckets[self.bucket_index(x, y)].geoms
    }

    pub(crate) fn bucket_bound(&self, x: i32, y: i32) -> Box2 {
        self.buckets[self.bucket_index(x, y)].bound
    }

    /// Free the geometry vector for a completed bucket.
    pub fn finish_bucket(&mut self, x: i32, y: i32) {
        let idx = self.bucket_index(x, y);
        self.buckets[idx].geoms = Vec::new();
    }
}
