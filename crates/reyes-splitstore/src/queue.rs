use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

use reyes_tessellate::GeomHolder;

use crate::store::SplitStore;

struct HeapItem(Arc<GeomHolder>);

impl HeapItem {
    fn z(&self) -> f32 {
        self.0.bound.min.z
    }
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.z() == other.z()
    }
}
impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.z().partial_cmp(&other.z()).unwrap_or(std::cmp::Ordering::Equal)
    }
}

/// Per-bucket priority queue of geometry, ordered so the nearest (min-z)
/// holder is always popped first — essential for the occluder cutoff to be
/// useful within the bucket.
pub struct GeometryQueue {
    queue: BinaryHeap<Reverse<HeapItem>>,
    bucket_bound: reyes_math::Box2,
}

impl GeometryQueue {
    pub fn for_bucket(store: &SplitStore, x: i32, y: i32) -> Self {
        let geoms = store.bucket_geoms(x, y);
        let mut queue = BinaryHeap::with_capacity(geoms.len());
        for g in geoms {
            queue.push(Reverse(HeapItem(g.clone())));
        }
        Self {
            queue,
            bucket_bound: store.bucket_bound(x, y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Pop the nearest (min-z) holder, or `None` if the queue is drained.
    pub fn pop(&mut self) -> Option<Arc<GeomHolder>> {
        self.queue.pop().map(|Reverse(item)| item.0)
    }

    /// Push a split child back onto the queue, if its bucket bound still
    /// touches this bucket.
    pub fn push(&mut self, holder: Arc<GeomHolder>) {
        let b = &holder.bucket_bound;
        let t = &self.bucket_bound;
        if b.min.x < t.max.x && b.min.y < t.max.y && b.max.x >= t.min.x && b.max.y >= t.min.y {
            self.queue.push(Reverse(HeapItem(holder)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reyes_geom::Attributes;
    use reyes_math::{Box2, Box3, Vec3};
    use std::sync::Arc as StdArc;

    fn holder_at_z(z: f32) -> StdArc<GeomHolder> {
        StdArc::new(GeomHolder::new(
            vec![],
            StdArc::new(Attributes::default()),
            Box3 {
                min: Vec3::new(0.0, 0.0, z),
                max: Vec3::new(1.0, 1.0, z),
            },
            Box2 {
                min: glam::Vec2::ZERO,
                max: glam::Vec2::new(16.0, 16.0),
            },
            0,
            0,
        ))
    }

    #[test]
    fn pop_returns_nearest_first() {
        let mut store = SplitStore::new(
            1,
            1,
            Box2 {
                min: glam::Vec2::ZERO,
                max: glam::Vec2::new(16.0, 16.0),
            },
        );
        store.insert(holder_at_z(5.0));
        store.insert(holder_at_z(1.0));
        store.insert(holder_at_z(3.0));
        let mut queue = GeometryQueue::for_bucket(&store, 0, 0);
        let mut zs = Vec::new();
        while let Some(h) = queue.pop() {
            zs.push(h.bound.min.z);
        }
        assert_eq!(zs, vec![1.0, 3.0, 5.0]);
    }
}
