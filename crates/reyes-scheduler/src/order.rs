use glam::IVec2;

/// How buckets are handed out to worker threads (§4.5): strict raster scan,
/// fixed-size blocks scanned in raster order with buckets inside a block
/// available for any worker to steal, or a caller-supplied sequence.
pub enum BucketOrder {
    Raster,
    TwoBlockRaster { block: IVec2 },
    Custom(Vec<IVec2>),
}

impl BucketOrder {
    /// Expand into the concrete bucket sequence for a `(nx, ny)` grid.
    ///
    /// For `TwoBlockRaster`, buckets are grouped by block in raster order,
    /// but the order *within* a block doesn't matter for correctness (it's
    /// the worker pool's job queue, not this sequence, that lets idle
    /// workers steal from a block in progress) — buckets within a block are
    /// still emitted in raster order here for determinism of the returned
    /// `Vec`, but the pool dispatches a whole block's buckets as one batch
    /// so workers can pull from it out of order.
    pub fn sequence(&self, nx: i32, ny: i32) -> Vec<IVec2> {
        match self {
            BucketOrder::Raster => raster_sequence(nx, ny),
            BucketOrder::TwoBlockRaster { block } => block_sequence(nx, ny, *block),
            BucketOrder::Custom(seq) => seq.clone(),
        }
    }
}

fn raster_sequence(nx: i32, ny: i32) -> Vec<IVec2> {
    let mut out = Vec::with_capacity((nx * ny).max(0) as usize);
    for y in 0..ny {
        for x in 0..nx {
            out.push(IVec2::new(x, y));
        }
    }
    out
}

fn block_sequence(nx: i32, ny: i32, block: IVec2) -> Vec<IVec2> {
    let bx = block.x.max(1);
    let by = block.y.max(1);
    let mut out = Vec::with_capacity((nx * ny).max(0) as usize);
    let mut by0 = 0;
    while by0 < ny {
        let mut bx0 = 0;
        while bx0 < nx {
            for y in by0..(by0 + by).min(ny) {
                for x in bx0..(bx0 + bx).min(nx) {
                    out.push(IVec2::new(x, y));
                }
            }
            bx0 += bx;
        }
        by0 += by;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_order_is_row_major() {
        let seq = BucketOrder::Raster.sequence(2, 2);
        assert_eq!(seq, vec![IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(0, 1), IVec2::new(1, 1)]);
    }

    #[test]
    fn block_order_covers_every_bucket_exactly_once() {
        let seq = BucketOrder::TwoBlockRaster { block: IVec2::new(2, 2) }.sequence(5, 3);
        assert_eq!(seq.len(), 15);
        let mut sorted = seq.clone();
        sorted.sort_by_key(|p| (p.y, p.x));
        let mut expected: Vec<IVec2> = (0..3).flat_map(|y| (0..5).map(move |x| IVec2::new(x, y))).collect();
        expected.sort_by_key(|p| (p.y, p.x));
        assert_eq!(sorted, expected);
    }

    #[test]
    fn custom_order_is_passed_through_verbatim() {
        let custom = vec![IVec2::new(1, 1), IVec2::new(0, 0)];
        let seq = BucketOrder::Custom(custom.clone()).sequence(2, 2);
        assert_eq!(seq, custom);
    }
}
