use std::sync::Mutex;

use glam::IVec2;

use reyes_filter::FilterProcessor;
use reyes_splitstore::SplitStore;

use crate::bucket::render_bucket;
use crate::config::RenderConfig;
use crate::order::BucketOrder;

/// Run every bucket in `order` across `num_threads` worker threads, pulling
/// bucket positions off a shared channel so an idle worker can pick up the
/// next bucket as soon as it's free. `order` only constrains *grouping* of
/// work (e.g. a block's buckets are pushed contiguously); dispatch within a
/// group is first-come, first-served.
pub fn run(
    store: &Mutex<SplitStore>,
    cfg: &RenderConfig,
    filter: &FilterProcessor,
    order: &BucketOrder,
    num_threads: usize,
) -> anyhow::Result<()> {
    let (nx, ny) = {
        let store = store.lock().expect("split store poisoned");
        (store.nx_buckets(), store.ny_buckets())
    };
    let sequence = order.sequence(nx, ny);

    let (tx, rx) = crossbeam_channel::unbounded::<IVec2>();
    for pos in sequence {
        tx.send(pos).expect("receiver outlives every sender while the scope is open");
    }
    drop(tx);

    let first_error: Mutex<Option<anyhow::Error>> = Mutex::new(None);

    std::thread::scope(|scope| {
        for worker in 0..num_threads.max(1) {
            let rx = rx.clone();
            let first_error = &first_error;
            scope.spawn(move || {
                tracing::debug!(target: "reyes_scheduler", worker, "bucket worker started");
                while let Ok(pos) = rx.recv() {
                    if first_error.lock().expect("poisoned").is_some() {
                        break;
                    }
                    if let Err(e) = render_bucket(store, pos.x, pos.y, cfg, filter) {
                        tracing::error!(target: "reyes_scheduler", bucket_x = pos.x, bucket_y = pos.y, error = %e, "bucket render failed");
                        let mut slot = first_error.lock().expect("poisoned");
                        if slot.is_none() {
                            *slot = Some(e);
                        }
                        break;
                    }
                }
            });
        }
    });

    if let Some(e) = first_error.into_inner().expect("poisoned") {
        return Err(e);
    }
    Ok(())
}
