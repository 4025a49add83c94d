use std::sync::{Arc, Mutex};

use reyes_filter::FilterProcessor;
use reyes_splitstore::SplitStore;

use crate::config::RenderConfig;
use crate::order::BucketOrder;
use crate::pool;

/// Ties a render's geometry store, shared config, filter processor and
/// bucket order together, and owns the worker pool that drains them.
pub struct Scheduler {
    store: Mutex<SplitStore>,
    config: Arc<RenderConfig>,
    filter: Arc<FilterProcessor>,
    order: BucketOrder,
    /// `None` means auto-detect via `std::thread::available_parallelism`
    /// (the `-1` sentinel in `Options::num_threads`).
    num_threads: Option<usize>,
}

impl Scheduler {
    pub fn new(
        store: SplitStore,
        config: Arc<RenderConfig>,
        filter: Arc<FilterProcessor>,
        order: BucketOrder,
        num_threads: Option<usize>,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            config,
            filter,
            order,
            num_threads,
        }
    }

    pub fn render(&self) -> anyhow::Result<()> {
        let num_threads = self.num_threads.unwrap_or_else(|| {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        });
        tracing::info!(target: "reyes_scheduler", num_threads, "starting bucket render");
        pool::run(&self.store, &self.config, &self.filter, &self.order, num_threads)
    }
}
