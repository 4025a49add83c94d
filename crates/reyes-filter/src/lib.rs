//! Pixel reconstruction: filter kernels, a coefficient cache built once per
//! `(kernel, samples-per-pixel)` pair (§4.6), and the processor that gathers
//! finished sample tiles into 2x2 neighborhoods and emits filtered output
//! tiles to display sinks.

mod kernel;
pub use kernel::{BoxFilter, DiscFilter, FilterKernel, GaussianFilter, SincFilter};

mod cache;
pub use cache::CachedFilter;

mod processor;
pub use processor::FilterProcessor;
