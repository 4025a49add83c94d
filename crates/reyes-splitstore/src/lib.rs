//! Bucket-indexed geometry storage: holds every root piece of geometry in
//! the bucket(s) its raster bound touches, and hands a per-bucket queue of
//! it out ordered nearest-first so the occlusion cutoff stays useful.

mod store;
pub use store::SplitStore;

mod queue;
pub use queue::GeometryQueue;
