//! Sample positions and the sample tiles the micropolygon sampler writes
//! into. Sample positions and the time/lens assignment are generated once
//! per render and shared (by `Arc`) across every bucket; sample tiles are
//! per-bucket mutable storage.

mod lowdisc;
pub use lowdisc::{canonical_tuv, radical_inverse};

mod wangtile;
pub use wangtile::{TileKey, TileSet};

mod cache;
pub use cache::TileCache;

mod generator;
pub use generator::{stratified_positions, TimeLensSampler};

mod sample;
pub use sample::Sample;

mod fragment;
pub use fragment::Fragment;

mod sampletile;
pub use sampletile::SampleTile;
