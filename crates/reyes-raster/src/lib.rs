//! The micropolygon sampler ("hider"): for every micropolygon of every
//! grid, writes a fragment at every sample it covers whose z is nearer
//! than what's already recorded.

mod quad;
pub use quad::{classify, point_in_quad, QuadClass};

mod inversebilinear;
pub use inversebilinear::inverse_bilinear;

mod dof;
pub use dof::circle_of_confusion_shift;

mod hider;
pub use hider::{sample_grid, HiderParams};
