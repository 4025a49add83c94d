//! The split/dice driver: owns [`GeomHolder`] lifecycle (tessellate-once,
//! split-count limits, eye splits), computes the depth-of-field-adjusted
//! poly length, and runs the post-dice standard-variable derivation and
//! shading order over the grids a holder's geometry produces.

mod coc;
pub use coc::circle_of_confusion;

mod holder;
pub use holder::{GeomHolder, TessellateOutcome};

mod driver;
pub use driver::{tessellate_holder, DriverLimits, TessDriver};

mod derive;
pub use derive::derive_standard_variables;

mod shade;
pub use shade::shade_grid;
