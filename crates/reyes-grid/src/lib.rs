//! Grid storage: a single packed `float` buffer backing every variable
//! attached to one dice grid, plus the `(u, v)` lattice that walks it as
//! micropolygons.

mod storage;
pub use storage::{FvecView, GridStorage, GridStorageBuilder, StorClass};

mod grid;
pub use grid::{Grid, MicroQuadIndices};
