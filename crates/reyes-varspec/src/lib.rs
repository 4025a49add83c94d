//! Typed, sorted variable specifications shared by primvars, grids and
//! shading: [`VarSpec`] names a single variable's type/array-size/name, and
//! [`VarSet`] is the immutable sorted collection of them that the grid and
//! primvar stores index into.

mod spec;
pub use spec::{VarSpec, VarType};

mod stdvar;
pub use stdvar::Stdvar;

mod varset;
pub use varset::{StdId, StdIndices, VarSet};
