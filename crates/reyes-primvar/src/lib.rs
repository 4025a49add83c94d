//! Per-surface primitive variable storage: each [`Primvar`] is a typed array
//! tagged with the RenderMan interpolation class that says how many of its
//! elements a given topology carries.

mod class;
pub use class::{InterpClass, Topology};

mod store;
pub use store::{Primvar, PrimvarError, PrimvarStore};
