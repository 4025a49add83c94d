//! The renderer facade: options, diagnostics routing, and the `Renderer`
//! that ties geometry submission to a completed render (§6, §7).
//!
//! Every other `reyes-*` crate is a piece of the pipeline; this crate is
//! the only one a front end needs to depend on directly.

mod diagnostics;
pub use diagnostics::{DiagnosticSink, Severity, StderrSink, TracingSink};

mod error;
pub use error::RenderError;

mod options;
pub use options::{Options, PixelFilter};

mod renderer;
pub use renderer::Renderer;

mod tracing_setup;
pub use tracing_setup::install_tracing_subscriber;
