/// Severe errors (§7): the render cannot continue. Everything less severe
/// (a discarded surface, a failed shader) is local recovery and never
/// reaches this type — it's reported through a [`crate::diagnostics::DiagnosticSink`]
/// instead.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface set has motion keys with incompatible topology")]
    MotionKeyMismatch,

    #[error("bucket worker pool failed: {0}")]
    Scheduler(#[source] anyhow::Error),

    #[error("failed to read options file {path}: {source}")]
    OptionsIo {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse options file {path}: {source}")]
    OptionsParse {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
