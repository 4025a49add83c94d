use std::io::Write;

/// Error classification (§7): only `Warning` and `Error` are user-visible
/// diagnostics routed through a [`DiagnosticSink`]; `Severe` surfaces to the
/// caller as a [`crate::error::RenderError`] instead, and `Debug`/`Info` are
/// verbose-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Where warnings and errors surfacing during a render are routed.
///
/// The render loop never stops for these (§7: "local recovery is used for
/// everything non-severe"); a sink just observes.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, severity: Severity, message: &str);
}

/// Default sink: stderr, colored by severity.
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn report(&self, severity: Severity, message: &str) {
        let (color, label) = match severity {
            Severity::Debug => ("\x1b[90m", "debug"),
            Severity::Info => ("\x1b[36m", "info"),
            Severity::Warning => ("\x1b[33m", "warning"),
            Severity::Error => ("\x1b[31m", "error"),
        };
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "{color}{label}\x1b[0m: {message}");
    }
}

/// Forwards every report to `tracing`, at the matching level, under the
/// `reyes_core::diagnostics` target. Useful when the front end already
/// routes its own log output through `tracing` and wants renders to do the
/// same rather than writing to stderr directly.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!(target: "reyes_core::diagnostics", "{message}"),
            Severity::Info => tracing::info!(target: "reyes_core::diagnostics", "{message}"),
            Severity::Warning => tracing::warn!(target: "reyes_core::diagnostics", "{message}"),
            Severity::Error => tracing::error!(target: "reyes_core::diagnostics", "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSink(Mutex<Vec<(Severity, String)>>);

    impl DiagnosticSink for RecordingSink {
        fn report(&self, severity: Severity, message: &str) {
            self.0.lock().unwrap().push((severity, message.to_string()));
        }
    }

    #[test]
    fn recording_sink_observes_reports_in_order() {
        let sink = RecordingSink(Mutex::new(Vec::new()));
        sink.report(Severity::Warning, "surface discarded");
        sink.report(Severity::Error, "bad parameter list");
        let log = sink.0.lock().unwrap();
        assert_eq!(log[0], (Severity::Warning, "surface discarded".to_string()));
        assert_eq!(log[1], (Severity::Error, "bad parameter list".to_string()));
    }
}
