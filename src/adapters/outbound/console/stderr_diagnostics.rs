use crate::ports::outbound::DiagnosticSink;
use std::error::Error;

/// StderrDiagnosticSink adapter for printing diagnostics to stderr
///
/// This adapter implements the DiagnosticSink port. Errors are printed with
/// their full `Caused by:` chain so the origin of a failure stays visible.
#[derive(Debug, Clone, Copy)]
pub struct StderrDiagnosticSink;

impl StderrDiagnosticSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StderrDiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders an error and its source chain, one `Caused by:` line per level.
pub fn render_error_chain(error: &dyn Error) -> String {
    let mut rendered = error.to_string();
    let mut source = error.source();
    while let Some(err) = source {
        rendered.push_str("\nCaused by: ");
        rendered.push_str(&err.to_string());
        source = err.source();
    }
    rendered
}

impl DiagnosticSink for StderrDiagnosticSink {
    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }

    fn report_error(&self, message: &str, error: &dyn Error) {
        eprintln!("{}", message);
        eprintln!("{}", render_error_chain(error));
    }
}
