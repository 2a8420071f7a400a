use std::error::Error;

/// DiagnosticSink port for printed diagnostics
///
/// Every template reports its failures through this port instead of writing
/// to stderr directly, so callers can redirect or capture them.
pub trait DiagnosticSink {
    /// Reports an informational or warning message
    ///
    /// # Arguments
    /// * `message` - The message to report
    fn report(&self, message: &str);

    /// Reports a failure together with the error that caused it
    ///
    /// # Arguments
    /// * `message` - The fixed diagnostic line(s) for this failure
    /// * `error` - The underlying error; implementations should render its source chain
    fn report_error(&self, message: &str, error: &dyn Error);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &T {
    fn report(&self, message: &str) {
        (**self).report(message)
    }

    fn report_error(&self, message: &str, error: &dyn Error) {
        (**self).report_error(message, error)
    }
}
