use crate::ports::outbound::DiagnosticSink;
use std::cell::RefCell;
use std::error::Error;

/// Sink that records every diagnostic as `"<message>: <error>"`.
#[derive(Default)]
pub(crate) struct CapturingSink {
    pub(crate) messages: RefCell<Vec<String>>,
}

impl CapturingSink {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl DiagnosticSink for CapturingSink {
    fn report(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }

    fn report_error(&self, message: &str, error: &dyn Error) {
        self.messages
            .borrow_mut()
            .push(format!("{}: {}", message, error));
    }
}
