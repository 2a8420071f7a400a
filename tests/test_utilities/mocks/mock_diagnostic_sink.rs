use project_common::prelude::*;
use std::error::Error;

/// Mock DiagnosticSink for testing that captures messages
#[derive(Default, Clone)]
pub struct MockDiagnosticSink {
    pub messages: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

impl MockDiagnosticSink {
    pub fn new() -> Self {
        Self {
            messages: std::sync::Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

impl DiagnosticSink for MockDiagnosticSink {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn report_error(&self, message: &str, error: &dyn Error) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("{}: {}", message, error));
    }
}
