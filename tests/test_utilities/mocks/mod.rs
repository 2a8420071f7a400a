/// Mock implementations for testing
mod mock_diagnostic_sink;
mod mock_sql_request;

pub use mock_diagnostic_sink::MockDiagnosticSink;
pub use mock_sql_request::MockSqlRequest;
