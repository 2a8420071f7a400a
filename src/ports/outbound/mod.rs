/// Outbound ports (Driven ports) - Interfaces the templates call out to
///
/// These ports define where diagnostics are sent and how a database
/// request plugs into the request template.
pub mod diagnostic_sink;
pub mod sql_request;

pub use diagnostic_sink::DiagnosticSink;
pub use sql_request::SqlRequest;
