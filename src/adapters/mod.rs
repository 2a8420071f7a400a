/// Adapters layer - Infrastructure implementations
///
/// This layer contains the concrete templates callers use: console input,
/// encoded file I/O and SQLite requests, plus the stderr diagnostic sink.
pub mod outbound;
