/// Console adapters for interactive input and diagnostics
mod console_reader;
mod stderr_diagnostics;

pub use console_reader::{
    ConsoleOptions, ConsoleReader, DEFAULT_QUIT_WORD,
    MAX_CONSECUTIVE_READ_FAILURES,
};
pub use stderr_diagnostics::{render_error_chain, StderrDiagnosticSink};
