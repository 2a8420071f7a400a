//! project-common - template helpers for small one-shot programs
//!
//! This library bundles four helpers that take the repetitive resource
//! handling out of console utilities and batch scripts:
//!
//! - [`ConsoleReader`](adapters::outbound::console::ConsoleReader): prompts
//!   on standard input with re-prompting and a quit word
//! - [`FileReaderTemplate`](adapters::outbound::filesystem::FileReaderTemplate):
//!   streams the lines of an encoded text file to a predicate
//! - [`FileWriterTemplate`](adapters::outbound::filesystem::FileWriterTemplate):
//!   hands an encoding writer to a body and always flushes and closes
//! - [`SqlRequestTemplate`](adapters::outbound::database::SqlRequestTemplate):
//!   runs a request against SQLite and always releases the connection before
//!   the request's finally hook
//!
//! # Architecture
//!
//! - **Ports** (`ports`): the diagnostic sink and the database request hooks
//! - **Adapters** (`adapters`): the templates and the stderr sink
//! - **Config** (`config`): optional YAML defaults
//! - **Shared** (`shared`): error types and the `Result` alias
//!
//! # Example
//!
//! ```no_run
//! use project_common::prelude::*;
//!
//! let mut console = ConsoleReader::new();
//! let path = console.get_string_with("保存先のファイル名");
//!
//! FileWriterTemplate::new(&path, "UTF-8", true).start(|writer| {
//!     while !console.bool_and_string_with("メモを入力してください") {
//!         writer.write_line(console.last_string())?;
//!     }
//!     Ok(())
//! });
//!
//! FileReaderTemplate::new(&path, "UTF-8").start(|line| {
//!     println!("{}", line);
//!     true
//! });
//! ```

pub mod adapters;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::{
        ConsoleOptions, ConsoleReader, StderrDiagnosticSink,
    };
    pub use crate::adapters::outbound::database::{SqlHooks, SqlRequestTemplate, SqlStatement};
    pub use crate::adapters::outbound::filesystem::{
        FileReaderTemplate, FileWriterTemplate, TextEncoding, TextWriter,
    };
    pub use crate::config::{discover_config, load_config_from_path, ConfigFile};
    pub use crate::ports::outbound::{DiagnosticSink, SqlRequest};
    pub use crate::shared::error::{ConsoleError, DatabaseError, FileTemplateError};
    pub use crate::shared::Result;
}
