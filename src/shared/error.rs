use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while prompting on the console.
///
/// The printing prompt methods never surface these; they are returned by the
/// `try_*` variants of [`ConsoleReader`](crate::adapters::outbound::console::ConsoleReader).
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The input stream reached end of file while a value was still expected.
    #[error("Console input was closed before a value was entered")]
    InputClosed,

    /// Reading kept failing; the stream is treated as broken.
    #[error("Console input failed {attempts} times in a row")]
    ReadFailed {
        attempts: u32,
        #[source]
        source: io::Error,
    },
}

/// Errors raised by the file reader and file writer templates.
///
/// Each variant corresponds to one of the distinct diagnostics the templates
/// print when used through `start`.
#[derive(Debug, Error)]
pub enum FileTemplateError {
    #[error("Unsupported encoding: {label}\n\n💡 Hint: Use a WHATWG encoding label such as \"UTF-8\", \"Shift_JIS\" or \"EUC-JP\"")]
    UnsupportedEncoding { label: String },

    #[error("Failed to open file: {path}\nDetails: {source}\n\n💡 Hint: Please verify that the file exists and you have the required permissions")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error on file: {path}\nDetails: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised by the database request template.
///
/// These are handed to [`SqlRequest::on_exception`](crate::ports::outbound::SqlRequest::on_exception).
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("No suitable driver found for {url}\n\n💡 Hint: Use a SQLite URL such as \"jdbc:sqlite:app.db\", \"sqlite::memory:\" or a plain file path")]
    UnsupportedUrl { url: String },

    #[error("Failed to connect to database: {url}\nDetails: {source}")]
    Connect {
        url: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Query failed: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("Failed to close database connection: {0}")]
    Close(#[source] rusqlite::Error),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        DatabaseError::Query(err)
    }
}
