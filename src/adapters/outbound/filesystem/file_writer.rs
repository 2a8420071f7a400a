use super::encoding::TextEncoding;
use crate::adapters::outbound::console::StderrDiagnosticSink;
use crate::ports::outbound::DiagnosticSink;
use crate::shared::error::FileTemplateError;
use crate::shared::LINE_SEPARATOR;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const ENCODING_MISSING: &str = "指定したエンコードは見つかりません";
const FILE_MISSING: &str = "指定したファイルは見つかりません";
const IO_FAILURE: &str = "重大なエラーが発生しているかもしれません";

/// Buffered text writer that encodes everything it is given
///
/// Handed to the body of [`FileWriterTemplate::start`]. Supports `write!`
/// and `writeln!`-style use through [`write_fmt`](Self::write_fmt).
pub struct TextWriter<W: Write> {
    inner: BufWriter<W>,
    encoding: TextEncoding,
}

impl<W: Write> TextWriter<W> {
    pub fn new(inner: W, encoding: TextEncoding) -> Self {
        Self {
            inner: BufWriter::new(inner),
            encoding,
        }
    }

    /// Canonical name of the encoding in use.
    pub fn encoding(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(&self.encoding.encode(text))
    }

    /// Writes the platform line separator.
    pub fn new_line(&mut self) -> io::Result<()> {
        self.write_str(LINE_SEPARATOR)
    }

    /// Writes `text` followed by the platform line separator.
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write_str(text)?;
        self.new_line()
    }

    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        match args.as_str() {
            Some(text) => self.write_str(text),
            None => self.write_str(&args.to_string()),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Template for writing a text file
///
/// Opens the file (truncating it, or appending when configured), wraps it
/// in an encoding [`TextWriter`] and hands that to a body. The writer is
/// flushed and the file closed on every path.
///
/// # Example
///
/// ```no_run
/// use project_common::prelude::*;
///
/// FileWriterTemplate::new("out.txt", "UTF-8", false).start(|writer| {
///     writer.write_line("一行目")?;
///     write!(writer, "{}行目", 2)
/// });
/// ```
pub struct FileWriterTemplate<D: DiagnosticSink = StderrDiagnosticSink> {
    path: PathBuf,
    encoding: String,
    append: bool,
    sink: D,
}

impl FileWriterTemplate {
    pub fn new(file: impl AsRef<Path>, encoding: impl Into<String>, append: bool) -> Self {
        Self::with_sink(file, encoding, append, StderrDiagnosticSink::new())
    }
}

impl<D: DiagnosticSink> FileWriterTemplate<D> {
    pub fn with_sink(
        file: impl AsRef<Path>,
        encoding: impl Into<String>,
        append: bool,
        sink: D,
    ) -> Self {
        Self {
            path: file.as_ref().to_path_buf(),
            encoding: encoding.into(),
            append,
            sink,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn is_append(&self) -> bool {
        self.append
    }

    /// Runs `body` against the file, printing a diagnostic on failure.
    pub fn start<F>(&self, body: F)
    where
        F: FnOnce(&mut TextWriter<File>) -> io::Result<()>,
    {
        if let Err(error) = self.try_start(body) {
            let message = match &error {
                FileTemplateError::UnsupportedEncoding { .. } => ENCODING_MISSING,
                FileTemplateError::FileNotFound { .. } => FILE_MISSING,
                FileTemplateError::Io { .. } => IO_FAILURE,
            };
            self.sink.report_error(message, &error);
        }
    }

    /// Runs `body` against the file and returns the first failure.
    ///
    /// The encoding is resolved before the file is touched, so an unknown
    /// label leaves an existing file unchanged. Whatever the body wrote is
    /// flushed even when the body fails.
    ///
    /// # Errors
    /// - [`FileTemplateError::UnsupportedEncoding`] for an unknown label
    /// - [`FileTemplateError::FileNotFound`] when the file cannot be opened
    /// - [`FileTemplateError::Io`] when the body or the final flush fails
    pub fn try_start<F>(&self, body: F) -> Result<(), FileTemplateError>
    where
        F: FnOnce(&mut TextWriter<File>) -> io::Result<()>,
    {
        let encoding = TextEncoding::for_label(&self.encoding)?;
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(self.append)
            .truncate(!self.append)
            .open(&self.path)
            .map_err(|source| FileTemplateError::FileNotFound {
                path: self.path.clone(),
                source,
            })?;

        let mut writer = TextWriter::new(file, encoding);
        let body_result = body(&mut writer);
        let flush_result = writer.flush();

        body_result
            .and(flush_result)
            .map_err(|source| FileTemplateError::Io {
                path: self.path.clone(),
                source,
            })
    }
}
