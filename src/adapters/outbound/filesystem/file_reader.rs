use super::encoding::TextEncoding;
use crate::adapters::outbound::console::StderrDiagnosticSink;
use crate::ports::outbound::DiagnosticSink;
use crate::shared::error::FileTemplateError;
use encoding_rs::Decoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

const ENCODING_MISSING: &str = "エンコード形式が存在していません!!";
const FILE_MISSING: &str = "ファイルが存在していません!!";
const IO_FAILURE: &str = "インアウトに問題が生じています!!";

/// Template for reading a text file line by line
///
/// The file is opened, decoded with the configured encoding and every line
/// (without its terminator) is handed to a predicate until the predicate
/// returns `false` or the file ends. The file is closed on every path.
///
/// # Example
///
/// ```no_run
/// use project_common::prelude::*;
///
/// let mut count = 0;
/// FileReaderTemplate::new("memo.txt", "Shift_JIS").start(|line| {
///     count += 1;
///     line != "EOF"
/// });
/// ```
pub struct FileReaderTemplate<D: DiagnosticSink = StderrDiagnosticSink> {
    path: PathBuf,
    encoding: String,
    sink: D,
}

impl FileReaderTemplate {
    pub fn new(file: impl AsRef<Path>, encoding: impl Into<String>) -> Self {
        Self::with_sink(file, encoding, StderrDiagnosticSink::new())
    }
}

impl<D: DiagnosticSink> FileReaderTemplate<D> {
    pub fn with_sink(file: impl AsRef<Path>, encoding: impl Into<String>, sink: D) -> Self {
        Self {
            path: file.as_ref().to_path_buf(),
            encoding: encoding.into(),
            sink,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Streams the file to `predicate`, printing a diagnostic on failure.
    pub fn start<F>(&self, predicate: F)
    where
        F: FnMut(&str) -> bool,
    {
        if let Err(error) = self.try_start(predicate) {
            self.sink.report_error(diagnostic_for(&error), &error);
        }
    }

    /// Streams the file to `predicate` and returns the first failure.
    ///
    /// # Errors
    /// - [`FileTemplateError::UnsupportedEncoding`] for an unknown label
    /// - [`FileTemplateError::FileNotFound`] when the file cannot be opened
    ///   or is a directory
    /// - [`FileTemplateError::Io`] when reading fails part way
    pub fn try_start<F>(&self, predicate: F) -> Result<(), FileTemplateError>
    where
        F: FnMut(&str) -> bool,
    {
        let encoding = TextEncoding::for_label(&self.encoding)?;
        let file = self.open()?;
        self.stream(BufReader::new(file), encoding, predicate)
    }

    fn stream<R, F>(
        &self,
        reader: R,
        encoding: TextEncoding,
        mut predicate: F,
    ) -> Result<(), FileTemplateError>
    where
        R: BufRead,
        F: FnMut(&str) -> bool,
    {
        let mut lines = DecodedLines::new(reader, encoding.decoder());
        while let Some(line) = lines.next_line().map_err(|source| self.io_error(source))? {
            if !predicate(&line) {
                break;
            }
        }
        Ok(())
    }

    fn open(&self) -> Result<File, FileTemplateError> {
        let not_found = |source: io::Error| FileTemplateError::FileNotFound {
            path: self.path.clone(),
            source,
        };

        let file = File::open(&self.path).map_err(not_found)?;
        let metadata = file.metadata().map_err(not_found)?;
        if metadata.is_dir() {
            return Err(not_found(io::Error::new(
                io::ErrorKind::Other,
                "Is a directory",
            )));
        }
        Ok(file)
    }

    fn io_error(&self, source: io::Error) -> FileTemplateError {
        FileTemplateError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn diagnostic_for(error: &FileTemplateError) -> &'static str {
    match error {
        FileTemplateError::UnsupportedEncoding { .. } => ENCODING_MISSING,
        FileTemplateError::FileNotFound { .. } => FILE_MISSING,
        FileTemplateError::Io { .. } => IO_FAILURE,
    }
}

/// Incrementally decodes a byte stream and splits it into lines.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. A final line without a
/// terminator is still returned.
struct DecodedLines<R: BufRead> {
    reader: R,
    decoder: Decoder,
    pending: String,
    finished: bool,
}

impl<R: BufRead> DecodedLines<R> {
    fn new(reader: R, decoder: Decoder) -> Self {
        Self {
            reader,
            decoder,
            pending: String::new(),
            finished: false,
        }
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }
            if self.finished {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(std::mem::take(&mut self.pending)));
            }
            self.fill()?;
        }
    }

    fn take_line(&mut self) -> Option<String> {
        let end = self.pending.find(['\n', '\r'])?;
        let rest = &self.pending[end..];
        // A trailing '\r' may be the first half of "\r\n".
        if rest == "\r" && !self.finished {
            return None;
        }
        let terminator = if rest.starts_with("\r\n") { 2 } else { 1 };
        let line = self.pending[..end].to_string();
        self.pending.replace_range(..end + terminator, "");
        Some(line)
    }

    fn fill(&mut self) -> io::Result<()> {
        let buf = self.reader.fill_buf()?;
        let last = buf.is_empty();
        if let Some(needed) = self.decoder.max_utf8_buffer_length(buf.len()) {
            self.pending.reserve(needed);
        }
        let (_, read, _) = self.decoder.decode_to_string(buf, &mut self.pending, last);
        self.reader.consume(read);
        self.finished = last;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::CapturingSink;
    use std::fs;
    use std::io::Read;
    use tempfile::TempDir;

    /// Input that fails on every read.
    struct FailingInput;

    impl Read for FailingInput {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "sector unreadable"))
        }
    }

    impl BufRead for FailingInput {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            Err(io::Error::new(io::ErrorKind::Other, "sector unreadable"))
        }

        fn consume(&mut self, _amt: usize) {}
    }

    fn collect(path: &Path, encoding: &str) -> Vec<String> {
        let mut lines = Vec::new();
        FileReaderTemplate::with_sink(path, encoding, CapturingSink::default())
            .try_start(|line| {
                lines.push(line.to_string());
                true
            })
            .unwrap();
        lines
    }

    #[test]
    fn test_predicate_false_stops_reading() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("greek.txt");
        fs::write(&file_path, "alpha\nbeta\ngamma\n").unwrap();

        let mut seen = Vec::new();
        let reader =
            FileReaderTemplate::with_sink(&file_path, "UTF-8", CapturingSink::default());
        reader.start(|line| {
            seen.push(line.to_string());
            line != "beta"
        });

        assert_eq!(seen, vec!["alpha", "beta"]);
        assert!(reader.sink.messages().is_empty());
    }

    #[test]
    fn test_reads_all_lines_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("mixed.txt");
        fs::write(&file_path, "one\r\ntwo\n\nthree\rfour").unwrap();

        assert_eq!(
            collect(&file_path, "UTF-8"),
            vec!["one", "two", "", "three", "four"]
        );
    }

    #[test]
    fn test_empty_file_yields_no_lines() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("empty.txt");
        fs::write(&file_path, "").unwrap();

        assert!(collect(&file_path, "UTF-8").is_empty());
    }

    #[test]
    fn test_decodes_shift_jis() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("sjis.txt");
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("日本語\nテキスト\n");
        fs::write(&file_path, &bytes).unwrap();

        assert_eq!(collect(&file_path, "Shift_JIS"), vec!["日本語", "テキスト"]);
    }

    #[test]
    fn test_removes_utf8_bom() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("bom.txt");
        fs::write(&file_path, b"\xEF\xBB\xBFfirst\nsecond").unwrap();

        assert_eq!(collect(&file_path, "UTF-8"), vec!["first", "second"]);
    }

    #[test]
    fn test_crlf_split_across_buffer_boundary() {
        let mut content = "x".repeat(7);
        content.push_str("\r\nnext\n");
        let reader = BufReader::with_capacity(8, content.as_bytes());
        let mut lines = DecodedLines::new(reader, encoding_rs::UTF_8.new_decoder());

        assert_eq!(lines.next_line().unwrap(), Some("x".repeat(7)));
        assert_eq!(lines.next_line().unwrap(), Some("next".to_string()));
        assert_eq!(lines.next_line().unwrap(), None);
    }

    #[test]
    fn test_unsupported_encoding_reports_diagnostic() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("data.txt");
        fs::write(&file_path, "data\n").unwrap();

        let mut called = false;
        let reader = FileReaderTemplate::with_sink(
            &file_path,
            "no-such-charset",
            CapturingSink::default(),
        );
        reader.start(|_| {
            called = true;
            true
        });

        assert!(!called);
        let messages = reader.sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with(ENCODING_MISSING));
    }

    #[test]
    fn test_missing_file_reports_diagnostic() {
        let temp_dir = TempDir::new().unwrap();
        let reader = FileReaderTemplate::with_sink(
            temp_dir.path().join("missing.txt"),
            "UTF-8",
            CapturingSink::default(),
        );
        reader.start(|_| true);

        let messages = reader.sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with(FILE_MISSING));
    }

    #[test]
    fn test_directory_is_not_a_readable_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader =
            FileReaderTemplate::with_sink(temp_dir.path(), "UTF-8", CapturingSink::default());

        let result = reader.try_start(|_| true);
        assert!(matches!(result, Err(FileTemplateError::FileNotFound { .. })));
    }

    #[test]
    fn test_decoded_lines_propagates_read_failure() {
        let mut lines = DecodedLines::new(FailingInput, encoding_rs::UTF_8.new_decoder());
        assert!(lines.next_line().is_err());
    }

    #[test]
    fn test_failure_after_open_is_an_io_error() {
        let reader = FileReaderTemplate::with_sink("data.txt", "UTF-8", CapturingSink::default());
        let encoding = TextEncoding::for_label("UTF-8").unwrap();
        let input = "first\n".as_bytes().chain(FailingInput);

        let mut seen = Vec::new();
        let result = reader.stream(input, encoding, |line| {
            seen.push(line.to_string());
            true
        });

        assert_eq!(seen, vec!["first"]);
        let error = result.unwrap_err();
        assert!(matches!(error, FileTemplateError::Io { .. }));
        assert_eq!(diagnostic_for(&error), IO_FAILURE);
        assert!(error.to_string().contains("sector unreadable"));
    }

    #[test]
    fn test_diagnostic_for_each_failure() {
        let unsupported = FileTemplateError::UnsupportedEncoding {
            label: "bogus".to_string(),
        };
        let missing = FileTemplateError::FileNotFound {
            path: PathBuf::from("missing.txt"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let broken = FileTemplateError::Io {
            path: PathBuf::from("broken.txt"),
            source: io::Error::new(io::ErrorKind::Other, "bad sector"),
        };
        assert_eq!(diagnostic_for(&unsupported), ENCODING_MISSING);
        assert_eq!(diagnostic_for(&missing), FILE_MISSING);
        assert_eq!(diagnostic_for(&broken), IO_FAILURE);
    }

    #[test]
    fn test_accessors() {
        let reader = FileReaderTemplate::new("memo.txt", "EUC-JP");
        assert_eq!(reader.path(), Path::new("memo.txt"));
        assert_eq!(reader.encoding(), "EUC-JP");
    }
}
