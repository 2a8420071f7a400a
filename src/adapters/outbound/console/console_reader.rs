use super::StderrDiagnosticSink;
use crate::ports::outbound::DiagnosticSink;
use crate::shared::error::ConsoleError;
use crate::shared::LINE_SEPARATOR;
use std::fmt;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::ops::RangeInclusive;

/// Quit word used when none (or an empty one) is configured.
pub const DEFAULT_QUIT_WORD: &str = "q";

/// Consecutive read errors after which the input is treated as broken.
pub const MAX_CONSECUTIVE_READ_FAILURES: u32 = 3;

const WRAP_NOTICE: &str = "// コンソール入力にSystem.inをラップしました //";
const CLOSE_NOTICE: &str = "// コンソール入力をclose処理しました。 //";
const PROMPT: &str = "-> ";
const NOT_A_NUMBER: &str = "数字以外が入力されています。";
const OUT_OF_RANGE: &str = "入力された数値が範囲外です。";
const QUIT_HINT_SUFFIX: &str = "で終了します。";
const YES_NO_SUFFIX: &str = "[Y/n]";
const READ_FAILURE: &str =
    "もしかしたら致命的なエラーが発生しているかもしれません...\n入出力系エラーなので物理的な問題も考えられます";

/// Settings fixed at construction time of a [`ConsoleReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOptions {
    quit_word: String,
    debug: bool,
}

impl ConsoleOptions {
    /// An empty quit word falls back to [`DEFAULT_QUIT_WORD`].
    pub fn new(quit_word: impl Into<String>, debug: bool) -> Self {
        let quit_word = quit_word.into();
        let quit_word = if quit_word.is_empty() {
            DEFAULT_QUIT_WORD.to_string()
        } else {
            quit_word
        };
        Self { quit_word, debug }
    }

    pub fn with_quit_word(self, quit_word: impl Into<String>) -> Self {
        Self::new(quit_word, self.debug)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn quit_word(&self) -> &str {
        &self.quit_word
    }

    pub fn debug(&self) -> bool {
        self.debug
    }
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self::new(DEFAULT_QUIT_WORD, true)
    }
}

/// Line-oriented console prompts with quit-word handling
///
/// The reader owns its input for its whole lifetime; by default that is the
/// locked standard input, so no other consumer can interleave reads. The lock
/// is not reentrant: while a default reader is alive, creating a second one
/// with [`new`](ConsoleReader::new) or reading `io::stdin()` directly on the
/// same thread blocks forever. Share one reader instead. Prompts
/// and recoverable messages go to the output (standard output by default),
/// read failures go to the [`DiagnosticSink`].
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. Bytes that are not valid
/// UTF-8 are replaced with `U+FFFD` rather than treated as a read failure.
///
/// Values accepted by the sentinel-terminated methods are kept in
/// [`last_string`](Self::last_string) and [`last_int`](Self::last_int).
///
/// Every prompting method comes in two forms. The plain form never fails:
/// when the input is exhausted it reports once and returns a fallback
/// (`""` for strings, `true` for sentinel reads, the current `last_int` for
/// integers, `false` for [`y_or_n`](Self::y_or_n)). The `try_` form returns
/// a [`ConsoleError`] instead.
///
/// # Example
///
/// ```no_run
/// use project_common::prelude::*;
///
/// let mut console = ConsoleReader::with_options(ConsoleOptions::default().with_debug(false));
/// while !console.bool_and_int_in_range("点数を入力してください", 0..=100) {
///     println!("{}", console.last_int());
/// }
/// ```
pub struct ConsoleReader<R = StdinLock<'static>, W = Stdout, D = StderrDiagnosticSink>
where
    R: BufRead,
    W: Write,
    D: DiagnosticSink,
{
    input: R,
    output: W,
    sink: D,
    options: ConsoleOptions,
    last_string: String,
    last_int: i32,
    consecutive_failures: u32,
    skip_line_feed: bool,
}

impl ConsoleReader {
    /// Reader on standard input with quit word `"q"` and debug notices on.
    pub fn new() -> Self {
        Self::with_options(ConsoleOptions::default())
    }

    pub fn with_options(options: ConsoleOptions) -> Self {
        Self::from_parts(
            io::stdin().lock(),
            io::stdout(),
            StderrDiagnosticSink::new(),
            options,
        )
    }
}

impl Default for ConsoleReader {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, W, D> ConsoleReader<R, W, D>
where
    R: BufRead,
    W: Write,
    D: DiagnosticSink,
{
    pub fn from_parts(input: R, output: W, sink: D, options: ConsoleOptions) -> Self {
        let mut reader = Self {
            input,
            output,
            sink,
            options,
            last_string: String::new(),
            last_int: 0,
            consecutive_failures: 0,
            skip_line_feed: false,
        };
        if reader.options.debug {
            reader.emit_line(WRAP_NOTICE);
        }
        reader
    }

    /// Releases the input. Equivalent to dropping the reader.
    pub fn close(self) {
        drop(self);
    }

    pub fn last_string(&self) -> &str {
        &self.last_string
    }

    pub fn last_int(&self) -> i32 {
        self.last_int
    }

    pub fn quit_word(&self) -> &str {
        &self.options.quit_word
    }

    pub fn is_debug(&self) -> bool {
        self.options.debug
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Prints `"-> "` and returns the next line, possibly empty.
    pub fn get_string_basic(&mut self) -> String {
        let result = self.try_get_string_basic();
        self.or_fallback(result, |_| String::new())
    }

    pub fn try_get_string_basic(&mut self) -> Result<String, ConsoleError> {
        self.read_basic("")
    }

    /// Prints `message`, then `"-> "`, and returns the next line.
    pub fn get_string_basic_with(&mut self, message: &str) -> String {
        let result = self.try_get_string_basic_with(message);
        self.or_fallback(result, |_| String::new())
    }

    pub fn try_get_string_basic_with(&mut self, message: &str) -> Result<String, ConsoleError> {
        self.read_basic(message)
    }

    /// Re-prompts until a non-empty line is entered and stores it.
    pub fn get_string(&mut self) -> String {
        let result = self.try_get_string();
        self.or_fallback(result, |_| String::new())
    }

    pub fn try_get_string(&mut self) -> Result<String, ConsoleError> {
        self.read_non_empty("")
    }

    /// Like [`get_string`](Self::get_string), printing `message` on its own
    /// line before every attempt.
    pub fn get_string_with(&mut self, message: &str) -> String {
        let result = self.try_get_string_with(message);
        self.or_fallback(result, |_| String::new())
    }

    pub fn try_get_string_with(&mut self, message: &str) -> Result<String, ConsoleError> {
        let prefix = format!("{}{}", message, LINE_SEPARATOR);
        self.read_non_empty(&prefix)
    }

    /// Reads one line; returns `true` if it is the quit word (any case).
    /// Any other line, empty included, is stored in `last_string`.
    pub fn bool_and_string_basic(&mut self) -> bool {
        let result = self.try_bool_and_string_basic();
        self.or_fallback(result, |_| true)
    }

    pub fn try_bool_and_string_basic(&mut self) -> Result<bool, ConsoleError> {
        let line = self.read_basic("")?;
        Ok(self.accept_or_quit(line))
    }

    pub fn bool_and_string_basic_with(&mut self, message: &str) -> bool {
        let result = self.try_bool_and_string_basic_with(message);
        self.or_fallback(result, |_| true)
    }

    pub fn try_bool_and_string_basic_with(&mut self, message: &str) -> Result<bool, ConsoleError> {
        let prefix = self.quit_hint(message);
        let line = self.read_basic(&prefix)?;
        Ok(self.accept_or_quit(line))
    }

    /// Like [`bool_and_string_basic`](Self::bool_and_string_basic) but
    /// re-prompts on empty lines. Prints the quit hint on every attempt.
    pub fn bool_and_string(&mut self) -> bool {
        self.bool_and_string_with("")
    }

    pub fn try_bool_and_string(&mut self) -> Result<bool, ConsoleError> {
        self.try_bool_and_string_with("")
    }

    pub fn bool_and_string_with(&mut self, message: &str) -> bool {
        let result = self.try_bool_and_string_with(message);
        self.or_fallback(result, |_| true)
    }

    pub fn try_bool_and_string_with(&mut self, message: &str) -> Result<bool, ConsoleError> {
        let prefix = self.quit_hint(message);
        let line = loop {
            let line = self.read_basic(&prefix)?;
            if !line.is_empty() {
                break line;
            }
        };
        Ok(self.accept_or_quit(line))
    }

    /// Re-prompts until the line parses as an integer.
    pub fn get_int(&mut self) -> i32 {
        let result = self.try_get_int();
        self.or_fallback(result, |reader| reader.last_int)
    }

    pub fn try_get_int(&mut self) -> Result<i32, ConsoleError> {
        self.read_int("", None)
    }

    pub fn get_int_with(&mut self, message: &str) -> i32 {
        let result = self.try_get_int_with(message);
        self.or_fallback(result, |reader| reader.last_int)
    }

    pub fn try_get_int_with(&mut self, message: &str) -> Result<i32, ConsoleError> {
        let prefix = format!("{}{}", message, LINE_SEPARATOR);
        self.read_int(&prefix, None)
    }

    /// Re-prompts until the line parses as an integer inside `range`.
    ///
    /// An empty range can only be left through end of input.
    pub fn get_int_in_range(&mut self, message: &str, range: RangeInclusive<i32>) -> i32 {
        let result = self.try_get_int_in_range(message, range);
        self.or_fallback(result, |reader| reader.last_int)
    }

    pub fn try_get_int_in_range(
        &mut self,
        message: &str,
        range: RangeInclusive<i32>,
    ) -> Result<i32, ConsoleError> {
        let prefix = format!("{}{}", message, LINE_SEPARATOR);
        self.read_int(&prefix, Some(&range))
    }

    /// Returns `true` when the quit word is entered, otherwise stores the
    /// parsed integer in `last_int` and returns `false`.
    ///
    /// The quit word is compared case-sensitively here, unlike the string
    /// variants.
    pub fn bool_and_int(&mut self) -> bool {
        self.bool_and_int_with("")
    }

    pub fn try_bool_and_int(&mut self) -> Result<bool, ConsoleError> {
        self.try_bool_and_int_with("")
    }

    pub fn bool_and_int_with(&mut self, message: &str) -> bool {
        let result = self.try_bool_and_int_with(message);
        self.or_fallback(result, |_| true)
    }

    pub fn try_bool_and_int_with(&mut self, message: &str) -> Result<bool, ConsoleError> {
        self.read_int_or_quit(message, None)
    }

    pub fn bool_and_int_in_range(&mut self, message: &str, range: RangeInclusive<i32>) -> bool {
        let result = self.try_bool_and_int_in_range(message, range);
        self.or_fallback(result, |_| true)
    }

    pub fn try_bool_and_int_in_range(
        &mut self,
        message: &str,
        range: RangeInclusive<i32>,
    ) -> Result<bool, ConsoleError> {
        self.read_int_or_quit(message, Some(&range))
    }

    /// Returns `true` for any line containing `Y`/`y`, `false` for one
    /// containing `N`/`n`; anything else re-prompts.
    pub fn y_or_n(&mut self, message: &str) -> bool {
        let result = self.try_y_or_n(message);
        self.or_fallback(result, |_| false)
    }

    pub fn try_y_or_n(&mut self, message: &str) -> Result<bool, ConsoleError> {
        let prefix = format!("{}{}{}", message, LINE_SEPARATOR, YES_NO_SUFFIX);
        loop {
            let line = self.read_basic(&prefix)?;
            if line.contains(['Y', 'y']) {
                return Ok(true);
            }
            if line.contains(['N', 'n']) {
                return Ok(false);
            }
        }
    }

    fn read_non_empty(&mut self, prefix: &str) -> Result<String, ConsoleError> {
        loop {
            let line = self.read_basic(prefix)?;
            if !line.is_empty() {
                self.last_string.clone_from(&line);
                return Ok(line);
            }
        }
    }

    fn read_int(
        &mut self,
        prefix: &str,
        range: Option<&RangeInclusive<i32>>,
    ) -> Result<i32, ConsoleError> {
        loop {
            let line = self.read_basic(prefix)?;
            let Some(value) = parse_int(&line) else {
                self.emit_line(NOT_A_NUMBER);
                continue;
            };
            self.last_int = value;
            match range {
                Some(range) if !range.contains(&value) => self.emit_line(OUT_OF_RANGE),
                _ => return Ok(value),
            }
        }
    }

    fn read_int_or_quit(
        &mut self,
        message: &str,
        range: Option<&RangeInclusive<i32>>,
    ) -> Result<bool, ConsoleError> {
        let prefix = self.quit_hint(message);
        loop {
            let line = self.read_basic(&prefix)?;
            if line == self.options.quit_word {
                return Ok(true);
            }
            let Some(value) = parse_int(&line) else {
                self.emit_line(NOT_A_NUMBER);
                continue;
            };
            self.last_int = value;
            match range {
                Some(range) if !range.contains(&value) => self.emit_line(OUT_OF_RANGE),
                _ => return Ok(false),
            }
        }
    }

    /// `message`, a line break, then `"<quit_word>で終了します。"` and a line break.
    fn quit_hint(&self, message: &str) -> String {
        format!(
            "{}{}{}{}{}",
            message, LINE_SEPARATOR, self.options.quit_word, QUIT_HINT_SUFFIX, LINE_SEPARATOR
        )
    }

    fn accept_or_quit(&mut self, line: String) -> bool {
        if line.to_lowercase() == self.options.quit_word.to_lowercase() {
            return true;
        }
        self.last_string = line;
        false
    }

    /// One prompt-and-read attempt.
    ///
    /// A read error is reported and yields `""` until
    /// [`MAX_CONSECUTIVE_READ_FAILURES`] is reached.
    fn read_basic(&mut self, prefix: &str) -> Result<String, ConsoleError> {
        self.emit(prefix);
        self.emit(PROMPT);

        match self.read_raw_line() {
            Ok(None) => Err(ConsoleError::InputClosed),
            Ok(Some(bytes)) => {
                self.consecutive_failures = 0;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            Err(source) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= MAX_CONSECUTIVE_READ_FAILURES {
                    let attempts = self.consecutive_failures;
                    self.consecutive_failures = 0;
                    return Err(ConsoleError::ReadFailed { attempts, source });
                }
                self.sink.report_error(READ_FAILURE, &source);
                Ok(String::new())
            }
        }
    }

    /// Reads the bytes of one line without its terminator, or `None` at end
    /// of input.
    ///
    /// A `\n` directly after a terminating `\r` is skipped on the next call,
    /// so a lone `\r` ends the line without waiting for more input.
    fn read_raw_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        let mut read_any = false;
        loop {
            let available = match self.input.fill_buf() {
                Ok(available) => available,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };
            if available.is_empty() {
                return Ok(read_any.then_some(line));
            }
            if self.skip_line_feed {
                self.skip_line_feed = false;
                if available[0] == b'\n' {
                    self.input.consume(1);
                    continue;
                }
            }
            read_any = true;
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    line.extend_from_slice(&available[..end]);
                    self.skip_line_feed = available[end] == b'\r';
                    self.input.consume(end + 1);
                    return Ok(Some(line));
                }
                None => {
                    line.extend_from_slice(available);
                    let consumed = available.len();
                    self.input.consume(consumed);
                }
            }
        }
    }

    fn or_fallback<T>(
        &mut self,
        result: Result<T, ConsoleError>,
        fallback: impl FnOnce(&Self) -> T,
    ) -> T {
        match result {
            Ok(value) => value,
            Err(error) => {
                self.sink.report_error(READ_FAILURE, &error);
                fallback(self)
            }
        }
    }

    // Console output is best effort, like a print stream.
    fn emit(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let _ = self.output.write_all(text.as_bytes());
        let _ = self.output.flush();
    }

    fn emit_line(&mut self, text: &str) {
        self.emit(&format!("{}{}", text, LINE_SEPARATOR));
    }
}

impl<R, W, D> Drop for ConsoleReader<R, W, D>
where
    R: BufRead,
    W: Write,
    D: DiagnosticSink,
{
    fn drop(&mut self) {
        if self.options.debug {
            self.emit_line(CLOSE_NOTICE);
        }
    }
}

impl<R, W, D> fmt::Display for ConsoleReader<R, W, D>
where
    R: BufRead,
    W: Write,
    D: DiagnosticSink,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.last_string)
    }
}

/// Code points of digit zero for the decimal digit runs of the Basic
/// Multilingual Plane outside ASCII. Each run covers zero to nine.
const DECIMAL_DIGIT_ZEROS: [u32; 36] = [
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0,
    0xAA50, 0xABF0, 0xFF10,
];

/// Value of a non-ASCII decimal digit such as `'７'` or `'٤'`.
fn decimal_digit(c: char) -> Option<u32> {
    let code = u32::from(c);
    DECIMAL_DIGIT_ZEROS
        .iter()
        .find_map(|&zero| code.checked_sub(zero).filter(|digit| *digit < 10))
}

/// Parses a signed decimal `i32`; decimal digits of other scripts, full-width
/// ones included, count as their ASCII equivalents.
fn parse_int(text: &str) -> Option<i32> {
    let normalized: String = text
        .chars()
        .map(|c| {
            decimal_digit(c)
                .and_then(|digit| char::from_digit(digit, 10))
                .unwrap_or(c)
        })
        .collect();
    normalized.parse().ok()
}
