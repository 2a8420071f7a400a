/// Filesystem adapters for encoded text file I/O
mod encoding;
mod file_reader;
mod file_writer;

pub use encoding::TextEncoding;
pub use file_reader::FileReaderTemplate;
pub use file_writer::{FileWriterTemplate, TextWriter};
