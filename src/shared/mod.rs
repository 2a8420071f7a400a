/// Shared kernel - error types, the crate-wide result alias and text constants
pub mod error;
pub mod result;

#[cfg(test)]
pub(crate) mod testing;

pub use result::Result;

/// Line separator of the host platform, used for prompts and `new_line`.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
/// Line separator of the host platform, used for prompts and `new_line`.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";
