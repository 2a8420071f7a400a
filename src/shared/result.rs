/// Type alias for Result with anyhow::Error as the error type.
/// Used where errors only need to be displayed, such as configuration loading.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
