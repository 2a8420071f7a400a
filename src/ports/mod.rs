/// Ports module defining the interfaces the templates are written against
///
/// The templates only depend on these traits for the parts that vary per
/// caller: where diagnostics go and what a database request does.
pub mod outbound;
