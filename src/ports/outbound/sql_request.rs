use crate::adapters::outbound::database::SqlStatement;
use crate::shared::error::DatabaseError;

/// SqlRequest port for the body of a database request
///
/// Implemented by callers of
/// [`SqlRequestTemplate`](crate::adapters::outbound::database::SqlRequestTemplate).
/// The template owns the connection and statement; the request only
/// describes what to do with them and how to react to the outcome.
pub trait SqlRequest {
    /// Runs the actual work against a freshly created statement
    ///
    /// # Errors
    /// Any error returned here is passed to [`SqlRequest::on_exception`]
    fn query(&mut self, statement: &mut SqlStatement<'_>) -> rusqlite::Result<()>;

    /// Handles a failure from connecting, querying or closing
    fn on_exception(&mut self, error: &DatabaseError);

    /// Runs once per request after the connection has been released
    fn on_finally(&mut self);
}
