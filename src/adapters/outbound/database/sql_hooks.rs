use super::statement::SqlStatement;
use crate::ports::outbound::SqlRequest;
use crate::shared::error::DatabaseError;

fn ignore_exception(_: &DatabaseError) {}

fn nothing() {}

/// [`SqlRequest`] assembled from closures
///
/// Only the query is required; the exception and finally hooks default to
/// doing nothing.
pub struct SqlHooks<Q, E = fn(&DatabaseError), F = fn()> {
    query: Q,
    on_exception: E,
    on_finally: F,
}

impl<Q> SqlHooks<Q>
where
    Q: FnMut(&mut SqlStatement<'_>) -> rusqlite::Result<()>,
{
    pub fn new(query: Q) -> Self {
        Self {
            query,
            on_exception: ignore_exception,
            on_finally: nothing,
        }
    }
}

impl<Q, E, F> SqlHooks<Q, E, F> {
    pub fn with_exception_handler<E2>(self, on_exception: E2) -> SqlHooks<Q, E2, F>
    where
        E2: FnMut(&DatabaseError),
    {
        SqlHooks {
            query: self.query,
            on_exception,
            on_finally: self.on_finally,
        }
    }

    pub fn with_finally<F2>(self, on_finally: F2) -> SqlHooks<Q, E, F2>
    where
        F2: FnMut(),
    {
        SqlHooks {
            query: self.query,
            on_exception: self.on_exception,
            on_finally,
        }
    }
}

impl<Q, E, F> SqlRequest for SqlHooks<Q, E, F>
where
    Q: FnMut(&mut SqlStatement<'_>) -> rusqlite::Result<()>,
    E: FnMut(&DatabaseError),
    F: FnMut(),
{
    fn query(&mut self, statement: &mut SqlStatement<'_>) -> rusqlite::Result<()> {
        (self.query)(statement)
    }

    fn on_exception(&mut self, error: &DatabaseError) {
        (self.on_exception)(error)
    }

    fn on_finally(&mut self) {
        (self.on_finally)()
    }
}
