use rusqlite::{Connection, Params, Row};

/// Statement handle handed to a database request body
///
/// Lives only for one request; it borrows the connection the template
/// opened and is dropped before the connection is closed.
pub struct SqlStatement<'conn> {
    connection: &'conn Connection,
}

impl<'conn> SqlStatement<'conn> {
    pub(crate) fn new(connection: &'conn Connection) -> Self {
        Self { connection }
    }

    /// Executes one statement and returns the number of changed rows.
    pub fn execute<P: Params>(&mut self, sql: &str, params: P) -> rusqlite::Result<usize> {
        self.connection.execute(sql, params)
    }

    /// Executes several `;`-separated statements without parameters.
    pub fn execute_batch(&mut self, sql: &str) -> rusqlite::Result<()> {
        self.connection.execute_batch(sql)
    }

    /// Runs a query and maps every row with `f`.
    pub fn query_map<T, P, F>(&mut self, sql: &str, params: P, f: F) -> rusqlite::Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut statement = self.connection.prepare(sql)?;
        let rows = statement
            .query_map(params, f)?
            .collect::<rusqlite::Result<Vec<T>>>();
        rows
    }

    /// Runs a query expected to return at least one row and maps the first.
    pub fn query_row<T, P, F>(&mut self, sql: &str, params: P, f: F) -> rusqlite::Result<T>
    where
        P: Params,
        F: FnOnce(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.connection.query_row(sql, params, f)
    }

    /// The underlying connection, for anything the helpers above don't cover.
    pub fn connection(&self) -> &'conn Connection {
        self.connection
    }
}
