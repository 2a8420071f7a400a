use super::statement::SqlStatement;
use crate::ports::outbound::SqlRequest;
use crate::shared::error::DatabaseError;
use rusqlite::Connection;
use std::fmt;

/// URL prefixes accepted for SQLite databases, longest first.
const SQLITE_PREFIXES: [&str; 3] = ["jdbc:sqlite:", "sqlite://", "sqlite:"];

/// Template for a single database request
///
/// Holds the connection settings. Each [`start`](Self::start) opens a fresh
/// connection, creates a statement, runs the request's query and releases
/// both before the request's `on_finally` hook runs.
///
/// SQLite has no user accounts, so `user` and `password` are kept for
/// callers but not used to authenticate.
///
/// # Example
///
/// ```no_run
/// use project_common::prelude::*;
///
/// let template = SqlRequestTemplate::new("jdbc:sqlite:shop.db", "admin", "secret");
/// let mut request = SqlHooks::new(|statement| {
///     statement.execute_batch("CREATE TABLE IF NOT EXISTS items (name TEXT)")
/// })
/// .with_exception_handler(|error| eprintln!("{}", error))
/// .with_finally(|| println!("done"));
/// template.start(&mut request);
/// ```
#[derive(Clone)]
pub struct SqlRequestTemplate {
    url: String,
    user: String,
    password: String,
}

impl SqlRequestTemplate {
    pub fn new(url: impl Into<String>, user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Drives `request` through one connection.
    ///
    /// Any failure while connecting, querying or closing goes to
    /// `on_exception`; `on_finally` then runs exactly once, after the
    /// connection is closed.
    pub fn start<R>(&self, request: &mut R)
    where
        R: SqlRequest + ?Sized,
    {
        if let Err(error) = self.try_run(|statement| request.query(statement)) {
            request.on_exception(&error);
        }
        request.on_finally();
    }

    /// Runs `body` against a fresh statement and returns its value.
    ///
    /// The connection is closed before this returns. A query failure takes
    /// precedence over a failure to close.
    ///
    /// # Errors
    /// - [`DatabaseError::UnsupportedUrl`] when the URL is not a SQLite URL
    /// - [`DatabaseError::Connect`] when the database cannot be opened
    /// - [`DatabaseError::Query`] when `body` fails
    /// - [`DatabaseError::Close`] when the connection cannot be closed
    pub fn try_run<T, F>(&self, body: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&mut SqlStatement<'_>) -> rusqlite::Result<T>,
    {
        let connection = self.connect()?;
        let outcome = {
            let mut statement = SqlStatement::new(&connection);
            body(&mut statement)
        };
        let closed = connection
            .close()
            .map_err(|(_, source)| DatabaseError::Close(source));

        let value = outcome?;
        closed?;
        Ok(value)
    }

    fn connect(&self) -> Result<Connection, DatabaseError> {
        let target = sqlite_target(&self.url).ok_or_else(|| DatabaseError::UnsupportedUrl {
            url: self.url.clone(),
        })?;
        Connection::open(target).map_err(|source| DatabaseError::Connect {
            url: self.url.clone(),
            source,
        })
    }
}

impl fmt::Debug for SqlRequestTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlRequestTemplate")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"********")
            .finish()
    }
}

/// Extracts the SQLite path from `url`, or `None` for other databases.
fn sqlite_target(url: &str) -> Option<&str> {
    if let Some(rest) = SQLITE_PREFIXES
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
    {
        return Some(rest);
    }
    if url.starts_with("jdbc:") || url.contains("://") {
        return None;
    }
    Some(url)
}
