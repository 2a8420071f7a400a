use project_common::prelude::*;

/// Mock SqlRequest that runs a fixed SQL batch and records hook calls
pub struct MockSqlRequest {
    sql: String,
    pub events: Vec<String>,
    pub errors: Vec<String>,
}

impl MockSqlRequest {
    pub fn new(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            events: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl SqlRequest for MockSqlRequest {
    fn query(&mut self, statement: &mut SqlStatement<'_>) -> rusqlite::Result<()> {
        self.events.push("query".to_string());
        statement.execute_batch(&self.sql)
    }

    fn on_exception(&mut self, error: &DatabaseError) {
        self.events.push("on_exception".to_string());
        self.errors.push(error.to_string());
    }

    fn on_finally(&mut self) {
        self.events.push("on_finally".to_string());
    }
}
