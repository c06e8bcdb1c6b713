use crate::{sql::Statement, RowCount, Session, SessionError};
use async_trait::async_trait;
use std::io;
use txns::{ColumnType, Value};

#[derive(Default)]
pub(crate) struct FakeSession {
    dialect: &'static str,
    reject_append: bool,
    fail_execute_at: Option<usize>,
    count: Option<RowCount>,
    rows: Vec<Vec<Value>>,
    pub appended: Vec<Statement>,
    pub executed: Vec<Statement>,
    pub queried: Vec<Statement>,
    pub commits: usize,
}

impl FakeSession {
    pub fn new(dialect: &'static str) -> Self {
        Self {
            dialect,
            ..Default::default()
        }
    }

    pub fn rejecting_append(mut self) -> Self {
        self.reject_append = true;
        self
    }

    pub fn failing_execute_at(mut self, index: usize) -> Self {
        self.fail_execute_at = Some(index);
        self
    }

    pub fn reporting(mut self, count: RowCount) -> Self {
        self.count = Some(count);
        self
    }

    pub fn returning(mut self, rows: Vec<Vec<Value>>) -> Self {
        self.rows = rows;
        self
    }

    fn count(&self, statement: &Statement) -> RowCount {
        let rows = statement.sql().matches("), (").count() as u64 + 1;
        self.count.unwrap_or(RowCount::Exact(rows))
    }
}

#[async_trait]
impl Session for FakeSession {
    fn dialect(&self) -> &str {
        self.dialect
    }

    async fn execute(&mut self, statement: &Statement) -> Result<RowCount, SessionError> {
        if self.fail_execute_at == Some(self.executed.len()) {
            return Err(SessionError::Database(Box::new(io::Error::other(
                "duplicate key value violates unique constraint",
            ))));
        }

        let count = self.count(statement);
        self.executed.push(statement.clone());
        Ok(count)
    }

    async fn append(&mut self, statement: &Statement) -> Result<RowCount, SessionError> {
        if self.reject_append {
            return Err(SessionError::TooManyParameters(statement.params().len()));
        }

        let count = self.count(statement);
        self.appended.push(statement.clone());
        Ok(count)
    }

    async fn query(
        &mut self,
        statement: &Statement,
        _kinds: &[ColumnType],
    ) -> Result<Vec<Vec<Value>>, SessionError> {
        self.queried.push(statement.clone());
        Ok(self.rows.clone())
    }

    async fn commit(&mut self) -> Result<(), SessionError> {
        self.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), SessionError> {
        Err(SessionError::Database(Box::new(io::Error::other(
            "rollback is not expected",
        ))))
    }
}
