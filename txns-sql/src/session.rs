use crate::sql::Statement;
use async_trait::async_trait;
use std::error::Error;
use thiserror::Error;
use txns::{ColumnType, Value};

/// Represents the maximum number of parameters a single statement may bind.
pub const MAX_PARAMETERS: usize = u16::MAX as usize;

/// Represents the possible session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Indicates an error reported by the database driver.
    #[error(transparent)]
    Database(Box<dyn Error + Send + Sync>),

    /// Indicates a statement binds more parameters than the database accepts.
    #[error("the statement binds {0} parameters, but at most 65535 are supported")]
    TooManyParameters(usize),

    /// Indicates a result column holds a value that cannot be read as the requested type.
    #[error("the value of result column {column} cannot be read as {kind:?}")]
    Decode {
        /// Gets the zero-based index of the result column.
        column: usize,

        /// Gets the requested [column type](ColumnType).
        kind: ColumnType,
    },
}

/// Represents the number of rows affected by a statement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowCount {
    /// Indicates the driver reported an accurate count.
    Exact(u64),

    /// Indicates the driver could not report an accurate count.
    Unknown,
}

impl RowCount {
    /// Gets the reported count, if known.
    pub fn known(&self) -> Option<u64> {
        match self {
            Self::Exact(count) => Some(*count),
            Self::Unknown => None,
        }
    }

    /// Gets the reported count or zero when it is unknown.
    pub fn or_zero(&self) -> u64 {
        self.known().unwrap_or_default()
    }
}

/// Defines the behavior of a database session.
///
/// # Remarks
///
/// Statements passed to [execute](Session::execute) accumulate in a transaction that is only
/// made durable by [commit](Session::commit). [append](Session::append) runs a statement as a
/// self-contained unit of work; when it fails, the session remains usable.
#[async_trait]
pub trait Session: Send {
    /// Gets the name of the SQL dialect spoken by the session.
    fn dialect(&self) -> &str;

    /// Executes a statement within the current transaction.
    ///
    /// # Arguments
    ///
    /// * `statement` - the [statement](Statement) to execute
    async fn execute(&mut self, statement: &Statement) -> Result<RowCount, SessionError>;

    /// Executes a statement as a self-contained unit of work.
    ///
    /// # Arguments
    ///
    /// * `statement` - the [statement](Statement) to execute
    async fn append(&mut self, statement: &Statement) -> Result<RowCount, SessionError>;

    /// Executes a query and returns its rows.
    ///
    /// # Arguments
    ///
    /// * `statement` - the query [statement](Statement)
    /// * `kinds` - the [type](ColumnType) of each result column
    ///
    /// # Remarks
    ///
    /// The query sees the writes of the current transaction. Each returned row holds one
    /// [value](Value) per result column.
    async fn query(
        &mut self,
        statement: &Statement,
        kinds: &[ColumnType],
    ) -> Result<Vec<Vec<Value>>, SessionError>;

    /// Commits the current transaction, if any.
    async fn commit(&mut self) -> Result<(), SessionError>;

    /// Rolls back the current transaction, if any.
    async fn rollback(&mut self) -> Result<(), SessionError>;
}
