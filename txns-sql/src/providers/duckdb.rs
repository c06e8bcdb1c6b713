use crate::{sql::Statement, BoxErr, RowCount, Session, SessionError};
use async_trait::async_trait;
use ::duckdb::{
    params_from_iter,
    types::{TimeUnit, Value as DuckValue},
    Connection,
};
use chrono::{DateTime, NaiveDateTime};
use txns::{ColumnType, Value};
use uuid::Uuid;

fn list_literal(items: &[String]) -> String {
    let mut literal = String::from("[");

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            literal.push_str(", ");
        }

        literal.push('\'');

        for ch in item.chars() {
            if ch == '\'' || ch == '\\' {
                literal.push('\\');
            }

            literal.push(ch);
        }

        literal.push('\'');
    }

    literal.push(']');
    literal
}

fn to_duckdb(value: &Value) -> DuckValue {
    match value {
        Value::Null => DuckValue::Null,
        Value::Bool(value) => DuckValue::Boolean(*value),
        Value::Int(value) => DuckValue::BigInt(*value),
        Value::Float(value) => DuckValue::Double(*value),
        Value::Text(value) => DuckValue::Text(value.clone()),
        Value::Uuid(value) => DuckValue::Text(value.to_string()),
        Value::Timestamp(value) => {
            DuckValue::Timestamp(TimeUnit::Microsecond, value.and_utc().timestamp_micros())
        }
        Value::TextArray(items) => DuckValue::Text(list_literal(items)),
    }
}

fn timestamp(unit: TimeUnit, value: i64) -> Option<NaiveDateTime> {
    let micros = match unit {
        TimeUnit::Second => value.checked_mul(1_000_000)?,
        TimeUnit::Millisecond => value.checked_mul(1_000)?,
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    };

    DateTime::from_timestamp_micros(micros).map(|at| at.naive_utc())
}

fn from_duckdb(value: DuckValue, kind: ColumnType, column: usize) -> Result<Value, SessionError> {
    let error = || SessionError::Decode { column, kind };
    let value = match (kind, value) {
        (_, DuckValue::Null) => Value::Null,
        (ColumnType::Bool, DuckValue::Boolean(value)) => Value::Bool(value),
        (ColumnType::Int, DuckValue::BigInt(value)) => Value::Int(value),
        (ColumnType::Int, DuckValue::Int(value)) => Value::Int(value.into()),
        (ColumnType::Float, DuckValue::Double(value)) => Value::Float(value),
        (ColumnType::Float, DuckValue::Float(value)) => Value::Float(value.into()),
        (ColumnType::Text, DuckValue::Text(value)) => Value::Text(value),
        (ColumnType::Uuid, DuckValue::Text(value)) => {
            Value::Uuid(Uuid::parse_str(&value).map_err(|_| error())?)
        }
        (ColumnType::Timestamp, DuckValue::Timestamp(unit, value)) => {
            Value::Timestamp(timestamp(unit, value).ok_or_else(error)?)
        }
        (ColumnType::TextArray, DuckValue::List(items)) => Value::TextArray(
            items
                .into_iter()
                .map(|item| match item {
                    DuckValue::Text(text) => Ok(text),
                    _ => Err(error()),
                })
                .collect::<Result<_, _>>()?,
        ),
        _ => return Err(error()),
    };

    Ok(value)
}

/// Represents a DuckDB [session](Session).
///
/// # Remarks
///
/// DuckDB is embedded, so statements run on the calling thread. DuckDB has no savepoints;
/// a statement [appended](Session::append) while a transaction is open runs within that
/// transaction, and its failure aborts the transaction.
pub struct DuckDbSession {
    conn: Connection,
    in_tx: bool,
}

impl DuckDbSession {
    /// Initializes a new [`DuckDbSession`].
    ///
    /// # Arguments
    ///
    /// * `conn` - the [connection](Connection) used by the session
    pub fn new(conn: Connection) -> Self {
        Self { conn, in_tx: false }
    }

    /// Gets the underlying [connection](Connection).
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn run(&self, statement: &Statement) -> Result<RowCount, SessionError> {
        let params = statement.params().iter().map(to_duckdb);
        let changed = self
            .conn
            .execute(statement.sql(), params_from_iter(params))
            .box_err()?;

        Ok(RowCount::Exact(changed as u64))
    }
}

#[async_trait]
impl Session for DuckDbSession {
    fn dialect(&self) -> &str {
        "duckdb"
    }

    async fn execute(&mut self, statement: &Statement) -> Result<RowCount, SessionError> {
        if !self.in_tx {
            self.conn.execute_batch("BEGIN TRANSACTION").box_err()?;
            self.in_tx = true;
        }

        self.run(statement)
    }

    async fn append(&mut self, statement: &Statement) -> Result<RowCount, SessionError> {
        self.run(statement)
    }

    async fn query(
        &mut self,
        statement: &Statement,
        kinds: &[ColumnType],
    ) -> Result<Vec<Vec<Value>>, SessionError> {
        let params = statement.params().iter().map(to_duckdb);
        let mut select = self.conn.prepare(statement.sql()).box_err()?;
        let mut rows = select.query(params_from_iter(params)).box_err()?;
        let mut result = Vec::new();

        while let Some(row) = rows.next().box_err()? {
            let mut values = Vec::with_capacity(kinds.len());

            for (column, kind) in kinds.iter().enumerate() {
                let value: DuckValue = row.get(column).box_err()?;
                values.push(from_duckdb(value, *kind, column)?);
            }

            result.push(values);
        }

        Ok(result)
    }

    async fn commit(&mut self) -> Result<(), SessionError> {
        if std::mem::take(&mut self.in_tx) {
            self.conn.execute_batch("COMMIT").box_err()?;
        }

        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), SessionError> {
        if std::mem::take(&mut self.in_tx) {
            self.conn.execute_batch("ROLLBACK").box_err()?;
        }

        Ok(())
    }
}
