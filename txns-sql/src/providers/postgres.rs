use crate::{sql::Statement, BoxErr, RowCount, Session, SessionError, MAX_PARAMETERS};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{
    postgres::{PgArguments, PgPool, PgRow},
    query::Query,
    Acquire, Postgres, Row, Transaction,
};
use txns::{ColumnType, Value};
use uuid::Uuid;

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

fn query(statement: &Statement) -> Result<PgQuery<'_>, SessionError> {
    let params = statement.params();

    if params.len() > MAX_PARAMETERS {
        return Err(SessionError::TooManyParameters(params.len()));
    }

    let mut query = sqlx::query(statement.sql());

    for value in params {
        query = match value {
            Value::Null => query.bind(None::<String>),
            Value::Bool(value) => query.bind(*value),
            Value::Int(value) => query.bind(*value),
            Value::Float(value) => query.bind(*value),
            Value::Text(value) => query.bind(value.as_str()),
            Value::Uuid(value) => query.bind(*value),
            Value::Timestamp(value) => query.bind(*value),
            Value::TextArray(value) => query.bind(value.as_slice()),
        };
    }

    Ok(query)
}

fn decode(row: &PgRow, kinds: &[ColumnType]) -> Result<Vec<Value>, SessionError> {
    let mut values = Vec::with_capacity(kinds.len());

    for (column, kind) in kinds.iter().enumerate() {
        let value = match kind {
            ColumnType::Bool => row.try_get::<Option<bool>, _>(column).box_err()?.into(),
            ColumnType::Int => row.try_get::<Option<i64>, _>(column).box_err()?.into(),
            ColumnType::Float => row.try_get::<Option<f64>, _>(column).box_err()?.into(),
            ColumnType::Text => row.try_get::<Option<String>, _>(column).box_err()?.into(),
            ColumnType::Uuid => match row.try_get::<Option<String>, _>(column).box_err()? {
                Some(text) => Uuid::parse_str(&text)
                    .map(Value::Uuid)
                    .map_err(|_| SessionError::Decode {
                        column,
                        kind: *kind,
                    })?,
                None => Value::Null,
            },
            ColumnType::Timestamp => row
                .try_get::<Option<NaiveDateTime>, _>(column)
                .box_err()?
                .into(),
            ColumnType::TextArray => row
                .try_get::<Option<Vec<String>>, _>(column)
                .box_err()?
                .into(),
        };

        values.push(value);
    }

    Ok(values)
}

async fn run_isolated(
    mut unit: Transaction<'_, Postgres>,
    query: PgQuery<'_>,
) -> Result<RowCount, SessionError> {
    match query.execute(&mut *unit).await {
        Ok(done) => {
            unit.commit().await.box_err()?;
            Ok(RowCount::Exact(done.rows_affected()))
        }
        Err(error) => {
            unit.rollback().await.box_err()?;
            Err(SessionError::Database(Box::new(error)))
        }
    }
}

/// Represents a PostgreSQL [session](Session).
///
/// # Remarks
///
/// A transaction is started by the first executed statement and lasts until it is committed or
/// rolled back. Dropping the session rolls back an uncommitted transaction.
pub struct PgSession {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgSession {
    /// Initializes a new [`PgSession`].
    ///
    /// # Arguments
    ///
    /// * `pool` - the [connection pool](PgPool) used by the session
    pub fn new(pool: PgPool) -> Self {
        Self { pool, tx: None }
    }

    /// Gets the underlying [connection pool](PgPool).
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Session for PgSession {
    fn dialect(&self) -> &str {
        "postgresql"
    }

    async fn execute(&mut self, statement: &Statement) -> Result<RowCount, SessionError> {
        let query = query(statement)?;
        let mut tx = match self.tx.take() {
            Some(tx) => tx,
            _ => self.pool.begin().await.box_err()?,
        };
        let result = query.execute(&mut *tx).await;

        self.tx = Some(tx);
        Ok(RowCount::Exact(result.box_err()?.rows_affected()))
    }

    async fn append(&mut self, statement: &Statement) -> Result<RowCount, SessionError> {
        let query = query(statement)?;

        if let Some(tx) = self.tx.as_mut() {
            run_isolated(tx.begin().await.box_err()?, query).await
        } else {
            run_isolated(self.pool.begin().await.box_err()?, query).await
        }
    }

    async fn query(
        &mut self,
        statement: &Statement,
        kinds: &[ColumnType],
    ) -> Result<Vec<Vec<Value>>, SessionError> {
        let query = query(statement)?;
        let rows = match self.tx.as_mut() {
            Some(tx) => query.fetch_all(&mut **tx).await,
            _ => query.fetch_all(&self.pool).await,
        }
        .box_err()?;

        rows.iter().map(|row| decode(row, kinds)).collect()
    }

    async fn commit(&mut self) -> Result<(), SessionError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await.box_err()?;
        }

        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), SessionError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await.box_err()?;
        }

        Ok(())
    }
}
