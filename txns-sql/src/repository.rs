use crate::{
    sql::{command, Ident},
    Session, SessionError, TableRef, UpsertError, UpsertRequest, Upserted, UpserterFactory,
    DEFAULT_BATCH_SIZE,
};
use chrono::NaiveDateTime;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use txns::{Frame, FrameError, Model, OnConflict, TableSchema, Value, SCHEMA_NAME};

/// Represents the possible repository errors.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Indicates a model does not belong to the table of the repository.
    #[error("the model of table '{actual}' cannot be stored in table '{expected}'")]
    UnexpectedModel {
        /// Gets the table of the repository.
        expected: String,

        /// Gets the table of the model.
        actual: &'static str,
    },

    /// Indicates an operation the table does not support.
    #[error("the table '{table}' does not support {operation}")]
    Unsupported {
        /// Gets the name of the table.
        table: String,

        /// Gets the unsupported operation.
        operation: &'static str,
    },

    /// Indicates a filter on a column the table does not define.
    #[error("the table '{table}' does not define the column '{column}'")]
    UnknownColumn {
        /// Gets the name of the table.
        table: String,

        /// Gets the name of the unknown column.
        column: String,
    },

    /// Indicates a query returned rows that do not match the table columns.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Indicates an [upsert error](UpsertError).
    #[error(transparent)]
    Upsert(#[from] UpsertError),

    /// Indicates a [session error](SessionError).
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Represents a repository of records stored in one table.
#[derive(Clone)]
pub struct SqlRepository {
    table: TableSchema,
    mapped: bool,
    schema: String,
    batch_size: usize,
    factory: Arc<UpserterFactory>,
}

impl SqlRepository {
    fn new(table: TableSchema, mapped: bool) -> Self {
        Self {
            table,
            mapped,
            schema: SCHEMA_NAME.to_owned(),
            batch_size: DEFAULT_BATCH_SIZE,
            factory: Default::default(),
        }
    }

    /// Initializes a new [`SqlRepository`] for the table mapped from a [model](Model).
    pub fn mapped<M: Model>() -> Self {
        Self::new(M::schema(), true)
    }

    /// Initializes a new [`SqlRepository`] for a table described at runtime.
    ///
    /// # Arguments
    ///
    /// * `table` - the [schema](TableSchema) of the table
    pub fn reflected(table: TableSchema) -> Self {
        Self::new(table, false)
    }

    /// Configures the database schema of the table.
    ///
    /// # Arguments
    ///
    /// * `value` - the name of the schema; an empty name leaves the table unqualified
    pub fn with_schema<V: Into<String>>(mut self, value: V) -> Self {
        self.schema = value.into();
        self
    }

    /// Configures the number of rows written per batch when a bulk write fails.
    ///
    /// # Arguments
    ///
    /// * `value` - the batch size
    pub fn with_batch_size(mut self, value: usize) -> Self {
        self.batch_size = value;
        self
    }

    /// Configures the factory used to resolve upserters.
    ///
    /// # Arguments
    ///
    /// * `value` - the [upserter factory](UpserterFactory)
    pub fn with_factory<V: Into<Arc<UpserterFactory>>>(mut self, value: V) -> Self {
        self.factory = value.into();
        self
    }

    /// Gets the [schema](TableSchema) of the table.
    pub fn table(&self) -> &TableSchema {
        &self.table
    }

    /// Gets the database schema of the table.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    fn ident(&self) -> Ident<'_> {
        Ident::qualified(&self.schema, self.table.name())
    }

    fn single_key(&self, operation: &'static str) -> Result<String, RepositoryError> {
        match self.table.primary_key().as_slice() {
            [key] => Ok(key.clone()),
            _ => Err(RepositoryError::Unsupported {
                table: self.table.name().to_owned(),
                operation,
            }),
        }
    }

    /// Upserts the rows of a frame and commits them.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to write with
    /// * `frame` - the [frame](Frame) holding the rows
    /// * `on_conflict` - the [conflict policy](OnConflict)
    pub async fn upsert_records(
        &self,
        session: &mut dyn Session,
        frame: &Frame,
        on_conflict: OnConflict,
    ) -> Result<Upserted, RepositoryError> {
        let pks = self.table.primary_key();
        let table = if self.mapped {
            TableRef::Mapped(&self.table)
        } else {
            TableRef::Reflected(&self.table)
        };
        let request = UpsertRequest::new(table, &pks, frame)
            .schema(&self.schema)
            .on_conflict(on_conflict)
            .batch_size(self.batch_size);
        let upserter = self.factory.get_upserter(&*session)?;
        let upserted = upserter.upsert(session, &request).await?;

        session.commit().await?;
        debug!(
            table = self.table.name(),
            rows = upserted.rows(),
            estimated = upserted.estimated(),
            "upserted records"
        );

        Ok(upserted)
    }

    /// Upserts a single model, overwriting an existing row with the same key, and commits it.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to write with
    /// * `model` - the [model](Model) to upsert
    pub async fn upsert_record<M: Model + Sync>(
        &self,
        session: &mut dyn Session,
        model: &M,
    ) -> Result<Upserted, RepositoryError> {
        if M::TABLE != self.table.name() {
            return Err(RepositoryError::UnexpectedModel {
                expected: self.table.name().to_owned(),
                actual: M::TABLE,
            });
        }

        let frame = Frame::from_models(std::slice::from_ref(model));
        self.upsert_records(session, &frame, OnConflict::Update)
            .await
    }

    /// Permanently deletes rows by primary key and commits.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to write with
    /// * `ids` - the primary key values of the rows to delete
    pub async fn hard_delete(
        &self,
        session: &mut dyn Session,
        ids: &[Value],
    ) -> Result<u64, RepositoryError> {
        let key = self.single_key("deletes by key")?;

        if ids.is_empty() {
            return Ok(0);
        }

        let delete = command::delete(&self.ident(), &key, ids);
        let deleted = session.execute(&delete).await?.or_zero();

        session.commit().await?;
        debug!(table = self.table.name(), deleted, "deleted records");
        Ok(deleted)
    }

    /// Marks rows as inactive and deleted by primary key and commits.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to write with
    /// * `ids` - the primary key values of the rows to delete
    /// * `at` - the time of the deletion
    ///
    /// # Remarks
    ///
    /// Only tables with `active` and `deleted_at` columns support soft deletes.
    pub async fn soft_delete(
        &self,
        session: &mut dyn Session,
        ids: &[Value],
        at: NaiveDateTime,
    ) -> Result<u64, RepositoryError> {
        if self.table.find("active").is_none() || self.table.find("deleted_at").is_none() {
            return Err(RepositoryError::Unsupported {
                table: self.table.name().to_owned(),
                operation: "soft deletes",
            });
        }

        let key = self.single_key("deletes by key")?;

        if ids.is_empty() {
            return Ok(0);
        }

        let update = command::soft_delete(&self.ident(), &key, ids, at);
        let deleted = session.execute(&update).await?.or_zero();

        session.commit().await?;
        debug!(table = self.table.name(), deleted, "soft deleted records");
        Ok(deleted)
    }

    /// Reads the rows matching every filter.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to read with
    /// * `filters` - the column and [value](Value) pairs a row must equal
    ///
    /// # Remarks
    ///
    /// The returned [frame](Frame) has every column of the table, in schema order. Without
    /// filters, every row is read, including soft deleted rows.
    pub async fn get_records(
        &self,
        session: &mut dyn Session,
        filters: &[(&str, Value)],
    ) -> Result<Frame, RepositoryError> {
        let mut equals = Vec::with_capacity(filters.len());

        for (column, value) in filters {
            if self.table.find(column).is_none() {
                return Err(RepositoryError::UnknownColumn {
                    table: self.table.name().to_owned(),
                    column: (*column).to_owned(),
                });
            }

            equals.push(((*column).to_owned(), value.clone()));
        }

        let columns = self.table.columns();
        let kinds: Vec<_> = columns.iter().map(|c| c.kind()).collect();
        let select = command::select(&self.ident(), columns, &equals);
        let rows = session.query(&select, &kinds).await?;
        let mut frame = Frame::new(self.table.column_names())?;

        for row in rows {
            frame.push(row)?;
        }

        debug!(table = self.table.name(), rows = frame.len(), "read records");
        Ok(frame)
    }

    /// Reads the row with the specified primary key, if any.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to read with
    /// * `id` - the primary key [value](Value)
    ///
    /// # Remarks
    ///
    /// The returned values are ordered like the table columns.
    pub async fn get_record_by_id(
        &self,
        session: &mut dyn Session,
        id: Value,
    ) -> Result<Option<Vec<Value>>, RepositoryError> {
        let key = self.single_key("reads by key")?;
        let frame = self.get_records(session, &[(key.as_str(), id)]).await?;
        let record = frame.rows().next().map(|row| row.values().to_vec());

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeSession;
    use txns::{model::Type, ColumnType};
    use uuid::Uuid;

    fn people() -> SqlRepository {
        SqlRepository::reflected(
            TableSchema::new("people")
                .key("id", ColumnType::Int)
                .column("name", ColumnType::Text),
        )
        .with_schema("main")
    }

    #[tokio::test]
    async fn get_records_should_return_frame_of_table_columns() {
        // arrange
        let repository = people();
        let mut session = FakeSession::new("duckdb").returning(vec![
            vec![Value::Int(1), Value::from("Alice")],
            vec![Value::Int(2), Value::from("Bob")],
        ]);

        // act
        let frame = repository
            .get_records(&mut session, &[("name", Value::from("Alice"))])
            .await
            .unwrap();

        // assert
        assert_eq!(frame.columns(), ["id", "name"]);
        assert_eq!(frame.len(), 2);
        assert_eq!(
            session.queried[0].sql(),
            r#"SELECT CAST("id" AS BIGINT) AS "id", CAST("name" AS VARCHAR) AS "name" FROM "main"."people" WHERE "name" = $1"#
        );
    }

    #[tokio::test]
    async fn get_records_should_reject_unknown_filter_column() {
        // arrange
        let repository = people();
        let mut session = FakeSession::new("duckdb");

        // act
        let result = repository
            .get_records(&mut session, &[("email", Value::Null)])
            .await;

        // assert
        assert!(matches!(
            result,
            Err(RepositoryError::UnknownColumn { column, .. }) if column == "email"
        ));
        assert!(session.queried.is_empty());
    }

    #[tokio::test]
    async fn get_record_by_id_should_return_none_when_missing() {
        // arrange
        let repository = SqlRepository::mapped::<Type>();
        let mut session = FakeSession::new("postgresql");
        let id = Uuid::new_v4();

        // act
        let record = repository
            .get_record_by_id(&mut session, Value::Uuid(id))
            .await
            .unwrap();

        // assert
        assert!(record.is_none());
        assert_eq!(session.queried[0].params(), &[Value::Uuid(id)]);
        assert!(session.queried[0]
            .sql()
            .ends_with(r#"FROM "papita_transactions"."types" WHERE "id" = $1"#));
    }

    #[tokio::test]
    async fn get_records_should_reject_rows_of_another_shape() {
        // arrange
        let repository = people();
        let mut session = FakeSession::new("duckdb").returning(vec![vec![Value::Int(1)]]);

        // act
        let result = repository.get_records(&mut session, &[]).await;

        // assert
        assert!(matches!(result, Err(RepositoryError::Frame(_))));
    }
}
