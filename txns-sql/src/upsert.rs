mod batch;
mod context;
mod dialect;
mod factory;
mod outcome;
mod request;

pub use batch::{slice_batches, Batches};
pub use context::UpsertContext;
pub use dialect::{on_conflict_do_nothing, on_conflict_do_update, DuckDbUpserter, PostgresUpserter};
pub use factory::UpserterFactory;
pub use outcome::{UpsertPath, Upserted};
pub use request::{TableRef, UpsertRequest, DEFAULT_BATCH_SIZE};

use crate::{sql::Statement, RowCount, Session, SessionError};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use txns::{OnConflict, Record};

/// Represents the function that builds the upsert statement for one conflict policy.
pub type ConflictMethod = fn(&UpsertContext<'_>, &[Record]) -> Result<Statement, UpsertError>;

/// Represents the possible upsert errors.
#[derive(Error, Debug)]
pub enum UpsertError {
    /// Indicates no upserter is registered for a dialect.
    #[error("the dialect '{0}' is not supported")]
    UnsupportedDialect(String),

    /// Indicates an upserter was used with a session of another dialect.
    #[error("the upserter supports the dialect '{expected}', but the session uses '{actual}'")]
    DialectMismatch {
        /// Gets the dialect supported by the upserter.
        expected: String,

        /// Gets the dialect of the session.
        actual: String,
    },

    /// Indicates a table referenced only by name cannot be written in batches.
    #[error("the table '{0}' is referenced by name only; batches require a mapped or reflected table")]
    UnsupportedTable(String),

    /// Indicates the primary key is empty or not a subset of the table columns.
    #[error("the primary key must be a non-empty subset of the columns of the table '{0}'")]
    InvalidPrimaryKey(String),

    /// Indicates the batch size is zero.
    #[error("the batch size must be greater than zero")]
    InvalidBatchSize,

    /// Indicates a record does not have the same columns as the first record of its batch.
    #[error("record {index} does not have the same columns as the first record of the batch")]
    RaggedBatch {
        /// Gets the zero-based index of the offending record.
        index: usize,
    },

    /// Indicates there is nothing to insert.
    #[error("the records to insert do not have any columns")]
    NoColumns,

    /// Indicates a [session error](SessionError).
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Defines the behavior of a dialect-specific bulk upserter.
#[async_trait]
pub trait Upserter: Send + Sync {
    /// Gets the name of the supported SQL dialect.
    fn dialect(&self) -> &'static str;

    /// Gets the [method](ConflictMethod) that builds statements for a conflict policy.
    ///
    /// # Arguments
    ///
    /// * `conflict` - the [conflict policy](OnConflict)
    fn conflict_method(&self, conflict: OnConflict) -> ConflictMethod;

    /// Upserts the rows of a frame into a table.
    ///
    /// # Arguments
    ///
    /// * `session` - the [session](Session) to write with
    /// * `request` - the [request](UpsertRequest) to fulfill
    ///
    /// # Remarks
    ///
    /// All rows are first written with a single statement through [Session::append]. A count
    /// of zero or an unknown count for a non-empty frame is reported as the number of rows in
    /// the frame and flagged as [estimated](Upserted::estimated). When the statement
    /// fails, rows are written in batches through [Session::execute] and committed once. Batch
    /// errors are not caught; they propagate and leave the batched writes uncommitted. The
    /// session must use the dialect of the upserter, which is guaranteed when the upserter
    /// is obtained from an [UpserterFactory].
    async fn upsert(
        &self,
        session: &mut dyn Session,
        request: &UpsertRequest<'_>,
    ) -> Result<Upserted, UpsertError> {
        if !session.dialect().eq_ignore_ascii_case(self.dialect()) {
            return Err(UpsertError::DialectMismatch {
                expected: self.dialect().to_owned(),
                actual: session.dialect().to_owned(),
            });
        }

        let context = UpsertContext::new(request, self.conflict_method(request.conflict()))?;
        let frame = request.frame();
        let total = frame.len() as u64;

        if frame.is_empty() {
            return Ok(Upserted::new(0, false, UpsertPath::Bulk));
        }

        let attempt = {
            let records: Vec<_> = frame.rows().map(|row| context.record(&row)).collect();

            match context.build(&records) {
                Ok(statement) => session.append(&statement).await.map_err(UpsertError::from),
                Err(error) => Err(error),
            }
        };

        let reason = match attempt {
            Ok(RowCount::Exact(rows)) if rows > 0 => {
                return Ok(Upserted::new(rows, false, UpsertPath::Bulk))
            }
            Ok(_) => return Ok(Upserted::new(total, true, UpsertPath::Bulk)),
            Err(error) => error.to_string(),
        };

        warn!(
            table = %context.table(),
            error = %reason,
            "single statement upsert failed; falling back to batches"
        );

        let table = request.table();

        if table.schema().is_none() {
            return Err(UpsertError::UnsupportedTable(table.name().to_owned()));
        }

        info!(
            table = %context.table(),
            rows = total,
            batch_size = request.size(),
            "upserting in batches"
        );

        let mut rows = 0;
        let mut batches = 0;

        for batch in slice_batches(frame.rows(), request.size())? {
            let records: Vec<_> = batch.iter().map(|row| context.record(row)).collect();
            let statement = context.build(&records)?;
            let count = session.execute(&statement).await?;

            batches += 1;
            rows += count.or_zero();
            debug!(batch = batches, rows = records.len(), affected = ?count, "upserted batch");
        }

        session.commit().await?;
        debug!(table = %context.table(), batches, "committed batches");

        let path = UpsertPath::Batched { reason, batches };

        if rows == 0 {
            Ok(Upserted::new(total, true, path))
        } else {
            Ok(Upserted::new(rows, false, path))
        }
    }
}

#[cfg(test)]
mod tests;
