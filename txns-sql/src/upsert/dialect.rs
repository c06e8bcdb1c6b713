use super::{ConflictMethod, UpsertContext, UpsertError, Upserter};
use crate::sql::{command, Statement};
use txns::{OnConflict, Record};

/// Builds a statement that inserts records and skips those whose primary key already exists.
///
/// # Arguments
///
/// * `context` - the [context](UpsertContext) of the upsert
/// * `records` - the [records](Record) to insert
pub fn on_conflict_do_nothing(
    context: &UpsertContext<'_>,
    records: &[Record],
) -> Result<Statement, UpsertError> {
    command::insert(
        context.table(),
        context.primary_key(),
        records,
        OnConflict::Nothing,
    )
}

/// Builds a statement that inserts records and overwrites the non-key columns of those
/// whose primary key already exists.
///
/// # Arguments
///
/// * `context` - the [context](UpsertContext) of the upsert
/// * `records` - the [records](Record) to insert
pub fn on_conflict_do_update(
    context: &UpsertContext<'_>,
    records: &[Record],
) -> Result<Statement, UpsertError> {
    command::insert(
        context.table(),
        context.primary_key(),
        records,
        OnConflict::Update,
    )
}

#[inline]
fn conflict_method(conflict: OnConflict) -> ConflictMethod {
    match conflict {
        OnConflict::Nothing => on_conflict_do_nothing,
        OnConflict::Update => on_conflict_do_update,
    }
}

/// Represents the [upserter](Upserter) for PostgreSQL.
#[derive(Copy, Clone, Debug, Default)]
pub struct PostgresUpserter;

impl Upserter for PostgresUpserter {
    fn dialect(&self) -> &'static str {
        "postgresql"
    }

    fn conflict_method(&self, conflict: OnConflict) -> ConflictMethod {
        conflict_method(conflict)
    }
}

/// Represents the [upserter](Upserter) for DuckDB.
///
/// # Remarks
///
/// DuckDB accepts the PostgreSQL `ON CONFLICT` syntax, so statements are built the same way.
#[derive(Copy, Clone, Debug, Default)]
pub struct DuckDbUpserter;

impl Upserter for DuckDbUpserter {
    fn dialect(&self) -> &'static str {
        "duckdb"
    }

    fn conflict_method(&self, conflict: OnConflict) -> ConflictMethod {
        conflict_method(conflict)
    }
}
