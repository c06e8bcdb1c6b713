use super::{ConflictMethod, TableRef, UpsertError, UpsertRequest};
use crate::sql::{Ident, Statement};
use txns::{AsRecord, Record};

/// Represents the state of a single upsert call.
///
/// # Remarks
///
/// The context is created per call and never shared, so concurrent upserts through the
/// same [upserter](super::Upserter) cannot observe each other's keys or columns.
pub struct UpsertContext<'a> {
    table: Ident<'a>,
    pks: &'a [String],
    columns: Vec<String>,
    method: ConflictMethod,
}

impl<'a> UpsertContext<'a> {
    /// Initializes a new [`UpsertContext`] from a request.
    ///
    /// # Arguments
    ///
    /// * `request` - the [request](UpsertRequest) to resolve
    /// * `method` - the [conflict method](ConflictMethod) of the dialect
    pub fn new(request: &UpsertRequest<'a>, method: ConflictMethod) -> Result<Self, UpsertError> {
        if request.size() == 0 {
            return Err(UpsertError::InvalidBatchSize);
        }

        let table = request.table();
        let columns = match table {
            TableRef::Named(_) => request.frame().columns().to_vec(),
            TableRef::Mapped(schema) | TableRef::Reflected(schema) => schema.column_names(),
        };
        let pks = request.primary_key();

        if pks.is_empty() || pks.iter().any(|pk| !columns.contains(pk)) {
            return Err(UpsertError::InvalidPrimaryKey(table.name().to_owned()));
        }

        let table = match request.schema_name() {
            Some(schema) => Ident::qualified(schema, table.name()),
            _ => Ident::unqualified(table.name()),
        };

        Ok(Self {
            table,
            pks,
            columns,
            method,
        })
    }

    /// Gets the target table [identifier](Ident).
    pub fn table(&self) -> &Ident<'a> {
        &self.table
    }

    /// Gets the primary key columns.
    pub fn primary_key(&self) -> &[String] {
        self.pks
    }

    /// Gets the resolved table columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Projects a row onto the resolved table columns.
    ///
    /// # Arguments
    ///
    /// * `row` - the row to project
    pub fn record<R: AsRecord + ?Sized>(&self, row: &R) -> Record {
        row.to_record(&self.columns)
    }

    /// Builds the statement that upserts the specified records.
    ///
    /// # Arguments
    ///
    /// * `records` - the [records](Record) to upsert
    pub fn build(&self, records: &[Record]) -> Result<Statement, UpsertError> {
        (self.method)(self, records)
    }
}
