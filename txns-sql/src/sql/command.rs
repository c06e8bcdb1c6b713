use super::{Ident, StatementBuilder, Statement};
use crate::UpsertError;
use chrono::NaiveDateTime;
use txns::{Column, ColumnType, OnConflict, Record, Value};

/// Creates a multi-row insert with an `ON CONFLICT` clause.
///
/// # Arguments
///
/// * `table` - the target table [identifier](Ident)
/// * `pks` - the primary key columns used as the conflict target
/// * `records` - the [records](Record) to insert
/// * `conflict` - the [conflict policy](OnConflict)
///
/// # Remarks
///
/// Every record must have the same columns as the first record. With [OnConflict::Update],
/// every inserted column outside of the primary key is set to its excluded value. When no
/// such column is inserted, the statement degrades to `DO NOTHING`.
pub fn insert(
    table: &Ident<'_>,
    pks: &[String],
    records: &[Record],
    conflict: OnConflict,
) -> Result<Statement, UpsertError> {
    let columns = match records.first() {
        Some(first) if !first.is_empty() => first.columns(),
        _ => return Err(UpsertError::NoColumns),
    };

    if let Some(index) = records.iter().position(|r| r.columns() != columns) {
        return Err(UpsertError::RaggedBatch { index });
    }

    let mut insert = StatementBuilder::new("INSERT INTO ");

    insert
        .push(table)
        .push(" (")
        .push_separated(columns, ", ", |b, c| {
            b.push(Ident::unqualified(c));
        })
        .push(") VALUES ")
        .push_separated(records, ", ", |b, r| {
            b.push('(')
                .push_separated(r.values(), ", ", |b, v| {
                    b.push_bind(v.clone());
                })
                .push(')');
        })
        .push(" ON CONFLICT (")
        .push_separated(pks, ", ", |b, c| {
            b.push(Ident::unqualified(c));
        })
        .push(") DO ");

    let updates: Vec<_> = columns.iter().filter(|c| !pks.contains(c)).collect();

    if conflict == OnConflict::Nothing || updates.is_empty() {
        insert.push("NOTHING");
    } else {
        insert
            .push("UPDATE SET ")
            .push_separated(updates, ", ", |b, c| {
                let column = Ident::unqualified(c);
                b.push(column).push(" = EXCLUDED.").push(column);
            });
    }

    Ok(insert.build())
}

fn push_keys(builder: &mut StatementBuilder, key: &str, ids: &[Value]) {
    builder
        .push(" WHERE ")
        .push(Ident::unqualified(key))
        .push(" IN (")
        .push_separated(ids, ", ", |b, id| {
            b.push_bind(id.clone());
        })
        .push(')');
}

/// Creates a statement that permanently deletes rows by key.
///
/// # Arguments
///
/// * `table` - the target table [identifier](Ident)
/// * `key` - the primary key column
/// * `ids` - the key values of the rows to delete
pub fn delete(table: &Ident<'_>, key: &str, ids: &[Value]) -> Statement {
    let mut delete = StatementBuilder::new("DELETE FROM ");

    delete.push(table);
    push_keys(&mut delete, key, ids);
    delete.build()
}

/// Creates a statement that marks rows as deleted by key.
///
/// # Arguments
///
/// * `table` - the target table [identifier](Ident)
/// * `key` - the primary key column
/// * `ids` - the key values of the rows to delete
/// * `at` - the time of the deletion
pub fn soft_delete(table: &Ident<'_>, key: &str, ids: &[Value], at: NaiveDateTime) -> Statement {
    let mut update = StatementBuilder::new("UPDATE ");

    update
        .push(table)
        .push(" SET ")
        .push(Ident::unqualified("active"))
        .push(" = ")
        .push_bind(false)
        .push(", ")
        .push(Ident::unqualified("deleted_at"))
        .push(" = ")
        .push_bind(at);
    push_keys(&mut update, key, ids);
    update.build()
}

fn cast(kind: ColumnType) -> &'static str {
    match kind {
        ColumnType::Bool => "BOOLEAN",
        ColumnType::Int => "BIGINT",
        ColumnType::Float => "FLOAT8",
        ColumnType::Text | ColumnType::Uuid => "VARCHAR",
        ColumnType::Timestamp => "TIMESTAMP",
        ColumnType::TextArray => "VARCHAR[]",
    }
}

/// Creates a query that selects rows matching every filter.
///
/// # Arguments
///
/// * `table` - the source table [identifier](Ident)
/// * `columns` - the [columns](Column) to select
/// * `filters` - the column and [value](Value) pairs a row must equal
///
/// # Remarks
///
/// Every column is cast to the widest type of its [column type](ColumnType), so both dialects
/// return the same result types. A [null](Value::Null) filter matches `IS NULL`.
pub fn select(table: &Ident<'_>, columns: &[Column], filters: &[(String, Value)]) -> Statement {
    let mut select = StatementBuilder::new("SELECT ");

    select
        .push_separated(columns, ", ", |b, c| {
            let column = Ident::unqualified(c.name());
            b.push("CAST(")
                .push(column)
                .push(" AS ")
                .push(cast(c.kind()))
                .push(") AS ")
                .push(column);
        })
        .push(" FROM ")
        .push(table);

    if !filters.is_empty() {
        select
            .push(" WHERE ")
            .push_separated(filters, " AND ", |b, (name, value)| {
                b.push(Ident::unqualified(name));

                if value.is_null() {
                    b.push(" IS NULL");
                } else {
                    b.push(" = ").push_bind(value.clone());
                }
            });
    }

    select.build()
}
