use std::{io::Read, path::Path};
use thiserror::Error;
use tracing::info;
use txns::{Frame, FrameError, OnConflict, ParseValueError, TableSchema, Value};
use txns_sql::{
    repository::SqlRepository,
    service::{ServiceError, SqlService},
    SqlConnector, SqlConnectorError, Upserted,
};

/// Represents the possible errors when loading a file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Indicates the table is not a known bookkeeping table.
    #[error("the table '{0}' is unknown; run `txns tables` to list the known tables")]
    UnknownTable(String),

    /// Indicates a header of the file is not a column of the table.
    #[error("the column '{column}' is not defined by table '{table}'")]
    UnknownColumn {
        /// Gets the name of the table.
        table: String,

        /// Gets the name of the unknown column.
        column: String,
    },

    /// Indicates the file does not provide a primary key column.
    #[error("the primary key column '{0}' is missing from the file")]
    MissingKey(String),

    /// Indicates a cell could not be parsed as the type of its column.
    #[error("line {line}, column '{column}': {source}")]
    Cell {
        /// Gets the one-based line of the cell.
        line: u64,

        /// Gets the column of the cell.
        column: String,

        /// Gets the [parse error](ParseValueError).
        #[source]
        source: ParseValueError,
    },

    /// Indicates the file is not valid CSV.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Indicates a [frame error](FrameError).
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Indicates a [connector error](SqlConnectorError).
    #[error(transparent)]
    Connector(#[from] SqlConnectorError),

    /// Indicates a [service error](ServiceError).
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Represents the options of a load.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Gets or sets the database schema of the table.
    pub schema: String,

    /// Gets or sets the conflict policy.
    pub on_conflict: OnConflict,

    /// Gets or sets the number of rows per batch when the bulk statement fails.
    pub batch_size: usize,

    /// Gets or sets the fraction of rows that may be missing from the upsert.
    pub tolerance: f64,
}

/// Finds the schema of a bookkeeping table by name.
///
/// # Arguments
///
/// * `name` - the name of the table
pub fn table(name: &str) -> Result<TableSchema, LoadError> {
    txns::model::schema(name).ok_or_else(|| LoadError::UnknownTable(name.into()))
}

/// Reads delimited text into a [frame](Frame) typed by the columns of a table.
///
/// # Arguments
///
/// * `reader` - the [reader](Read) of the delimited text
/// * `table` - the [schema](TableSchema) of the target table
/// * `delimiter` - the field delimiter
///
/// # Remarks
///
/// The first line holds the column names. Columns of the table that are absent from the
/// header are left to the database.
pub fn read_frame<R: Read>(
    reader: R,
    table: &TableSchema,
    delimiter: u8,
) -> Result<Frame, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut kinds = Vec::new();
    let headers = reader.headers()?.clone();

    for header in &headers {
        match table.find(header) {
            Some(column) => kinds.push(column.kind()),
            None => {
                return Err(LoadError::UnknownColumn {
                    table: table.name().into(),
                    column: header.into(),
                })
            }
        }
    }

    for key in table.primary_key() {
        if !headers.iter().any(|header| header == key) {
            return Err(LoadError::MissingKey(key));
        }
    }

    let mut frame = Frame::new(&headers)?;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |position| position.line());
        let mut row = Vec::with_capacity(kinds.len());

        for ((cell, kind), column) in record.iter().zip(&kinds).zip(&headers) {
            let value = Value::parse(cell, *kind).map_err(|source| LoadError::Cell {
                line,
                column: column.into(),
                source,
            })?;

            row.push(value);
        }

        frame.push(row)?;
    }

    Ok(frame)
}

/// Upserts a [frame](Frame) into a table.
///
/// # Arguments
///
/// * `connector` - the [connector](SqlConnector) of the database
/// * `table` - the [schema](TableSchema) of the target table
/// * `frame` - the [frame](Frame) to upsert
/// * `options` - the [options](LoadOptions) of the load
pub async fn load(
    connector: &SqlConnector,
    table: TableSchema,
    frame: &Frame,
    options: &LoadOptions,
) -> Result<Upserted, LoadError> {
    let repository = SqlRepository::reflected(table)
        .with_schema(options.schema.as_str())
        .with_batch_size(options.batch_size);
    let service = SqlService::builder(repository)
        .tolerance(options.tolerance)
        .on_conflict(options.on_conflict)
        .build()?;
    let mut session = connector.session().await?;

    Ok(service.upsert_frame(&mut *session, frame).await?)
}

/// Loads a delimited file into a table.
///
/// # Arguments
///
/// * `connector` - the [connector](SqlConnector) of the database
/// * `table` - the name of the target table
/// * `path` - the path of the file
/// * `delimiter` - the field delimiter
/// * `options` - the [options](LoadOptions) of the load
pub async fn load_file(
    connector: &SqlConnector,
    table: &str,
    path: &Path,
    delimiter: u8,
    options: &LoadOptions,
) -> Result<Upserted, LoadError> {
    let table = self::table(table)?;
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    let frame = read_frame(file, &table, delimiter)?;

    info!(
        table = table.name(),
        file = %path.display(),
        rows = frame.len(),
        "loading file"
    );

    load(connector, table, &frame, options).await
}
