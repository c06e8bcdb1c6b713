use txns::{Frame, OnConflict, TableSchema};

/// Represents the default number of rows written per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5000;

/// Represents a reference to the table targeted by an upsert.
#[derive(Copy, Clone, Debug)]
pub enum TableRef<'a> {
    /// Indicates a bare table name whose columns are taken from the frame.
    Named(&'a str),

    /// Indicates a table mapped from a [model](txns::Model).
    Mapped(&'a TableSchema),

    /// Indicates a table described at runtime.
    Reflected(&'a TableSchema),
}

impl<'a> TableRef<'a> {
    /// Gets the name of the table.
    pub fn name(&self) -> &'a str {
        match self {
            Self::Named(name) => name,
            Self::Mapped(schema) | Self::Reflected(schema) => schema.name(),
        }
    }

    /// Gets the table [schema](TableSchema), if known.
    pub fn schema(&self) -> Option<&'a TableSchema> {
        match self {
            Self::Named(_) => None,
            Self::Mapped(schema) | Self::Reflected(schema) => Some(schema),
        }
    }
}

impl<'a> From<&'a str> for TableRef<'a> {
    fn from(value: &'a str) -> Self {
        Self::Named(value)
    }
}

impl<'a> From<&'a TableSchema> for TableRef<'a> {
    fn from(value: &'a TableSchema) -> Self {
        Self::Reflected(value)
    }
}

/// Represents a request to upsert a frame into a table.
#[derive(Clone, Debug)]
pub struct UpsertRequest<'a> {
    schema: Option<&'a str>,
    table: TableRef<'a>,
    pks: &'a [String],
    frame: &'a Frame,
    on_conflict: OnConflict,
    batch_size: usize,
}

impl<'a> UpsertRequest<'a> {
    /// Initializes a new [`UpsertRequest`].
    ///
    /// # Arguments
    ///
    /// * `table` - the [target table](TableRef)
    /// * `pks` - the primary key columns
    /// * `frame` - the [frame](Frame) holding the rows to upsert
    pub fn new<T: Into<TableRef<'a>>>(table: T, pks: &'a [String], frame: &'a Frame) -> Self {
        Self {
            schema: None,
            table: table.into(),
            pks,
            frame,
            on_conflict: OnConflict::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Configures the database schema of the table.
    ///
    /// # Arguments
    ///
    /// * `value` - the name of the schema
    pub fn schema(mut self, value: &'a str) -> Self {
        self.schema = Some(value).filter(|s| !s.is_empty());
        self
    }

    /// Configures the conflict policy.
    ///
    /// # Arguments
    ///
    /// * `value` - the [conflict policy](OnConflict)
    pub fn on_conflict(mut self, value: OnConflict) -> Self {
        self.on_conflict = value;
        self
    }

    /// Configures the number of rows per batch when writing in batches.
    ///
    /// # Arguments
    ///
    /// * `value` - the batch size
    pub fn batch_size(mut self, value: usize) -> Self {
        self.batch_size = value;
        self
    }

    /// Gets the database schema of the table, if any.
    pub fn schema_name(&self) -> Option<&'a str> {
        self.schema
    }

    /// Gets the [target table](TableRef).
    pub fn table(&self) -> TableRef<'a> {
        self.table
    }

    /// Gets the primary key columns.
    pub fn primary_key(&self) -> &'a [String] {
        self.pks
    }

    /// Gets the [frame](Frame) holding the rows to upsert.
    pub fn frame(&self) -> &'a Frame {
        self.frame
    }

    /// Gets the [conflict policy](OnConflict).
    pub fn conflict(&self) -> OnConflict {
        self.on_conflict
    }

    /// Gets the number of rows per batch.
    pub fn size(&self) -> usize {
        self.batch_size
    }
}
