use crate::ColumnType;

/// Represents a table column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    name: String,
    kind: ColumnType,
    primary_key: bool,
}

impl Column {
    /// Initializes a new [`Column`].
    ///
    /// # Arguments
    ///
    /// * `name` - the column name
    /// * `kind` - the column [type](ColumnType)
    /// * `primary_key` - indicates whether the column is part of the primary key
    pub fn new<S: Into<String>>(name: S, kind: ColumnType, primary_key: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            primary_key,
        }
    }

    /// Gets the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the column [type](ColumnType).
    pub fn kind(&self) -> ColumnType {
        self.kind
    }

    /// Gets a value indicating whether the column is part of the primary key.
    pub fn primary_key(&self) -> bool {
        self.primary_key
    }
}

/// Represents the metadata of a table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    columns: Vec<Column>,
}

impl TableSchema {
    /// Initializes a new [`TableSchema`] without any columns.
    ///
    /// # Arguments
    ///
    /// * `name` - the table name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Adds a primary key column.
    ///
    /// # Arguments
    ///
    /// * `name` - the column name
    /// * `kind` - the column [type](ColumnType)
    pub fn key<S: Into<String>>(mut self, name: S, kind: ColumnType) -> Self {
        self.columns.push(Column::new(name, kind, true));
        self
    }

    /// Adds a column that is not part of the primary key.
    ///
    /// # Arguments
    ///
    /// * `name` - the column name
    /// * `kind` - the column [type](ColumnType)
    pub fn column<S: Into<String>>(mut self, name: S, kind: ColumnType) -> Self {
        self.columns.push(Column::new(name, kind, false));
        self
    }

    /// Gets the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the ordered table [columns](Column).
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Finds the [column](Column) with the specified name, if any.
    pub fn find(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Gets the ordered column names.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Gets the names of the columns forming the primary key.
    pub fn primary_key(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| c.name.clone())
            .collect()
    }
}
