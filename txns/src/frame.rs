use crate::{Model, Value};
use thiserror::Error;

/// Represents the possible frame errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Indicates a row does not have one value per column.
    #[error("expected {expected} values in row {row}, but found {actual}")]
    Arity {
        /// Gets the zero-based index of the offending row.
        row: usize,

        /// Gets the expected number of values.
        expected: usize,

        /// Gets the actual number of values.
        actual: usize,
    },

    /// Indicates a column label appears more than once.
    #[error("the column '{0}' is defined more than once")]
    DuplicateColumn(String),
}

/// Represents an in-memory table of rows with labeled columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Initializes a new, empty [`Frame`].
    ///
    /// # Arguments
    ///
    /// * `columns` - the ordered column labels
    pub fn new<I, S>(columns: I) -> Result<Self, FrameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = Vec::new();

        for column in columns {
            let column = column.into();

            if labels.contains(&column) {
                return Err(FrameError::DuplicateColumn(column));
            }

            labels.push(column);
        }

        Ok(Self {
            columns: labels,
            rows: Vec::new(),
        })
    }

    /// Initializes a new [`Frame`] from a sequence of [models](Model).
    ///
    /// # Arguments
    ///
    /// * `models` - the models to create the frame from
    pub fn from_models<M: Model>(models: &[M]) -> Self {
        Self {
            columns: M::schema().column_names(),
            rows: models.iter().map(Model::values).collect(),
        }
    }

    /// Appends a row.
    ///
    /// # Arguments
    ///
    /// * `row` - the row values, one per column
    pub fn push(&mut self, row: Vec<Value>) -> Result<(), FrameError> {
        if row.len() != self.columns.len() {
            return Err(FrameError::Arity {
                row: self.rows.len(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }

        self.rows.push(row);
        Ok(())
    }

    /// Gets the ordered column labels.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Gets the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Gets a value indicating whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns an iterator over the frame [rows](Row).
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            columns: &self.columns,
            rows: self.rows.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a Frame {
    type Item = Row<'a>;
    type IntoIter = Rows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}

/// Represents an iterator over the [rows](Row) of a [frame](Frame).
pub struct Rows<'a> {
    columns: &'a [String],
    rows: std::slice::Iter<'a, Vec<Value>>,
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(|values| Row {
            columns: self.columns,
            values,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for Rows<'_> {}

/// Represents a row of a [frame](Frame) that retains its column labels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Gets the value of the specified column, if any.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Gets the row values in column order.
    pub fn values(&self) -> &'a [Value] {
        self.values
    }
}

/// Represents a row projected onto a set of column keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    /// Gets the projected column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Gets the projected values in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Gets the value of the specified column, if any.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Gets a value indicating whether the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Defines the behavior of a row that can be projected onto column keys.
pub trait AsRecord {
    /// Converts the row into a [record](Record) restricted to the specified keys.
    ///
    /// # Arguments
    ///
    /// * `keys` - the ordered column keys
    fn to_record(&self, keys: &[String]) -> Record;
}

impl AsRecord for Row<'_> {
    fn to_record(&self, keys: &[String]) -> Record {
        let mut record = Record::default();

        for key in keys {
            if let Some(value) = self.get(key) {
                record.columns.push(key.clone());
                record.values.push(value.clone());
            }
        }

        record
    }
}

impl AsRecord for [Value] {
    fn to_record(&self, keys: &[String]) -> Record {
        Record {
            columns: keys.iter().take(self.len()).cloned().collect(),
            values: self.iter().take(keys.len()).cloned().collect(),
        }
    }
}

impl AsRecord for Vec<Value> {
    fn to_record(&self, keys: &[String]) -> Record {
        self.as_slice().to_record(keys)
    }
}
