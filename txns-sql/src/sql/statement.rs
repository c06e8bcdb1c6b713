use std::fmt::{Display, Formatter, Result as FmtResult, Write};
use txns::Value;

/// Represents a SQL statement and its bound parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
}

impl Statement {
    /// Gets the SQL text of the statement.
    ///
    /// # Remarks
    ///
    /// Parameters are referenced by position using `$1`, `$2`, and so on.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Gets the ordered statement parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.sql)
    }
}

/// Represents a builder of [statements](Statement).
#[derive(Default)]
pub struct StatementBuilder {
    statement: Statement,
}

impl StatementBuilder {
    /// Initializes a new [`StatementBuilder`].
    ///
    /// # Arguments
    ///
    /// * `init` - the initial SQL text
    pub fn new<S: Into<String>>(init: S) -> Self {
        Self {
            statement: Statement {
                sql: init.into(),
                params: Vec::new(),
            },
        }
    }

    /// Appends SQL text to the statement.
    ///
    /// # Arguments
    ///
    /// * `sql` - the SQL text to append
    pub fn push(&mut self, sql: impl Display) -> &mut Self {
        // writing into a String cannot fail
        let _ = write!(self.statement.sql, "{sql}");
        self
    }

    /// Appends a bound parameter to the statement.
    ///
    /// # Arguments
    ///
    /// * `value` - the parameter [value](Value)
    ///
    /// # Remarks
    ///
    /// [Null](Value::Null) is written as a literal `NULL` so that untyped nulls never reach
    /// the driver. Text arrays are cast to `VARCHAR[]`, which both dialects understand.
    pub fn push_bind<V: Into<Value>>(&mut self, value: V) -> &mut Self {
        let value = value.into();

        if value.is_null() {
            self.statement.sql.push_str("NULL");
            return self;
        }

        let array = matches!(value, Value::TextArray(_));

        self.statement.params.push(value);

        let index = self.statement.params.len();

        if array {
            self.push(format_args!("CAST(${index} AS VARCHAR[])"))
        } else {
            self.push(format_args!("${index}"))
        }
    }

    /// Appends each item separated by the specified text.
    ///
    /// # Arguments
    ///
    /// * `items` - the items to append
    /// * `separator` - the text written between items
    /// * `push` - the function that appends a single item
    pub fn push_separated<I, F>(&mut self, items: I, separator: &str, mut push: F) -> &mut Self
    where
        I: IntoIterator,
        F: FnMut(&mut Self, I::Item),
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.statement.sql.push_str(separator);
            }

            push(self, item);
        }

        self
    }

    /// Gets the number of bound parameters.
    pub fn len(&self) -> usize {
        self.statement.params.len()
    }

    /// Gets a value indicating whether no parameters are bound.
    pub fn is_empty(&self) -> bool {
        self.statement.params.is_empty()
    }

    /// Builds and returns the [statement](Statement).
    pub fn build(self) -> Statement {
        self.statement
    }
}
