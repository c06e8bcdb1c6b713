use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt::{Display, Formatter, Result as FormatResult, Write};
use thiserror::Error;
use uuid::Uuid;

/// Separates the items of a text array in its textual form.
pub const ARRAY_SEPARATOR: char = '|';

const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Represents the declared type of a column.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Indicates a boolean column.
    Bool,

    /// Indicates an integral column.
    Int,

    /// Indicates a floating point or decimal column.
    Float,

    /// Indicates a text column.
    Text,

    /// Indicates a UUID column.
    Uuid,

    /// Indicates a timestamp column without a time zone.
    Timestamp,

    /// Indicates a text array column.
    TextArray,
}

/// Represents the possible errors when parsing a [value](Value) from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{text}' is not a valid {kind:?} value")]
pub struct ParseValueError {
    text: String,
    kind: ColumnType,
}

impl ParseValueError {
    fn new(text: &str, kind: ColumnType) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Gets the text that could not be parsed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Gets the [column type](ColumnType) the text was parsed as.
    pub fn kind(&self) -> ColumnType {
        self.kind
    }
}

/// Represents a dynamically typed SQL value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Indicates the absence of a value.
    #[default]
    Null,

    /// Indicates a boolean value.
    Bool(bool),

    /// Indicates an integral value.
    Int(i64),

    /// Indicates a floating point value.
    Float(f64),

    /// Indicates a text value.
    Text(String),

    /// Indicates a UUID value.
    Uuid(Uuid),

    /// Indicates a timestamp value without a time zone.
    Timestamp(NaiveDateTime),

    /// Indicates a text array value.
    TextArray(Vec<String>),
}

impl Value {
    /// Gets a value indicating whether the value is [null](Value::Null).
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Parses a value of the specified column type from text.
    ///
    /// # Arguments
    ///
    /// * `text` - the text to parse
    /// * `kind` - the [type](ColumnType) of the column the value belongs to
    ///
    /// # Remarks
    ///
    /// Empty or whitespace-only text is always parsed as [null](Value::Null). Text arrays are
    /// written with their items separated by [`ARRAY_SEPARATOR`].
    pub fn parse(text: &str, kind: ColumnType) -> Result<Self, ParseValueError> {
        let text = text.trim();

        if text.is_empty() {
            return Ok(Self::Null);
        }

        let error = || ParseValueError::new(text, kind);

        match kind {
            ColumnType::Bool => match text.to_ascii_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" => Ok(Self::Bool(true)),
                "false" | "f" | "no" | "n" | "0" => Ok(Self::Bool(false)),
                _ => Err(error()),
            },
            ColumnType::Int => text.parse().map(Self::Int).map_err(|_| error()),
            ColumnType::Float => text.parse().map(Self::Float).map_err(|_| error()),
            ColumnType::Text => Ok(Self::Text(text.into())),
            ColumnType::Uuid => Uuid::parse_str(text).map(Self::Uuid).map_err(|_| error()),
            ColumnType::Timestamp => parse_timestamp(text).map(Self::Timestamp).ok_or_else(error),
            ColumnType::TextArray => Ok(Self::TextArray(
                text.split(ARRAY_SEPARATOR)
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(Into::into)
                    .collect(),
            )),
        }
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return Some(value.naive_utc());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Some(value);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(value) => Display::fmt(value, f),
            Self::Int(value) => Display::fmt(value, f),
            Self::Float(value) => Display::fmt(value, f),
            Self::Text(value) => f.write_str(value),
            Self::Uuid(value) => Display::fmt(value, f),
            Self::Timestamp(value) => Display::fmt(value, f),
            Self::TextArray(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_char(ARRAY_SEPARATOR)?;
                    }

                    f.write_str(item)?;
                }

                Ok(())
            }
        }
    }
}

macro_rules! from_int {
    ($($type:ty),*) => {
        $(
            impl From<$type> for Value {
                fn from(value: $type) -> Self {
                    Self::Int(value.into())
                }
            }
        )*
    };
}

from_int!(i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Self::TextArray(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Represents the error raised when a [value](Value) cannot be converted into a Rust type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("expected {expected}, but found {found:?}")]
pub struct FromValueError {
    expected: &'static str,
    found: Value,
}

impl FromValueError {
    /// Initializes a new [`FromValueError`].
    ///
    /// # Arguments
    ///
    /// * `expected` - a description of the expected value
    /// * `found` - the [value](Value) that could not be converted
    pub fn new(expected: &'static str, found: Value) -> Self {
        Self { expected, found }
    }

    /// Gets a description of the expected value.
    pub fn expected(&self) -> &str {
        self.expected
    }

    /// Gets the [value](Value) that could not be converted.
    pub fn found(&self) -> &Value {
        &self.found
    }
}

/// Defines the behavior of a type that can be read from a [value](Value).
pub trait FromValue: Sized {
    /// Converts a [value](Value) into the type.
    ///
    /// # Arguments
    ///
    /// * `value` - the [value](Value) to convert
    fn from_value(value: Value) -> Result<Self, FromValueError>;
}

macro_rules! from_value {
    ($($type:ty => $variant:ident as $expected:literal),* $(,)?) => {
        $(
            impl FromValue for $type {
                fn from_value(value: Value) -> Result<Self, FromValueError> {
                    match value {
                        Value::$variant(value) => Ok(value),
                        other => Err(FromValueError::new($expected, other)),
                    }
                }
            }
        )*
    };
}

from_value!(
    bool => Bool as "a boolean",
    i64 => Int as "an integer",
    String => Text as "text",
    NaiveDateTime => Timestamp as "a timestamp",
    Vec<String> => TextArray as "a text array",
);

impl FromValue for i16 {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Int(number) => {
                i16::try_from(number).map_err(|_| FromValueError::new("a 16-bit integer", value))
            }
            other => Err(FromValueError::new("a 16-bit integer", other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Float(number) => Ok(number),
            Value::Int(number) => Ok(number as f64),
            other => Err(FromValueError::new("a number", other)),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Uuid(id) => Ok(id),
            Value::Text(ref text) => {
                Uuid::parse_str(text).map_err(|_| FromValueError::new("a UUID", value.clone()))
            }
            other => Err(FromValueError::new("a UUID", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
