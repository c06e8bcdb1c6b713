use chrono::NaiveDateTime;
use std::collections::HashSet;
use thiserror::Error;

/// Represents a validation error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Indicates a text field is empty or whitespace.
    #[error("'{0}' cannot be empty")]
    Empty(&'static str),

    /// Indicates a list field has no items.
    #[error("'{0}' must contain at least one item")]
    NoItems(&'static str),

    /// Indicates a list field contains the same item more than once.
    #[error("'{field}' contains the duplicate item '{item}'")]
    DuplicateItem {
        /// Gets the name of the field.
        field: &'static str,

        /// Gets the duplicated item.
        item: String,
    },

    /// Indicates a numeric field is not greater than zero.
    #[error("'{field}' must be greater than zero, but was {value}")]
    NotPositive {
        /// Gets the name of the field.
        field: &'static str,

        /// Gets the offending value.
        value: f64,
    },

    /// Indicates a numeric field is outside of its allowed range.
    #[error("'{field}' must be in {range}, but was {value}")]
    OutOfRange {
        /// Gets the name of the field.
        field: &'static str,

        /// Gets the allowed range.
        range: &'static str,

        /// Gets the offending value.
        value: f64,
    },

    /// Indicates an end timestamp does not come after its start timestamp.
    #[error("'end_ts' ({end}) must be after 'start_ts' ({start})")]
    EndBeforeStart {
        /// Gets the start timestamp.
        start: NaiveDateTime,

        /// Gets the end timestamp.
        end: NaiveDateTime,
    },
}

/// Defines the behavior of a validated model.
pub trait Validate {
    /// Validates the model.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Ensures the specified text is not empty or whitespace.
///
/// # Arguments
///
/// * `field` - the name of the validated field
/// * `text` - the text to validate
pub fn not_empty(field: &'static str, text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::Empty(field))
    } else {
        Ok(())
    }
}

/// Ensures the specified items are non-empty and unique.
///
/// # Arguments
///
/// * `field` - the name of the validated field
/// * `items` - the items to validate
pub fn unique_items(field: &'static str, items: &[String]) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::NoItems(field));
    }

    let mut seen = HashSet::with_capacity(items.len());

    for item in items {
        if !seen.insert(item.as_str()) {
            return Err(ValidationError::DuplicateItem {
                field,
                item: item.clone(),
            });
        }
    }

    Ok(())
}

/// Ensures the specified value, if any, is greater than zero.
///
/// # Arguments
///
/// * `field` - the name of the validated field
/// * `value` - the value to validate
pub fn positive(field: &'static str, value: Option<f64>) -> Result<(), ValidationError> {
    match value {
        Some(value) if value <= 0.0 || value.is_nan() => {
            Err(ValidationError::NotPositive { field, value })
        }
        _ => Ok(()),
    }
}

/// Ensures the specified day of the month is between 1 and 28.
///
/// # Arguments
///
/// * `field` - the name of the validated field
/// * `day` - the day to validate
///
/// # Remarks
///
/// Days after the 28th are rejected so that a scheduled day exists in every month.
pub fn day_of_month(field: &'static str, day: i16) -> Result<(), ValidationError> {
    if (1..=28).contains(&day) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            range: "[1, 28]",
            value: day.into(),
        })
    }
}

/// Ensures the specified fraction is in the range (0, 1].
///
/// # Arguments
///
/// * `field` - the name of the validated field
/// * `value` - the value to validate
pub fn fraction(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            range: "(0, 1]",
            value,
        })
    }
}

/// Ensures the specified end timestamp, if any, comes after the start timestamp.
///
/// # Arguments
///
/// * `start` - the start timestamp
/// * `end` - the optional end timestamp
pub fn ordered(start: NaiveDateTime, end: Option<NaiveDateTime>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end <= start => Err(ValidationError::EndBeforeStart { start, end }),
        _ => Ok(()),
    }
}
