mod conflict;
mod frame;
mod schema;
mod value;

pub use conflict::{OnConflict, ParseOnConflictError};
pub use frame::{AsRecord, Frame, FrameError, Record, Row, Rows};
pub use schema::{Column, TableSchema};
pub use value::{ColumnType, FromValue, FromValueError, ParseValueError, Value, ARRAY_SEPARATOR};

/// Contains the bookkeeping models.
pub mod model;

/// Contains support for model validation.
pub mod validate;

pub use model::{Model, ModelError, SCHEMA_NAME};
pub use validate::{Validate, ValidationError};
