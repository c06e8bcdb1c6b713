use crate::validate::{not_empty, ordered, unique_items, Validate, ValidationError};
use chrono::NaiveDateTime;
use uuid::Uuid;

model! {
    /// Represents a financial account.
    ///
    /// # Remarks
    ///
    /// An account is further described by at most one asset account or liability account.
    pub struct Account in "accounts" key (id) {
        id: Uuid => Uuid,
        name: String => Text,
        description: String => Text,
        tags: Vec<String> => TextArray,

        /// Gets or sets the time the account was opened.
        start_ts: NaiveDateTime => Timestamp,

        /// Gets or sets the time the account was closed, if any.
        end_ts: Option<NaiveDateTime> => Timestamp,
        active: bool => Bool,
        deleted_at: Option<NaiveDateTime> => Timestamp,
    }
}

impl Validate for Account {
    fn validate(&self) -> Result<(), ValidationError> {
        not_empty("name", &self.name)?;
        not_empty("description", &self.description)?;
        unique_items("tags", &self.tags)?;
        ordered(self.start_ts, self.end_ts)
    }
}
