use crate::validate::{not_empty, unique_items, Validate, ValidationError};
use chrono::NaiveDateTime;
use uuid::Uuid;

model! {
    /// Represents a classification shared by accounts and transactions.
    pub struct Type in "types" key (id) {
        id: Uuid => Uuid,

        /// Gets or sets the unique type name.
        name: String => Text,
        tags: Vec<String> => TextArray,
        description: String => Text,

        /// Gets or sets the name of the family of records the type applies to.
        discriminator: String => Text,
        active: bool => Bool,
        deleted_at: Option<NaiveDateTime> => Timestamp,
    }
}

impl Validate for Type {
    fn validate(&self) -> Result<(), ValidationError> {
        not_empty("name", &self.name)?;
        not_empty("description", &self.description)?;
        not_empty("discriminator", &self.discriminator)?;
        unique_items("tags", &self.tags)
    }
}
