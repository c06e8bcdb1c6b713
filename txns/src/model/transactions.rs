use crate::validate::{day_of_month, not_empty, positive, unique_items, Validate, ValidationError};
use chrono::NaiveDateTime;
use uuid::Uuid;

model! {
    /// Represents a recurring, planned transaction.
    pub struct IdentifiedTransaction in "identified_transactions" key (id) {
        id: Uuid => Uuid,
        type_id: Uuid => Uuid,
        name: String => Text,
        tags: Vec<String> => TextArray,
        description: String => Text,
        planned_value: f64 => Float,
        planned_transaction_day: i16 => Int,
        active: bool => Bool,
        deleted_at: Option<NaiveDateTime> => Timestamp,
    }
}

impl Validate for IdentifiedTransaction {
    fn validate(&self) -> Result<(), ValidationError> {
        not_empty("name", &self.name)?;
        not_empty("description", &self.description)?;
        unique_items("tags", &self.tags)?;
        positive("planned_value", Some(self.planned_value))?;
        day_of_month("planned_transaction_day", self.planned_transaction_day)
    }
}

model! {
    /// Represents a movement of money between accounts.
    ///
    /// # Remarks
    ///
    /// A transaction without a source account is an income and one without a target
    /// account is an expense.
    pub struct Transaction in "transactions" key (id) {
        id: Uuid => Uuid,
        identified_transaction_id: Option<Uuid> => Uuid,
        from_account_id: Option<Uuid> => Uuid,
        to_account_id: Option<Uuid> => Uuid,
        transaction_ts: NaiveDateTime => Timestamp,
        value: f64 => Float,
        active: bool => Bool,
        deleted_at: Option<NaiveDateTime> => Timestamp,
    }
}

impl Validate for Transaction {
    fn validate(&self) -> Result<(), ValidationError> {
        positive("value", Some(self.value))
    }
}
