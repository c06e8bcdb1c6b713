use crate::{FromValueError, TableSchema, Value};
use thiserror::Error;

/// Represents the default database schema of the bookkeeping tables.
pub const SCHEMA_NAME: &str = "papita_transactions";

/// Represents the possible errors when reading a [model](Model) from stored values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Indicates the number of values differs from the number of columns.
    #[error("expected {expected} values, but found {actual}")]
    Arity {
        /// Gets the number of columns of the model.
        expected: usize,

        /// Gets the number of values.
        actual: usize,
    },

    /// Indicates a value cannot be converted to the type of its field.
    #[error("the column '{column}' is invalid: {source}")]
    Column {
        /// Gets the name of the column.
        column: &'static str,

        /// Gets the [conversion error](FromValueError).
        #[source]
        source: FromValueError,
    },
}

/// Defines the behavior of a model mapped to a table.
pub trait Model: Sized {
    /// Gets the name of the mapped table.
    const TABLE: &'static str;

    /// Gets the names of the primary key columns.
    const KEY: &'static [&'static str];

    /// Gets the [schema](TableSchema) of the mapped table.
    fn schema() -> TableSchema;

    /// Gets the model [values](Value) ordered like the schema columns.
    fn values(&self) -> Vec<Value>;

    /// Reads a model from [values](Value) ordered like the schema columns.
    ///
    /// # Arguments
    ///
    /// * `values` - the stored [values](Value) of the model
    fn from_values(values: Vec<Value>) -> Result<Self, ModelError>;

    /// Gets the [values](Value) of the primary key columns.
    fn key_values(&self) -> Vec<Value> {
        Self::schema()
            .columns()
            .iter()
            .zip(self.values())
            .filter(|(column, _)| column.primary_key())
            .map(|(_, value)| value)
            .collect()
    }
}

macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident in $table:literal key ($($key:ident),+) {
            $(
                $(#[$field_meta:meta])*
                $field:ident: $type:ty => $kind:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $type,
            )+
        }

        impl $crate::Model for $name {
            const TABLE: &'static str = $table;
            const KEY: &'static [&'static str] = &[$(stringify!($key)),+];

            fn schema() -> $crate::TableSchema {
                let mut schema = $crate::TableSchema::new(Self::TABLE);

                $(
                    let name = stringify!($field);
                    let kind = $crate::ColumnType::$kind;

                    schema = if Self::KEY.contains(&name) {
                        schema.key(name, kind)
                    } else {
                        schema.column(name, kind)
                    };
                )+

                schema
            }

            fn values(&self) -> Vec<$crate::Value> {
                vec![$($crate::Value::from(self.$field.clone())),+]
            }

            fn from_values(
                values: Vec<$crate::Value>,
            ) -> Result<Self, $crate::ModelError> {
                let expected = [$(stringify!($field)),+].len();

                if values.len() != expected {
                    return Err($crate::ModelError::Arity {
                        expected,
                        actual: values.len(),
                    });
                }

                let mut values = values.into_iter();

                Ok(Self {
                    $(
                        $field: <$type as $crate::FromValue>::from_value(
                            values.next().unwrap_or_default(),
                        )
                        .map_err(|source| $crate::ModelError::Column {
                            column: stringify!($field),
                            source,
                        })?,
                    )+
                })
            }
        }
    };
}

mod accounts;
mod assets;
mod enums;
mod liabilities;
mod transactions;
mod types;

pub use accounts::Account;
pub use assets::{
    AssetAccount, BankingAssetAccount, RealEstateAssetAccount, TradingAssetAccount,
};
pub use enums::{AreaUnit, Ownership, ParseEnumError};
pub use liabilities::{
    BankCreditLiabilityAccount, CreditCardLiabilityAccount, LiabilityAccount,
};
pub use transactions::{IdentifiedTransaction, Transaction};
pub use types::Type;

/// Gets the schema of every bookkeeping table.
///
/// # Remarks
///
/// Tables are listed so that a table always follows the tables it references.
pub fn schemas() -> Vec<TableSchema> {
    vec![
        Type::schema(),
        Account::schema(),
        LiabilityAccount::schema(),
        BankCreditLiabilityAccount::schema(),
        CreditCardLiabilityAccount::schema(),
        AssetAccount::schema(),
        BankingAssetAccount::schema(),
        RealEstateAssetAccount::schema(),
        TradingAssetAccount::schema(),
        IdentifiedTransaction::schema(),
        Transaction::schema(),
    ]
}

/// Finds the schema of the table with the specified name, if any.
///
/// # Arguments
///
/// * `table` - the name of the table
pub fn schema(table: &str) -> Option<TableSchema> {
    schemas().into_iter().find(|schema| schema.name() == table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColumnType;
    use rstest::rstest;

    #[rstest]
    #[case("types", &["id"])]
    #[case("accounts", &["id"])]
    #[case("banking_asset_accounts", &["asset_account_id"])]
    #[case("credit_card_liability_accounts", &["liability_account_id"])]
    #[case("transactions", &["id"])]
    fn schema_should_resolve_table_by_name(#[case] table: &str, #[case] key: &[&str]) {
        // arrange

        // act
        let schema = schema(table).unwrap();

        // assert
        assert_eq!(schema.name(), table);
        assert_eq!(schema.primary_key(), key)
    }

    #[test]
    fn schema_should_return_none_for_unknown_table() {
        assert!(schema("users").is_none())
    }

    #[test]
    fn schemas_should_have_unique_names() {
        // arrange
        let schemas = schemas();

        // act
        let mut names: Vec<_> = schemas.iter().map(|s| s.name().to_owned()).collect();
        names.sort();
        names.dedup();

        // assert
        assert_eq!(names.len(), schemas.len())
    }

    #[test]
    fn core_tables_should_support_soft_delete() {
        for table in ["types", "accounts", "identified_transactions", "transactions"] {
            let schema = schema(table).unwrap();

            assert_eq!(schema.find("active").unwrap().kind(), ColumnType::Bool);
            assert_eq!(
                schema.find("deleted_at").unwrap().kind(),
                ColumnType::Timestamp
            );
        }
    }

    fn property() -> RealEstateAssetAccount {
        RealEstateAssetAccount {
            asset_account_id: uuid::Uuid::new_v4(),
            address: "12 Main St".into(),
            city: "Bogota".into(),
            country: "Colombia".into(),
            total_area: 120.0,
            built_area: 90.0,
            area_unit: AreaUnit::SquareMeters,
            ownership: Ownership::Partial,
            participation: 0.5,
        }
    }

    #[test]
    fn from_values_should_read_stored_model() {
        // arrange
        let expected = property();
        let mut values = expected.values();

        values[4] = Value::Int(120);

        // act
        let model = RealEstateAssetAccount::from_values(values).unwrap();

        // assert
        assert_eq!(model, expected)
    }

    #[test]
    fn from_values_should_name_invalid_column() {
        // arrange
        let mut values = property().values();

        values[7] = Value::Text("SHARED".into());

        // act
        let error = RealEstateAssetAccount::from_values(values).unwrap_err();

        // assert
        assert!(matches!(error, ModelError::Column { column: "ownership", .. }))
    }

    #[test]
    fn from_values_should_reject_missing_values() {
        // arrange
        let values = vec![Value::Uuid(uuid::Uuid::new_v4())];

        // act
        let error = Type::from_values(values).unwrap_err();

        // assert
        assert_eq!(
            error,
            ModelError::Arity {
                expected: 7,
                actual: 1
            }
        )
    }

    #[test]
    fn key_values_should_return_primary_key() {
        // arrange
        let model = property();

        // act
        let key = model.key_values();

        // assert
        assert_eq!(key, vec![Value::Uuid(model.asset_account_id)])
    }
}
