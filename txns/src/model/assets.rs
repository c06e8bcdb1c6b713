use super::{AreaUnit, Ownership};
use crate::validate::{fraction, not_empty, positive, Validate, ValidationError};
use uuid::Uuid;

model! {
    /// Represents the asset side of an [account](super::Account).
    pub struct AssetAccount in "asset_accounts" key (id) {
        id: Uuid => Uuid,
        account_id: Uuid => Uuid,
        type_id: Uuid => Uuid,

        /// Gets or sets the bank credit that financed the asset, if any.
        bank_credit_liability_account_id: Option<Uuid> => Uuid,
        months_per_period: i16 => Int,
        initial_value: Option<f64> => Float,
        last_value: Option<f64> => Float,
        monthly_interest_rate: Option<f64> => Float,
        yearly_interest_rate: Option<f64> => Float,
        roi: Option<f64> => Float,
        periodical_earnings: Option<f64> => Float,
    }
}

impl Validate for AssetAccount {
    fn validate(&self) -> Result<(), ValidationError> {
        positive("months_per_period", Some(self.months_per_period.into()))?;
        positive("initial_value", self.initial_value)?;
        positive("last_value", self.last_value)?;
        positive("monthly_interest_rate", self.monthly_interest_rate)?;
        positive("yearly_interest_rate", self.yearly_interest_rate)?;
        positive("roi", self.roi)?;
        positive("periodical_earnings", self.periodical_earnings)
    }
}

model! {
    /// Represents an asset held in a bank.
    pub struct BankingAssetAccount in "banking_asset_accounts" key (asset_account_id) {
        asset_account_id: Uuid => Uuid,

        /// Gets or sets the name of the banking institution.
        entity: String => Text,
        account_number: Option<String> => Text,
    }
}

impl Validate for BankingAssetAccount {
    fn validate(&self) -> Result<(), ValidationError> {
        not_empty("entity", &self.entity)
    }
}

model! {
    /// Represents a real estate property.
    pub struct RealEstateAssetAccount in "real_state_asset_accounts" key (asset_account_id) {
        asset_account_id: Uuid => Uuid,
        address: String => Text,
        city: String => Text,
        country: String => Text,
        total_area: f64 => Float,
        built_area: f64 => Float,
        area_unit: AreaUnit => Text,
        ownership: Ownership => Text,

        /// Gets or sets the owned fraction of the property.
        participation: f64 => Float,
    }
}

impl Validate for RealEstateAssetAccount {
    fn validate(&self) -> Result<(), ValidationError> {
        not_empty("address", &self.address)?;
        not_empty("city", &self.city)?;
        not_empty("country", &self.country)?;
        positive("total_area", Some(self.total_area))?;
        positive("built_area", Some(self.built_area))?;
        fraction("participation", self.participation)
    }
}

model! {
    /// Represents a traded security such as a stock or a fund.
    pub struct TradingAssetAccount in "trading_asset_accounts" key (asset_account_id) {
        asset_account_id: Uuid => Uuid,
        buy_value: f64 => Float,
        last_value: Option<f64> => Float,
        units: i16 => Int,
    }
}

impl Validate for TradingAssetAccount {
    fn validate(&self) -> Result<(), ValidationError> {
        positive("buy_value", Some(self.buy_value))?;
        positive("last_value", self.last_value)?;
        positive("units", Some(self.units.into()))
    }
}
