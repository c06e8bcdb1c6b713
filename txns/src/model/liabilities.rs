use crate::validate::{day_of_month, positive, Validate, ValidationError};
use uuid::Uuid;

model! {
    /// Represents the liability side of an [account](super::Account).
    pub struct LiabilityAccount in "liability_accounts" key (id) {
        id: Uuid => Uuid,
        account_id: Uuid => Uuid,
        type_id: Uuid => Uuid,
        months_per_period: Option<i16> => Int,
        initial_value: f64 => Float,
        present_value: f64 => Float,
        monthly_interest_rate: Option<f64> => Float,
        yearly_interest_rate: Option<f64> => Float,

        /// Gets or sets the amount paid every period.
        payment: f64 => Float,
        total_paid: f64 => Float,
        overall_periods: i16 => Int,
        periods_paid: i16 => Int,

        /// Gets or sets the day of the month the period closes.
        closing_day: i16 => Int,
    }
}

impl Validate for LiabilityAccount {
    fn validate(&self) -> Result<(), ValidationError> {
        positive("months_per_period", self.months_per_period.map(Into::into))?;
        positive("initial_value", Some(self.initial_value))?;
        positive("present_value", Some(self.present_value))?;
        positive("monthly_interest_rate", self.monthly_interest_rate)?;
        positive("yearly_interest_rate", self.yearly_interest_rate)?;
        positive("payment", Some(self.payment))?;
        positive("overall_periods", Some(self.overall_periods.into()))?;
        day_of_month("closing_day", self.closing_day)
    }
}

model! {
    /// Represents a loan granted by a bank.
    pub struct BankCreditLiabilityAccount in "bank_credit_liability_accounts" key (liability_account_id) {
        liability_account_id: Uuid => Uuid,
        insurance_payment: f64 => Float,
        extras_payment: f64 => Float,
    }
}

impl Validate for BankCreditLiabilityAccount {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

model! {
    /// Represents a credit card.
    pub struct CreditCardLiabilityAccount in "credit_card_liability_accounts" key (liability_account_id) {
        liability_account_id: Uuid => Uuid,
        credit_limit: f64 => Float,
    }
}

impl Validate for CreditCardLiabilityAccount {
    fn validate(&self) -> Result<(), ValidationError> {
        positive("credit_limit", Some(self.credit_limit))
    }
}
