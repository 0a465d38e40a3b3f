//! Validation of raw transaction input.
//!
//! The ledger stores whatever it is given, so front ends run their input
//! through [`TransactionForm`] before calling `add` or `update`.

use chrono::NaiveDate;
use thiserror::Error;

use super::{
    Budget, Cents, NewTransaction, PeriodType, TransactionPatch, TransactionType, parse_cents,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}: This field is required")]
    Required(&'static str),

    #[error("Please enter a valid amount: {0}")]
    InvalidAmount(String),

    #[error("Please enter a valid date: {0}")]
    InvalidDate(String),

    #[error("Unknown transaction type '{0}' (expected income or expense)")]
    InvalidType(String),

    #[error("Unknown budget period '{0}' (expected weekly, monthly or yearly)")]
    InvalidPeriod(String),
}

/// Raw field values as typed into the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionForm {
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    /// `None` when the field wasn't submitted. On an edit, a submitted blank
    /// account clears it.
    pub account: Option<String>,
    /// "income" or "expense". When set, `amount` is a positive magnitude and
    /// the sign comes from here; when blank, `amount` is taken as signed.
    pub kind: String,
}

impl TransactionForm {
    /// Validate every field and build a record ready for the ledger.
    pub fn into_new(self) -> Result<NewTransaction, ValidationError> {
        let date = parse_date(required("date", &self.date)?)?;
        let description = required("description", &self.description)?.to_string();
        let category = required("category", &self.category)?.to_string();
        let amount = parse_amount(required("amount", &self.amount)?, parse_kind(&self.kind)?)?;

        Ok(NewTransaction {
            date,
            description,
            category,
            amount,
            account: self.account.as_deref().and_then(optional),
        })
    }

    /// Validate the fields that were filled in. Blank fields keep their
    /// current value.
    pub fn into_patch(self) -> Result<TransactionPatch, ValidationError> {
        let mut patch = TransactionPatch::new();

        if let Some(date) = optional(&self.date) {
            patch = patch.with_date(parse_date(&date)?);
        }
        if let Some(description) = optional(&self.description) {
            patch = patch.with_description(description);
        }
        if let Some(category) = optional(&self.category) {
            patch = patch.with_category(category);
        }
        let kind = parse_kind(&self.kind)?;
        match optional(&self.amount) {
            Some(amount) => patch = patch.with_amount(parse_amount(&amount, kind)?),
            // A type on its own flips the stored amount's sign
            None => {
                if let Some(kind) = kind {
                    patch = patch.with_kind(kind);
                }
            }
        }
        if let Some(account) = &self.account {
            patch = patch.with_account(optional(account));
        }

        Ok(patch)
    }
}

/// Raw input for creating or replacing a budget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BudgetForm {
    pub category: String,
    /// Positive amount, e.g. "500" or "249.99"
    pub limit: String,
    /// weekly, monthly or yearly; blank means monthly
    pub period: String,
}

impl BudgetForm {
    pub fn into_budget(self) -> Result<Budget, ValidationError> {
        let category = required("category", &self.category)?.to_string();
        let raw_limit = required("limit", &self.limit)?;
        let limit = parse_cents(raw_limit)
            .ok()
            .filter(|cents| *cents > 0)
            .ok_or_else(|| ValidationError::InvalidAmount(raw_limit.to_string()))?;
        let period = match optional(&self.period) {
            Some(period) => period.parse()?,
            None => PeriodType::default(),
        };

        Ok(Budget::new(category, period, limit))
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.trim().to_string()))
}

fn parse_kind(value: &str) -> Result<Option<TransactionType>, ValidationError> {
    match optional(value) {
        None => Ok(None),
        Some(kind) => kind.parse::<TransactionType>().map(Some),
    }
}

fn parse_amount(value: &str, kind: Option<TransactionType>) -> Result<Cents, ValidationError> {
    let cents = parse_cents(value).map_err(|_| ValidationError::InvalidAmount(value.to_string()))?;
    match kind {
        Some(kind) if cents > 0 => Ok(kind.signed(cents)),
        None if cents != 0 => Ok(cents),
        _ => Err(ValidationError::InvalidAmount(value.to_string())),
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed)
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
