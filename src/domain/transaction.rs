use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, ValidationError};

pub type TransactionId = i64;

/// Direction of a transaction. Never stored: it is derived from the sign of
/// the amount, so the two can't disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn of(amount: Cents) -> Self {
        if amount >= 0 {
            TransactionType::Income
        } else {
            TransactionType::Expense
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Give `magnitude` the sign this direction implies.
    pub fn signed(&self, magnitude: Cents) -> Cents {
        match self {
            TransactionType::Income => magnitude.abs(),
            TransactionType::Expense => -magnitude.abs(),
        }
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ValidationError::InvalidType(s.trim().to_string())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One financial event in the session ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Assigned by the ledger, unique within a session
    pub id: TransactionId,
    pub date: NaiveDate,
    /// Merchant or purpose label
    pub description: String,
    pub category: String,
    /// Signed amount in cents: positive is income, negative is expense
    pub amount: Cents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl Transaction {
    pub fn kind(&self) -> TransactionType {
        TransactionType::of(self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.kind() == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind() == TransactionType::Expense
    }

    pub(crate) fn from_new(id: TransactionId, candidate: NewTransaction) -> Self {
        Self {
            id,
            date: candidate.date,
            description: candidate.description,
            category: candidate.category,
            amount: candidate.amount,
            account: candidate.account,
        }
    }

    /// Merge a patch onto this record. The id is left untouched.
    pub(crate) fn apply(&mut self, patch: TransactionPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(kind) = patch.kind {
            self.amount = kind.signed(self.amount);
        }
        if let Some(account) = patch.account {
            self.account = account;
        }
    }
}

/// A transaction that hasn't been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: Cents,
    #[serde(default)]
    pub account: Option<String>,
}

impl NewTransaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        amount: Cents,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            category: category.into(),
            amount,
            account: None,
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }
}

impl From<Transaction> for NewTransaction {
    fn from(tx: Transaction) -> Self {
        Self {
            date: tx.date,
            description: tx.description,
            category: tx.category,
            amount: tx.amount,
            account: tx.account,
        }
    }
}

/// Partial update. `None` keeps the current value; there is no id field.
/// `account: Some(None)` clears the account. `kind` re-signs the amount
/// (after `amount`, if both are set).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<Cents>,
    pub kind: Option<TransactionType>,
    pub account: Option<Option<String>>,
}

impl TransactionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_amount(mut self, amount: Cents) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_account(mut self, account: Option<String>) -> Self {
        self.account = Some(account);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Anything that can name a transaction: a number, or a string holding one
/// (row actions hand ids over as text).
pub trait IdLike {
    /// The numeric id, or `None` when the value can't name any record.
    fn to_transaction_id(&self) -> Option<TransactionId>;
}

macro_rules! impl_id_like_for_int {
    ($($t:ty),*) => {
        $(
            impl IdLike for $t {
                fn to_transaction_id(&self) -> Option<TransactionId> {
                    TransactionId::try_from(*self).ok()
                }
            }
        )*
    };
}

impl_id_like_for_int!(i64, i32, u32, u64, usize);

impl IdLike for str {
    fn to_transaction_id(&self) -> Option<TransactionId> {
        let s = self.trim();
        if let Ok(id) = s.parse::<TransactionId>() {
            return Some(id);
        }
        // "6.0" names record 6, "6.5" names nothing
        let value = s.parse::<f64>().ok()?;
        if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
            Some(value as TransactionId)
        } else {
            None
        }
    }
}

impl IdLike for String {
    fn to_transaction_id(&self) -> Option<TransactionId> {
        self.as_str().to_transaction_id()
    }
}

impl<T: IdLike + ?Sized> IdLike for &T {
    fn to_transaction_id(&self) -> Option<TransactionId> {
        (**self).to_transaction_id()
    }
}
