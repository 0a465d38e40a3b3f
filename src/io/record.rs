use serde::{Deserialize, Serialize};

use crate::domain::{Transaction, TransactionId, format_cents};

/// CSV column order for exported transactions.
pub const CSV_HEADER: [&str; 7] = [
    "id",
    "date",
    "type",
    "description",
    "category",
    "amount",
    "account",
];

/// One transaction as it appears in an export or seed file.
///
/// Amounts are decimal currency units, either a number or a string. Older
/// files store a positive amount and put the direction in `type`; when
/// `type` is present it decides the sign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: Option<TransactionId>,
    pub date: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub amount: AmountField,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AmountField {
    Units(f64),
    Text(String),
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: Some(tx.id),
            date: tx.date.to_string(),
            kind: Some(tx.kind().as_str().to_string()),
            description: tx.description.clone(),
            category: tx.category.clone(),
            amount: AmountField::Text(format_cents(tx.amount)),
            account: tx.account.clone(),
        }
    }
}
