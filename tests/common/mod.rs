// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use chrono::NaiveDate;
use finboard::domain::{Cents, Ledger, NewTransaction, Transaction, TransactionId};

/// Helper to parse a date string into a NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Helper to build a stored record
pub fn record(
    id: TransactionId,
    date: &str,
    description: &str,
    category: &str,
    amount: Cents,
    account: Option<&str>,
) -> Transaction {
    Transaction {
        id,
        date: parse_date(date),
        description: description.to_string(),
        category: category.to_string(),
        amount,
        account: account.map(str::to_string),
    }
}

/// Helper to build an id-less candidate
pub fn candidate(date: &str, description: &str, category: &str, amount: Cents) -> NewTransaction {
    NewTransaction::new(parse_date(date), description, category, amount)
}

/// Test fixture: the two-record ledger used by the filter scenarios
pub fn grocery_and_salary() -> Vec<Transaction> {
    vec![
        record(1, "2026-02-05", "Grocery", "Food", -8550, Some("Checking")),
        record(2, "2026-02-01", "Salary", "Income", 350000, Some("Bank")),
    ]
}

/// Test fixture: five records, max id 5
pub fn five_records() -> Ledger {
    Ledger::seeded(&finboard::domain::demo_transactions())
}

pub fn ids(transactions: &[Transaction]) -> Vec<TransactionId> {
    transactions.iter().map(|t| t.id).collect()
}
