use chrono::NaiveDate;

use super::{Cents, Transaction, TransactionId};

/// The demo dataset a fresh session starts from.
pub fn demo_transactions() -> Vec<Transaction> {
    vec![
        demo(1, (2026, 2, 5), "Grocery Shopping", "Food", -8550, "Checking"),
        demo(2, (2026, 2, 1), "Salary", "Income", 350000, "Bank"),
        demo(3, (2026, 2, 4), "Uber Ride", "Transport", -1575, "Credit Card"),
        demo(4, (2026, 2, 3), "Netflix Subscription", "Entertainment", -1499, "Credit Card"),
        demo(5, (2026, 2, 2), "Electricity Bill", "Utilities", -12000, "Bank"),
    ]
}

fn demo(
    id: TransactionId,
    (year, month, day): (i32, u32, u32),
    description: &str,
    category: &str,
    amount: Cents,
    account: &str,
) -> Transaction {
    Transaction {
        id,
        // Fixed literals above, all valid calendar dates
        date: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        description: description.to_string(),
        category: category.to_string(),
        amount,
        account: Some(account.to_string()),
    }
}
