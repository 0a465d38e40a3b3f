//! Spending insights beyond plain totals: biggest merchants, charges that
//! come back every month, and expenses far above what a category usually
//! costs.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CategoryReport, CategorySummary};
use crate::domain::{Cents, Transaction, TransactionId, format_cents, normalize_merchant};

const SUBSCRIPTION_CATEGORIES: &[&str] = &["subscriptions", "digital services", "entertainment"];
const RECURRING_BILL_CATEGORIES: &[&str] = &["utilities", "telecom"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantTotal {
    pub merchant: String,
    pub total: Cents,
    pub count: usize,
}

/// A merchant charging about the same amount at roughly monthly intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringCharge {
    pub merchant: String,
    /// Median charge
    pub approx_amount: Cents,
    pub occurrences: usize,
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub merchant: String,
    pub category: String,
    pub amount: Cents,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecurringRules {
    pub min_occurrences: usize,
    /// Allowed distance from the median charge, in percent
    pub tolerance_pct: i64,
    pub min_days_between: i64,
    pub max_days_between: i64,
}

impl Default for RecurringRules {
    fn default() -> Self {
        Self {
            min_occurrences: 2,
            tolerance_pct: 12,
            min_days_between: 20,
            max_days_between: 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyRules {
    /// How many times the category median an expense must exceed
    pub multiplier: f64,
    /// Expenses below this are never flagged
    pub min_amount: Cents,
    /// Categories need this many expenses before they have a usable median
    pub min_samples: usize,
    pub top_n: usize,
}

impl Default for AnomalyRules {
    fn default() -> Self {
        Self {
            multiplier: 2.0,
            min_amount: 15000,
            min_samples: 3,
            top_n: 5,
        }
    }
}

/// Everything the insights panel shows, computed in one pass over the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insights {
    pub count: usize,
    pub total_spent: Cents,
    pub top_categories: Vec<CategorySummary>,
    pub top_merchants: Vec<MerchantTotal>,
    pub subscriptions: Vec<RecurringCharge>,
    pub recurring_bills: Vec<RecurringCharge>,
    pub anomalies: Vec<Anomaly>,
}

impl Insights {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let report = CategoryReport::expenses(transactions);
        Self {
            count: transactions.len(),
            total_spent: report.total,
            top_categories: report.categories.into_iter().take(6).collect(),
            top_merchants: top_merchants(transactions, 6),
            subscriptions: detect_subscriptions(transactions),
            recurring_bills: detect_recurring_bills(transactions),
            anomalies: detect_anomalies(transactions, &AnomalyRules::default()),
        }
    }
}

/// Merchant name used for grouping: the normalized description.
fn merchant(tx: &Transaction) -> String {
    let name = normalize_merchant(&tx.description);
    if name.is_empty() {
        "UNKNOWN".to_string()
    } else {
        name
    }
}

fn spend(tx: &Transaction) -> Cents {
    tx.amount.saturating_neg()
}

fn in_categories(tx: &Transaction, categories: &[&str]) -> bool {
    let category = tx.category.trim().to_lowercase().replace('_', " ");
    categories.contains(&category.as_str())
}

fn median(sorted: &[Cents]) -> Option<Cents> {
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        n if n % 2 == 1 => Some(sorted[mid]),
        _ => {
            let sum = i128::from(sorted[mid - 1]) + i128::from(sorted[mid]);
            Cents::try_from(sum / 2).ok()
        }
    }
}

/// The `n` merchants with the largest total spend, largest first.
pub fn top_merchants(transactions: &[Transaction], n: usize) -> Vec<MerchantTotal> {
    let mut totals: HashMap<String, (Cents, usize)> = HashMap::new();
    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        let entry = totals.entry(merchant(tx)).or_insert((0, 0));
        entry.0 = entry.0.saturating_add(spend(tx));
        entry.1 += 1;
    }

    let mut ranked: Vec<MerchantTotal> = totals
        .into_iter()
        .map(|(merchant, (total, count))| MerchantTotal {
            merchant,
            total,
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.merchant.cmp(&b.merchant)));
    ranked.truncate(n);
    ranked
}

pub fn detect_subscriptions(transactions: &[Transaction]) -> Vec<RecurringCharge> {
    detect_recurring(transactions, SUBSCRIPTION_CATEGORIES, &RecurringRules::default())
}

pub fn detect_recurring_bills(transactions: &[Transaction]) -> Vec<RecurringCharge> {
    detect_recurring(transactions, RECURRING_BILL_CATEGORIES, &RecurringRules::default())
}

/// Expenses in `categories` (case-insensitive) that repeat per merchant at a
/// similar amount, with at least one gap of about a month between charges.
/// Largest charges first.
pub fn detect_recurring(
    transactions: &[Transaction],
    categories: &[&str],
    rules: &RecurringRules,
) -> Vec<RecurringCharge> {
    let mut by_merchant: HashMap<String, Vec<(NaiveDate, Cents)>> = HashMap::new();
    for tx in transactions
        .iter()
        .filter(|tx| tx.is_expense() && in_categories(tx, categories))
    {
        by_merchant.entry(merchant(tx)).or_default().push((tx.date, spend(tx)));
    }

    let mut hits = Vec::new();
    for (merchant, mut charges) in by_merchant {
        if charges.len() < rules.min_occurrences {
            continue;
        }
        charges.sort();

        let mut amounts: Vec<Cents> = charges.iter().map(|(_, amount)| *amount).collect();
        amounts.sort_unstable();
        let Some(base) = median(&amounts).filter(|base| *base > 0) else {
            continue;
        };

        let close: Vec<NaiveDate> = charges
            .iter()
            .filter(|(_, amount)| {
                let distance = (i128::from(*amount) - i128::from(base)).abs();
                distance * 100 <= i128::from(base) * i128::from(rules.tolerance_pct)
            })
            .map(|(date, _)| *date)
            .collect();
        if close.len() < rules.min_occurrences {
            continue;
        }

        let monthly = close.windows(2).any(|pair| {
            let gap = (pair[1] - pair[0]).num_days();
            (rules.min_days_between..=rules.max_days_between).contains(&gap)
        });
        if !monthly {
            continue;
        }

        hits.push(RecurringCharge {
            merchant,
            approx_amount: base,
            occurrences: close.len(),
            dates: close,
        });
    }

    hits.sort_by(|a, b| {
        b.approx_amount
            .cmp(&a.approx_amount)
            .then_with(|| a.merchant.cmp(&b.merchant))
    });
    hits
}

/// Expenses well above their category's median, largest first.
pub fn detect_anomalies(transactions: &[Transaction], rules: &AnomalyRules) -> Vec<Anomaly> {
    let expenses: Vec<&Transaction> = transactions.iter().filter(|tx| tx.is_expense()).collect();

    let mut by_category: HashMap<&str, Vec<Cents>> = HashMap::new();
    for tx in &expenses {
        by_category.entry(tx.category.as_str()).or_default().push(spend(tx));
    }
    let medians: HashMap<&str, Cents> = by_category
        .into_iter()
        .filter(|(_, amounts)| amounts.len() >= rules.min_samples)
        .filter_map(|(category, mut amounts)| {
            amounts.sort_unstable();
            median(&amounts).map(|m| (category, m))
        })
        .collect();

    let mut anomalies: Vec<Anomaly> = expenses
        .iter()
        .filter_map(|tx| {
            let amount = spend(tx);
            if amount < rules.min_amount {
                return None;
            }
            let typical = *medians.get(tx.category.as_str())?;
            (amount as f64 > rules.multiplier * typical as f64).then(|| Anomaly {
                id: tx.id,
                date: tx.date,
                merchant: merchant(tx),
                category: tx.category.clone(),
                amount,
                reason: format!(
                    "High spend vs your typical {} (>{:.1}x median {})",
                    tx.category,
                    rules.multiplier,
                    format_cents(typical)
                ),
            })
        })
        .collect();

    anomalies.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.id.cmp(&b.id)));
    anomalies.truncate(rules.top_n);
    anomalies
}
