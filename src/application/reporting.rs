use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Budget, Cents, Transaction};

/// Dashboard headline numbers. Expense is a positive magnitude.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Cents,
    pub total_expense: Cents,
    pub net: Cents,
    pub count: usize,
}

impl Summary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (total_income, total_expense) =
            transactions.iter().fold((0 as Cents, 0 as Cents), |(income, expense), tx| {
                if tx.is_income() {
                    (income.saturating_add(tx.amount), expense)
                } else {
                    (income, expense.saturating_sub(tx.amount))
                }
            });

        Self {
            total_income,
            total_expense,
            net: total_income.saturating_sub(total_expense),
            count: transactions.len(),
        }
    }

    /// Share of income left after expenses, in percent. `None` without income.
    pub fn savings_rate(&self) -> Option<f64> {
        (self.total_income > 0).then(|| self.net as f64 / self.total_income as f64 * 100.0)
    }
}

/// Spending broken down by category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    pub average: Cents,
    pub percentage: f64,
}

impl CategoryReport {
    /// Aggregate expenses per category, largest first. Ties sort by name.
    pub fn expenses(transactions: &[Transaction]) -> Self {
        let mut totals: HashMap<&str, (Cents, usize)> = HashMap::new();
        for tx in transactions.iter().filter(|tx| tx.is_expense()) {
            let entry = totals.entry(tx.category.as_str()).or_insert((0, 0));
            entry.0 = entry.0.saturating_sub(tx.amount);
            entry.1 += 1;
        }

        let total = totals.values().fold(0, |acc: Cents, (sum, _)| acc.saturating_add(*sum));

        let mut categories: Vec<CategorySummary> = totals
            .into_iter()
            .map(|(category, (sum, count))| CategorySummary {
                category: category.to_string(),
                total: sum,
                count,
                average: sum / count as Cents,
                percentage: if total > 0 {
                    sum as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        categories.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

        Self { categories, total }
    }
}

/// Spending against one budget over the period containing `as_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub budget: Budget,
    /// Expenses in the budget's category over the period, as a positive magnitude
    pub spent: Cents,
    /// Negative once the budget is exceeded
    pub remaining: Cents,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl BudgetStatus {
    pub fn compute(budget: &Budget, transactions: &[Transaction], as_of: NaiveDate) -> Self {
        let (period_start, period_end) = budget.current_period(as_of);
        let spent = transactions
            .iter()
            .filter(|tx| tx.is_expense() && tx.category == budget.category)
            .filter(|tx| tx.date >= period_start && tx.date <= period_end)
            .fold(0, |acc: Cents, tx| acc.saturating_sub(tx.amount));

        Self {
            budget: budget.clone(),
            spent,
            remaining: budget.limit.saturating_sub(spent),
            period_start,
            period_end,
        }
    }

    /// Share of the limit already spent, in percent.
    pub fn percent_used(&self) -> f64 {
        if self.budget.limit > 0 {
            self.spent as f64 / self.budget.limit as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn is_over(&self) -> bool {
        self.remaining < 0
    }
}
