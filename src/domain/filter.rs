use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::Transaction;

/// Read-side narrowing of the ledger listing. Every criterion is optional and
/// all present criteria must hold. Empty strings count as absent, matching
/// a blank input box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of the description or the account
    pub search: Option<String>,
    /// Exact category label
    pub category: Option<String>,
    /// Inclusive lower date bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub to: Option<NaiveDate>,
    /// Keep at most this many records (the first ones in listing order)
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_from(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search().is_none()
            && self.category().is_none()
            && self.from.is_none()
            && self.to.is_none()
            && self.limit.is_none()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(needle) = self.search() {
            let needle = needle.to_lowercase();
            let in_description = tx.description.to_lowercase().contains(&needle);
            let in_account = tx
                .account
                .as_deref()
                .is_some_and(|account| account.to_lowercase().contains(&needle));
            if !in_description && !in_account {
                return false;
            }
        }

        if let Some(category) = self.category() {
            if tx.category != category {
                return false;
            }
        }

        if self.from.is_some_and(|from| tx.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| tx.date > to) {
            return false;
        }

        true
    }

    /// Filter `transactions`, keeping their order.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let matching = transactions.iter().filter(|tx| self.matches(tx)).cloned();
        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }

    fn search(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.is_empty())
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|s| !s.is_empty())
    }
}

/// Distinct non-empty categories, for populating a category picker.
pub fn category_options(transactions: &[Transaction]) -> Vec<String> {
    transactions
        .iter()
        .filter(|tx| !tx.category.is_empty())
        .map(|tx| tx.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tx(id: i64, day: &str, description: &str, category: &str, account: Option<&str>) -> Transaction {
        Transaction {
            id,
            date: date(day),
            description: description.to_string(),
            category: category.to_string(),
            amount: -100,
            account: account.map(str::to_string),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(1, "2026-02-05", "Grocery", "Food", Some("Checking")),
            tx(3, "2026-02-04", "Uber Ride", "Transport", Some("Credit Card")),
            tx(2, "2026-02-01", "Salary", "Income", Some("Bank")),
            tx(4, "2026-01-30", "Coffee", "Food", None),
        ]
    }

    fn ids(txs: &[Transaction]) -> Vec<i64> {
        txs.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = TransactionFilter::new();
        assert!(filter.is_empty());
        assert_eq!(ids(&filter.apply(&sample())), vec![1, 3, 2, 4]);
    }

    #[test]
    fn test_blank_strings_are_no_constraint() {
        let filter = TransactionFilter::new().with_search("").with_category("");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_search_matches_description_or_account() {
        let by_description = TransactionFilter::new().with_search("UBER");
        assert_eq!(ids(&by_description.apply(&sample())), vec![3]);

        let by_account = TransactionFilter::new().with_search("bank");
        assert_eq!(ids(&by_account.apply(&sample())), vec![2]);
    }

    #[test]
    fn test_search_skips_missing_account() {
        let filter = TransactionFilter::new().with_search("checking");
        assert_eq!(ids(&filter.apply(&sample())), vec![1]);
    }

    #[test]
    fn test_category_is_exact() {
        assert_eq!(ids(&TransactionFilter::new().with_category("Food").apply(&sample())), vec![1, 4]);
        assert!(TransactionFilter::new().with_category("food").apply(&sample()).is_empty());
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let filter = TransactionFilter::new()
            .with_from(date("2026-02-01"))
            .with_to(date("2026-02-04"));
        assert_eq!(ids(&filter.apply(&sample())), vec![3, 2]);
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let filter = TransactionFilter::new()
            .with_category("Food")
            .with_from(date("2026-02-01"));
        assert_eq!(ids(&filter.apply(&sample())), vec![1]);
    }

    #[test]
    fn test_limit_keeps_leading_records() {
        let filter = TransactionFilter::new().with_limit(2);
        assert_eq!(ids(&filter.apply(&sample())), vec![1, 3]);
    }

    #[test]
    fn test_category_options_distinct_non_empty() {
        let mut txs = sample();
        txs.push(tx(5, "2026-01-01", "Mystery", "", None));

        assert_eq!(category_options(&txs), vec!["Food", "Income", "Transport"]);
    }
}
