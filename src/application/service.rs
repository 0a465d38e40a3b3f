use chrono::NaiveDate;

use crate::domain::{
    Budget, BudgetForm, Categorizer, CategoryRule, IdLike, Ledger, Transaction, TransactionFilter,
    TransactionForm, category_options, demo_transactions, format_cents,
};

use super::{AppError, BudgetStatus, CategoryReport, Insights, Summary};

/// Application service providing the session's transaction use cases.
/// This is the interface front ends talk to; it owns the ledger it was
/// given, and nothing else holds a reference to it.
pub struct LedgerService {
    ledger: Ledger,
    categorizer: Categorizer,
    /// At most one per category, sorted by category
    budgets: Vec<Budget>,
}

impl LedgerService {
    /// Create a service around an already seeded ledger.
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            categorizer: Categorizer::default(),
            budgets: Vec::new(),
        }
    }

    /// Use `categorizer` instead of the built-in rules.
    pub fn with_categorizer(mut self, categorizer: Categorizer) -> Self {
        self.categorizer = categorizer;
        self
    }

    /// Check `rules` before the built-in ones.
    pub fn with_category_rules(self, rules: &[CategoryRule]) -> Result<Self, AppError> {
        let categorizer = Categorizer::with_rules(rules)?;
        log::debug!("Using {} custom category rule(s)", rules.len());
        Ok(self.with_categorizer(categorizer))
    }

    /// Create a service seeded with the demo dataset.
    pub fn with_demo_data() -> Self {
        Self::new(Ledger::seeded(&demo_transactions()))
    }

    /// Replace the session's records, e.g. after an import. Records
    /// without a category are categorized on the way in.
    pub fn restore(&mut self, records: &[Transaction]) {
        let mut records = records.to_vec();
        let filled = self.categorizer.fill_blank(&mut records);
        if filled > 0 {
            log::info!("Categorized {} uncategorized record(s)", filled);
        }
        self.ledger.seed(&records);
        log::info!("Ledger restored with {} transaction(s)", self.ledger.len());
    }

    // ========================
    // Queries
    // ========================

    /// All transactions, newest first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.ledger.list()
    }

    /// Transactions narrowed by `filter`, newest first.
    pub fn transactions_filtered(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        filter.apply(&self.ledger.list())
    }

    /// Categories to offer in a filter picker.
    pub fn categories(&self) -> Vec<String> {
        category_options(&self.ledger.list())
    }

    /// Get a transaction by id.
    pub fn transaction(&self, id: impl IdLike + ToString) -> Result<Transaction, AppError> {
        self.ledger
            .find(&id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))
    }

    pub fn summary(&self) -> Summary {
        Summary::from_transactions(&self.ledger.list())
    }

    pub fn category_report(&self) -> CategoryReport {
        CategoryReport::expenses(&self.ledger.list())
    }

    /// Merchants, recurring charges and unusual expenses.
    pub fn insights(&self) -> Insights {
        Insights::from_transactions(&self.ledger.list())
    }

    /// The category the rules would give `description`, if any.
    pub fn suggest_category(&self, description: &str) -> Option<String> {
        self.categorizer.categorize(description).map(str::to_string)
    }

    pub fn budgets(&self) -> &[Budget] {
        &self.budgets
    }

    /// Spending against every budget over the period containing `as_of`.
    pub fn budget_statuses(&self, as_of: NaiveDate) -> Vec<BudgetStatus> {
        let transactions = self.ledger.list();
        self.budgets
            .iter()
            .map(|budget| BudgetStatus::compute(budget, &transactions, as_of))
            .collect()
    }

    pub fn budget_status(&self, category: &str, as_of: NaiveDate) -> Result<BudgetStatus, AppError> {
        let budget = self
            .budgets
            .iter()
            .find(|b| b.category == category.trim())
            .ok_or_else(|| AppError::BudgetNotFound(category.trim().to_string()))?;
        Ok(BudgetStatus::compute(budget, &self.ledger.list(), as_of))
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    // ========================
    // Mutations
    // ========================

    /// Validate a submitted form and record it. A blank category is filled
    /// in by the categorization rules.
    pub fn record_transaction(&mut self, mut form: TransactionForm) -> Result<Transaction, AppError> {
        if form.category.trim().is_empty() && !form.description.trim().is_empty() {
            form.category = self.categorizer.categorize_or_fallback(&form.description);
        }
        let candidate = form.into_new()?;
        if self.ledger.ids_exhausted() {
            return Err(AppError::IdsExhausted);
        }
        let tx = self.ledger.add(candidate);
        log::info!("Recorded transaction {} ({})", tx.id, tx.description);
        Ok(tx)
    }

    /// Validate an edit form and apply the filled-in fields.
    pub fn edit_transaction(
        &mut self,
        id: impl IdLike + ToString,
        form: TransactionForm,
    ) -> Result<Transaction, AppError> {
        let patch = form.into_patch()?;
        if patch.is_empty() {
            return Err(AppError::EmptyUpdate(id.to_string()));
        }

        let tx = self
            .ledger
            .update(&id, patch)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))?;
        log::info!("Updated transaction {}", tx.id);
        Ok(tx)
    }

    /// Delete a transaction, returning what was deleted.
    pub fn delete_transaction(&mut self, id: impl IdLike + ToString) -> Result<Transaction, AppError> {
        let tx = self
            .ledger
            .take(&id)
            .ok_or_else(|| AppError::TransactionNotFound(id.to_string()))?;
        log::info!("Deleted transaction {}", tx.id);
        Ok(tx)
    }

    /// Validate a budget form and store it, replacing any budget for the
    /// same category. Returns the replaced budget.
    pub fn set_budget(&mut self, form: BudgetForm) -> Result<Option<Budget>, AppError> {
        let budget = form.into_budget()?;
        log::info!(
            "Budget for {} set to {} ({})",
            budget.category,
            format_cents(budget.limit),
            budget.period
        );

        match self.budgets.iter_mut().find(|b| b.category == budget.category) {
            Some(existing) => Ok(Some(std::mem::replace(existing, budget))),
            None => {
                self.budgets.push(budget);
                self.budgets.sort_by(|a, b| a.category.cmp(&b.category));
                Ok(None)
            }
        }
    }

    pub fn remove_budget(&mut self, category: &str) -> Result<Budget, AppError> {
        let index = self
            .budgets
            .iter()
            .position(|b| b.category == category.trim())
            .ok_or_else(|| AppError::BudgetNotFound(category.trim().to_string()))?;
        let budget = self.budgets.remove(index);
        log::info!("Removed budget for {}", budget.category);
        Ok(budget)
    }
}
