use std::collections::HashSet;

use super::{IdLike, NewTransaction, Transaction, TransactionId, TransactionPatch};

/// In-memory store of the session's transactions.
///
/// Every read hands out owned copies, so nothing a caller does to a returned
/// record can reach the stored one. Ids come from a counter that only moves
/// forward: an id is never handed out twice in a session, even once its
/// record has been removed.
#[derive(Debug, Clone)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    next_id: TransactionId,
    exhausted: bool,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// An empty ledger whose first id will be 1.
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            next_id: 1,
            exhausted: false,
        }
    }

    /// A ledger seeded with a copy of `initial`.
    pub fn seeded(initial: &[Transaction]) -> Self {
        let mut ledger = Self::new();
        ledger.seed(initial);
        ledger
    }

    /// Replace the whole state with a copy of `initial`.
    /// The next id becomes one past the largest seeded id (1 if none is positive).
    /// Records repeating an id, or whose id leaves no room for a next one,
    /// are dropped.
    pub fn seed(&mut self, initial: &[Transaction]) {
        let mut seen = HashSet::with_capacity(initial.len());
        let mut transactions = Vec::with_capacity(initial.len());

        for tx in initial {
            if tx.id.checked_add(1).is_none() {
                log::warn!("Dropping seed record with out-of-range id {}", tx.id);
            } else if seen.insert(tx.id) {
                transactions.push(tx.clone());
            } else {
                log::warn!("Dropping seed record with duplicate id {}", tx.id);
            }
        }

        let max_id = transactions.iter().map(|t| t.id).fold(0, TransactionId::max);
        self.transactions = transactions;
        // max_id < TransactionId::MAX after the filter above
        self.next_id = max_id.saturating_add(1);
        self.exhausted = false;

        log::debug!(
            "Seeded ledger with {} transaction(s), next id {}",
            self.transactions.len(),
            self.next_id
        );
    }

    /// All transactions, newest date first. Records sharing a date keep
    /// their insertion order.
    pub fn list(&self) -> Vec<Transaction> {
        let mut snapshot = self.transactions.clone();
        // sort_by is stable
        snapshot.sort_by(|a, b| b.date.cmp(&a.date));
        snapshot
    }

    /// Store a new record under a fresh id and return it.
    /// Fields are copied as given; validating them is the caller's job.
    ///
    /// The counter stops at `TransactionId::MAX`; check [`Ledger::ids_exhausted`]
    /// before adding when ids come from untrusted seed data.
    pub fn add(&mut self, candidate: NewTransaction) -> Transaction {
        let id = self.next_id;
        match id.checked_add(1) {
            Some(next) => self.next_id = next,
            None => {
                log::warn!("Transaction id space exhausted at {}", id);
                self.exhausted = true;
            }
        }

        let tx = Transaction::from_new(id, candidate);
        self.transactions.push(tx.clone());
        log::debug!("Added transaction {}", id);
        tx
    }

    /// Merge `patch` onto the record named by `id`. `None` if there is no such record.
    pub fn update(&mut self, id: impl IdLike, patch: TransactionPatch) -> Option<Transaction> {
        let index = self.position(&id)?;
        let tx = &mut self.transactions[index];
        tx.apply(patch);
        log::debug!("Updated transaction {}", tx.id);
        Some(tx.clone())
    }

    /// Delete the record named by `id`. Returns whether anything was deleted.
    pub fn remove(&mut self, id: impl IdLike) -> bool {
        self.take(id).is_some()
    }

    pub fn find(&self, id: impl IdLike) -> Option<Transaction> {
        self.position(&id).map(|index| self.transactions[index].clone())
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The id the next `add` will assign.
    pub fn next_id(&self) -> TransactionId {
        self.next_id
    }

    /// True once `TransactionId::MAX` has been handed out: another `add`
    /// could only repeat it.
    pub fn ids_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Remove the record named by `id` and hand it back.
    pub fn take(&mut self, id: impl IdLike) -> Option<Transaction> {
        let index = self.position(&id)?;
        let tx = self.transactions.remove(index);
        log::debug!("Removed transaction {}", tx.id);
        Some(tx)
    }

    fn position(&self, id: &impl IdLike) -> Option<usize> {
        let id = id.to_transaction_id()?;
        self.transactions.iter().position(|t| t.id == id)
    }
}
