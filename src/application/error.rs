use thiserror::Error;

use crate::chat::ChatError;
use crate::domain::{RuleError, ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Nothing to update for transaction {0}")]
    EmptyUpdate(String),

    #[error("No transaction ids left in this session")]
    IdsExhausted,

    #[error("Budget not found: {0}")]
    BudgetNotFound(String),

    #[error(transparent)]
    Rules(#[from] RuleError),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Assistant request failed: {0}")]
    Chat(#[from] ChatError),
}
