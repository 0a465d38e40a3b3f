use anyhow::{Context, Result};
use std::path::Path;

use crate::application::LedgerService;
use crate::chat::ChatClient;
use crate::config::Config;
use crate::domain::{FALLBACK_CATEGORY, Ledger, Transaction, demo_transactions};
use crate::io::import_file;

/// Everything a front end needs for one session: the ledger service and the
/// assistant client, built once by the entry point and handed down.
pub struct Session {
    pub service: LedgerService,
    pub chat: ChatClient,
    pub currency_symbol: String,
    pub user_id: Option<String>,
}

impl Session {
    pub fn new(service: LedgerService, chat: ChatClient, config: &Config) -> Self {
        Self {
            service,
            chat,
            currency_symbol: config.ledger.currency_symbol.clone(),
            user_id: config.api.user_id.clone(),
        }
    }

    /// Build a session from configuration. `seed` (or the configured seed
    /// file) replaces the demo dataset.
    pub fn open(config: &Config, seed: Option<&Path>) -> Result<Self> {
        let mut service = LedgerService::new(Ledger::new())
            .with_category_rules(&config.ledger.category_rules)
            .context("Invalid ledger.category_rules")?;

        match seed.or(config.ledger.seed_file.as_deref()) {
            Some(path) => service.restore(&load_seed(path)?),
            None => service.restore(&demo_transactions()),
        }
        for budget in &config.ledger.budgets {
            service
                .set_budget(budget.to_form())
                .with_context(|| format!("Invalid budget for '{}'", budget.category))?;
        }
        log::info!("Session started with {} transaction(s)", service.len());

        let chat = ChatClient::from_config(&config.api).context("Cannot create assistant client")?;
        Ok(Self::new(service, chat, config))
    }

    /// The rules' category for `description`, or the fallback.
    pub fn suggest(&self, description: &str) -> String {
        self.service
            .suggest_category(description)
            .unwrap_or_else(|| FALLBACK_CATEGORY.to_string())
    }
}

fn load_seed(path: &Path) -> Result<Vec<Transaction>> {
    let result = import_file(path)?;
    for error in &result.errors {
        log::warn!(
            "{}: skipped record at line {}{}: {}",
            path.display(),
            error.line,
            error
                .field
                .as_deref()
                .map(|f| format!(" ({})", f))
                .unwrap_or_default(),
            error.error
        );
    }
    Ok(result.transactions)
}
