use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::format_cents;

use super::{CSV_HEADER, TransactionRecord};

/// Full ledger export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<TransactionRecord>,
}

/// Exporter for writing the session's transactions out
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export transactions to CSV, newest first
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let transactions = self.service.transactions();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(CSV_HEADER)?;

        for tx in &transactions {
            csv_writer.write_record([
                tx.id.to_string(),
                tx.date.to_string(),
                tx.kind().as_str().to_string(),
                tx.description.clone(),
                tx.category.clone(),
                format_cents(tx.amount),
                tx.account.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(transactions.len())
    }

    /// Export transactions as a JSON snapshot
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            transactions: self
                .service
                .transactions()
                .iter()
                .map(TransactionRecord::from)
                .collect(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}
