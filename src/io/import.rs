use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::domain::{
    Cents, DATE_FORMAT, Transaction, TransactionId, TransactionType, cents_from_units, parse_cents,
};

use super::{AmountField, TransactionRecord};

/// Result of an import operation
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub transactions: Vec<Transaction>,
    pub errors: Vec<ImportError>,
}

impl ImportResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Error that occurred during import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Read transactions from a file, picking the format from the extension
/// (`.json`, anything else is CSV).
pub fn import_file(path: &Path) -> Result<ImportResult> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let reader = BufReader::new(file);

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        import_json(reader)
    } else {
        import_csv(reader)
    }
}

/// Read transactions from CSV with a header row.
pub fn import_csv<R: Read>(reader: R) -> Result<ImportResult> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (index, result) in csv_reader.deserialize::<TransactionRecord>().enumerate() {
        let line = index + 2; // header + 1-based
        match result {
            Ok(record) => rows.push((line, record)),
            Err(e) => errors.push(ImportError {
                line,
                field: None,
                error: format!("CSV parse error: {}", e),
            }),
        }
    }

    Ok(finish(rows, errors))
}

/// Read transactions from JSON: either an export snapshot
/// (`{"transactions": [...]}`) or a bare array of records.
pub fn import_json<R: Read>(reader: R) -> Result<ImportResult> {
    let value: Value = serde_json::from_reader(reader).context("Invalid JSON")?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("transactions") {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!("JSON object has no 'transactions' array"),
        },
        _ => anyhow::bail!("Expected a JSON array or snapshot object"),
    };

    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        let line = index + 1;
        match serde_json::from_value::<TransactionRecord>(item) {
            Ok(record) => rows.push((line, record)),
            Err(e) => errors.push(ImportError {
                line,
                field: None,
                error: format!("JSON parse error: {}", e),
            }),
        }
    }

    Ok(finish(rows, errors))
}

/// Convert parsed records, then give id-less records ids after the largest
/// one in the file.
fn finish(rows: Vec<(usize, TransactionRecord)>, mut errors: Vec<ImportError>) -> ImportResult {
    let mut converted = Vec::with_capacity(rows.len());
    let mut seen_ids = HashSet::new();

    for (line, record) in rows {
        match convert(&record) {
            Ok(mut tx) => {
                if let Some(id) = record.id {
                    if id.checked_add(1).is_none() {
                        errors.push(id_error(line, format!("Id {} is out of range", id)));
                        continue;
                    }
                    if !seen_ids.insert(id) {
                        errors.push(id_error(line, format!("Duplicate id {}", id)));
                        continue;
                    }
                    tx.id = id;
                }
                converted.push((line, record.id.is_some(), tx));
            }
            Err(error) => errors.push(ImportError { line, ..error }),
        }
    }

    // Same rule as the ledger's seed: an id must leave room for a next one.
    // Every kept id is below TransactionId::MAX, so the `+ 1`s can't overflow.
    let assignable = |id: TransactionId| (id < TransactionId::MAX).then_some(id);
    let mut next_id = assignable(seen_ids.iter().copied().fold(0, TransactionId::max) + 1);
    let mut transactions = Vec::with_capacity(converted.len());

    for (line, has_id, mut tx) in converted {
        if !has_id {
            match next_id {
                Some(id) => {
                    tx.id = id;
                    next_id = assignable(id + 1);
                }
                None => {
                    errors.push(id_error(line, "No id left to assign".to_string()));
                    continue;
                }
            }
        }
        transactions.push(tx);
    }

    ImportResult {
        transactions,
        errors,
    }
}

fn id_error(line: usize, error: String) -> ImportError {
    ImportError {
        line,
        field: Some("id".to_string()),
        error,
    }
}

fn convert(record: &TransactionRecord) -> Result<Transaction, ImportError> {
    let field_error = |field: &str, error: String| ImportError {
        line: 0,
        field: Some(field.to_string()),
        error,
    };

    let date = parse_record_date(&record.date)
        .ok_or_else(|| field_error("date", format!("Invalid date: {}", record.date)))?;

    let amount = match &record.amount {
        AmountField::Units(units) => cents_from_units(*units),
        AmountField::Text(text) => parse_cents(text),
    }
    .map_err(|e| field_error("amount", format!("Invalid amount: {}", e)))?;

    let amount = match record.kind.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(kind) => migrate_legacy_sign(amount, kind)
            .ok_or_else(|| field_error("type", format!("Unknown type: {}", kind)))?,
        None => amount,
    };

    if record.description.trim().is_empty() {
        return Err(field_error("description", "Description is required".to_string()));
    }

    Ok(Transaction {
        id: 0,
        date,
        description: record.description.trim().to_string(),
        category: record.category.trim().to_string(),
        amount,
        account: record
            .account
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string),
    })
}

/// Records carrying an explicit type keep the sign it implies, whatever
/// sign the amount was written with.
fn migrate_legacy_sign(amount: Cents, kind: &str) -> Option<Cents> {
    kind.parse::<TransactionType>().ok().map(|kind| kind.signed(amount))
}

fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}
