use anyhow::Result;
use std::io::Write;

use crate::application::{BudgetStatus, CategoryReport, Insights, RecurringCharge, Summary};
use crate::domain::{Transaction, format_cents, format_currency};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

pub fn print_transactions(out: &mut dyn Write, transactions: &[Transaction], symbol: &str) -> Result<()> {
    if transactions.is_empty() {
        writeln!(out, "No transactions to show.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>5} {:<12} {:<28} {:<15} {:>14} ACCOUNT",
        "ID", "DATE", "DESCRIPTION", "CATEGORY", "AMOUNT"
    )?;
    writeln!(out, "{}", "-".repeat(88))?;

    for tx in transactions {
        writeln!(
            out,
            "{:>5} {:<12} {:<28} {:<15} {:>14} {}",
            tx.id,
            tx.date,
            truncate(&tx.description, 28),
            truncate(&tx.category, 15),
            format_currency(tx.amount, symbol),
            tx.account.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

pub fn print_transaction(out: &mut dyn Write, tx: &Transaction, symbol: &str) -> Result<()> {
    writeln!(out, "Transaction {}", tx.id)?;
    writeln!(out, "  Date:        {}", tx.date)?;
    writeln!(out, "  Description: {}", tx.description)?;
    writeln!(out, "  Category:    {}", tx.category)?;
    writeln!(out, "  Amount:      {}", format_currency(tx.amount, symbol))?;
    writeln!(out, "  Type:        {}", tx.kind())?;
    if let Some(account) = &tx.account {
        writeln!(out, "  Account:     {}", account)?;
    }
    Ok(())
}

pub fn print_categories(out: &mut dyn Write, categories: &[String]) -> Result<()> {
    if categories.is_empty() {
        writeln!(out, "No categories.")?;
    }
    for category in categories {
        writeln!(out, "{}", category)?;
    }
    Ok(())
}

pub fn print_summary(
    out: &mut dyn Write,
    summary: &Summary,
    symbol: &str,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?,
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(["total_income", "total_expense", "net", "count"])?;
            writer.write_record([
                format_cents(summary.total_income),
                format_cents(summary.total_expense),
                format_cents(summary.net),
                summary.count.to_string(),
            ])?;
            writer.flush()?;
        }
        OutputFormat::Table => {
            writeln!(out, "Income:       {:>14}", format_currency(summary.total_income, symbol))?;
            writeln!(out, "Expenses:     {:>14}", format_currency(summary.total_expense, symbol))?;
            writeln!(out, "Net:          {:>14}", format_currency(summary.net, symbol))?;
            if let Some(rate) = summary.savings_rate() {
                writeln!(out, "Savings rate: {:>13.1}%", rate)?;
            }
            writeln!(out, "Transactions: {:>14}", summary.count)?;
        }
    }
    Ok(())
}

pub fn print_category_report(
    out: &mut dyn Write,
    report: &CategoryReport,
    symbol: &str,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(report)?)?,
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record(["category", "total", "count", "average", "percentage"])?;
            for cat in &report.categories {
                writer.write_record([
                    cat.category.clone(),
                    format_cents(cat.total),
                    cat.count.to_string(),
                    format_cents(cat.average),
                    format!("{:.2}", cat.percentage),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            if report.categories.is_empty() {
                writeln!(out, "No expenses recorded.")?;
                return Ok(());
            }
            writeln!(
                out,
                "{:<20} {:>14} {:>6} {:>14} {:>8}",
                "CATEGORY", "TOTAL", "COUNT", "AVERAGE", "PERCENT"
            )?;
            writeln!(out, "{}", "-".repeat(66))?;
            for cat in &report.categories {
                writeln!(
                    out,
                    "{:<20} {:>14} {:>6} {:>14} {:>7.1}%",
                    truncate(&cat.category, 20),
                    format_currency(cat.total, symbol),
                    cat.count,
                    format_currency(cat.average, symbol),
                    cat.percentage
                )?;
            }
            writeln!(out, "{}", "-".repeat(66))?;
            writeln!(out, "{:<20} {:>14}", "TOTAL", format_currency(report.total, symbol))?;
        }
    }
    Ok(())
}

pub fn print_budget_statuses(
    out: &mut dyn Write,
    statuses: &[BudgetStatus],
    symbol: &str,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(statuses)?)?,
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(&mut *out);
            writer.write_record([
                "category",
                "period",
                "period_start",
                "period_end",
                "limit",
                "spent",
                "remaining",
            ])?;
            for status in statuses {
                writer.write_record([
                    status.budget.category.clone(),
                    status.budget.period.to_string(),
                    status.period_start.to_string(),
                    status.period_end.to_string(),
                    format_cents(status.budget.limit),
                    format_cents(status.spent),
                    format_cents(status.remaining),
                ])?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            if statuses.is_empty() {
                writeln!(out, "No budgets set.")?;
                return Ok(());
            }
            writeln!(
                out,
                "{:<20} {:<8} {:>14} {:>14} {:>14} {:>7}",
                "CATEGORY", "PERIOD", "LIMIT", "SPENT", "REMAINING", "USED"
            )?;
            writeln!(out, "{}", "-".repeat(82))?;
            for status in statuses {
                writeln!(
                    out,
                    "{:<20} {:<8} {:>14} {:>14} {:>14} {:>6.0}%{}",
                    truncate(&status.budget.category, 20),
                    status.budget.period,
                    format_currency(status.budget.limit, symbol),
                    format_currency(status.spent, symbol),
                    format_currency(status.remaining, symbol),
                    status.percent_used(),
                    if status.is_over() { "  OVER" } else { "" }
                )?;
            }
        }
    }
    Ok(())
}

pub fn print_insights(
    out: &mut dyn Write,
    insights: &Insights,
    symbol: &str,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(insights)?)?;
            return Ok(());
        }
        OutputFormat::Csv => anyhow::bail!("Insights are available as table or json"),
        OutputFormat::Table => {}
    }

    writeln!(
        out,
        "{} transaction(s), {} spent",
        insights.count,
        format_currency(insights.total_spent, symbol)
    )?;

    writeln!(out, "\nTop merchants:")?;
    if insights.top_merchants.is_empty() {
        writeln!(out, "  none")?;
    }
    for merchant in &insights.top_merchants {
        writeln!(
            out,
            "  {:<28} {:>14} {:>4}x",
            truncate(&merchant.merchant, 28),
            format_currency(merchant.total, symbol),
            merchant.count
        )?;
    }

    print_recurring(out, "Subscriptions", &insights.subscriptions, symbol)?;
    print_recurring(out, "Recurring bills", &insights.recurring_bills, symbol)?;

    writeln!(out, "\nUnusual expenses:")?;
    if insights.anomalies.is_empty() {
        writeln!(out, "  none")?;
    }
    for anomaly in &insights.anomalies {
        writeln!(
            out,
            "  {:>5} {:<12} {:<28} {:>14}  {}",
            anomaly.id,
            anomaly.date,
            truncate(&anomaly.merchant, 28),
            format_currency(anomaly.amount, symbol),
            anomaly.reason
        )?;
    }
    Ok(())
}

fn print_recurring(
    out: &mut dyn Write,
    title: &str,
    charges: &[RecurringCharge],
    symbol: &str,
) -> Result<()> {
    writeln!(out, "\n{}:", title)?;
    if charges.is_empty() {
        writeln!(out, "  none")?;
    }
    for charge in charges {
        writeln!(
            out,
            "  {:<28} ~{:>13} {:>4}x, last {}",
            truncate(&charge.merchant, 28),
            format_currency(charge.approx_amount, symbol),
            charge.occurrences,
            charge.dates.last().map(|d| d.to_string()).unwrap_or_default()
        )?;
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
