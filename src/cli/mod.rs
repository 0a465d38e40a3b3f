mod output;
mod session;
mod shell;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::application::{AppError, LedgerService};
use crate::config::Config;
use crate::domain::{TransactionFilter, TransactionForm, parse_date};
use crate::io::Exporter;

pub use output::OutputFormat;
pub use session::Session;
pub use shell::{BudgetCommand, ShellCommand, run_shell, split_args};

/// finboard - personal finance dashboard ledger
#[derive(Parser)]
#[command(name = "finboard")]
#[command(about = "Session ledger, filters and assistant client for a personal-finance dashboard")]
#[command(version)]
pub struct Cli {
    /// Configuration file (YAML). Defaults apply when it doesn't exist.
    #[arg(long, default_value = "finboard.yaml")]
    pub config: PathBuf,

    /// CSV or JSON file to seed the session from instead of the demo data
    #[arg(long, global = true)]
    pub seed: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List transactions, newest first
    List(FilterArgs),

    /// List the categories in use
    Categories,

    /// Show one transaction
    Show {
        /// Transaction id
        id: String,
    },

    /// Income, expenses and net
    Summary {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Spending broken down by category
    Report {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Spending against the configured budgets
    Budgets(BudgetStatusArgs),

    /// Top merchants, recurring charges and unusual expenses
    Insights {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Suggest a category for a description
    Categorize {
        #[arg(required = true, trailing_var_arg = true)]
        description: Vec<String>,
    },

    /// Export transactions
    Export(ExportArgs),

    /// Ask the finance assistant a question
    Chat {
        /// Message to send
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,

        /// User identifier sent with the message (overrides the config)
        #[arg(long)]
        user_id: Option<String>,
    },

    /// Check that the assistant API is reachable
    Health,

    /// Interactive session: add, edit and delete transactions
    Shell,
}

/// Listing filters, shared by the CLI and the shell.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Text to look for in the description or account
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Earliest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Maximum number of transactions to show
    #[arg(short, long)]
    pub limit: Option<usize>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> Result<TransactionFilter> {
        let from = self
            .from
            .as_deref()
            .map(parse_date)
            .transpose()
            .context("Invalid --from date")?;
        let to = self
            .to
            .as_deref()
            .map(parse_date)
            .transpose()
            .context("Invalid --to date")?;

        Ok(TransactionFilter {
            search: self.search.clone(),
            category: self.category.clone(),
            from,
            to,
            limit: self.limit,
        })
    }
}

/// Transaction fields as command-line options.
#[derive(Args, Debug, Default, Clone)]
pub struct FormArgs {
    /// Date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Merchant or purpose
    #[arg(short, long)]
    pub description: Option<String>,

    /// Category (e.g. "Food", "Utilities")
    #[arg(short, long)]
    pub category: Option<String>,

    /// Amount, e.g. "85.50"; signed unless --type is given
    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// Account label; an empty string clears it on edit
    #[arg(long)]
    pub account: Option<String>,

    /// income or expense
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,
}

impl FormArgs {
    pub fn into_form(self) -> TransactionForm {
        TransactionForm {
            date: self.date.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            amount: self.amount.unwrap_or_default(),
            account: self.account,
            kind: self.kind.unwrap_or_default(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct BudgetStatusArgs {
    /// Day whose period is reported (YYYY-MM-DD, default today)
    #[arg(long)]
    pub as_of: Option<String>,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl BudgetStatusArgs {
    pub fn as_of_date(&self) -> Result<NaiveDate> {
        match self.as_of.as_deref() {
            Some(value) => parse_date(value).context("Invalid --as-of date"),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Log level for this run: `--verbose` wins over the config.
    pub fn log_level(&self, config: &Config) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            config.logging.level.clone()
        }
    }

    pub async fn run(self, config: Config) -> Result<()> {
        let mut session = Session::open(&config, self.seed.as_deref())?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let symbol = session.currency_symbol.clone();

        match self.command {
            Commands::List(filter) => {
                let transactions = session.service.transactions_filtered(&filter.to_filter()?);
                output::print_transactions(&mut out, &transactions, &symbol)?;
            }

            Commands::Categories => {
                output::print_categories(&mut out, &session.service.categories())?;
            }

            Commands::Show { id } => {
                let tx = session.service.transaction(id.as_str())?;
                output::print_transaction(&mut out, &tx, &symbol)?;
            }

            Commands::Summary { format } => {
                output::print_summary(&mut out, &session.service.summary(), &symbol, format)?;
            }

            Commands::Report { format } => {
                output::print_category_report(
                    &mut out,
                    &session.service.category_report(),
                    &symbol,
                    format,
                )?;
            }

            Commands::Budgets(args) => {
                let statuses = session.service.budget_statuses(args.as_of_date()?);
                output::print_budget_statuses(&mut out, &statuses, &symbol, args.format)?;
            }

            Commands::Insights { format } => {
                output::print_insights(&mut out, &session.service.insights(), &symbol, format)?;
            }

            Commands::Categorize { description } => {
                writeln!(out, "{}", session.suggest(&description.join(" ")))?;
            }

            Commands::Export(args) => {
                let count = export(&session.service, &args, &mut out)?;
                if let Some(path) = &args.output {
                    eprintln!("Exported {} transaction(s) to {}", count, path.display());
                }
            }

            Commands::Chat { message, user_id } => {
                let user_id = user_id.or_else(|| session.user_id.clone());
                let reply = session
                    .chat
                    .send(&message.join(" "), user_id.as_deref())
                    .await
                    .map_err(AppError::from)?;
                writeln!(out, "{}", reply.reply)?;
            }

            Commands::Health => {
                let health = session.chat.health().await.map_err(AppError::from)?;
                writeln!(out, "{} is up: {}", session.chat.base_url(), health)?;
            }

            Commands::Shell => {
                let stdin = io::stdin();
                run_shell(&mut session, stdin.lock(), &mut out).await?;
            }
        }

        Ok(())
    }
}

/// Write the session's transactions to `args.output`, or to `out`.
pub(crate) fn export(service: &LedgerService, args: &ExportArgs, out: &mut dyn Write) -> Result<usize> {
    match &args.output {
        Some(path) => {
            let file = create_output(path)?;
            export_to(service, args.format, BufWriter::new(file))
        }
        None => export_to(service, args.format, out),
    }
}

fn export_to<W: Write>(service: &LedgerService, format: ExportFormat, writer: W) -> Result<usize> {
    let exporter = Exporter::new(service);
    match format {
        ExportFormat::Csv => exporter.export_csv(writer),
        ExportFormat::Json => Ok(exporter.export_json(writer)?.transactions.len()),
    }
}

fn create_output(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Cannot create {}", path.display()))
}
