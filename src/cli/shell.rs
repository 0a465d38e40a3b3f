use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use super::{BudgetStatusArgs, ExportArgs, FilterArgs, FormArgs, OutputFormat, Session, output};
use crate::application::AppError;
use crate::domain::BudgetForm;
use crate::io::import_file;

#[derive(Parser)]
#[command(name = "finboard", no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: ShellCommand,
}

/// Commands available inside `finboard shell`.
#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    /// Record a transaction (date defaults to today)
    Add(FormArgs),

    /// Change fields of a transaction; omitted fields keep their value
    Edit {
        id: String,
        #[command(flatten)]
        fields: FormArgs,
    },

    /// Delete a transaction
    Delete { id: String },

    /// Show one transaction
    Show { id: String },

    /// List transactions, newest first
    List(FilterArgs),

    /// List the categories in use
    Categories,

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

    /// Set, remove or check category budgets
    #[command(subcommand)]
    Budget(BudgetCommand),

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

    /// Replace the session's transactions with the contents of a file
    Import { path: PathBuf },

    /// Ask the finance assistant a question
    Chat {
        #[arg(required = true, trailing_var_arg = true)]
        message: Vec<String>,
    },

    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug)]
pub enum BudgetCommand {
    /// Set the spending limit of a category, replacing any existing one
    Set {
        category: String,
        /// Amount per period, e.g. "500"
        limit: String,
        /// weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: String,
    },

    /// Remove the budget of a category
    Remove { category: String },

    /// Spending against every budget
    Status(BudgetStatusArgs),
}

enum Flow {
    Continue,
    Quit,
}

/// Read commands from `input` until it ends or `quit` is entered. Command
/// failures are reported and the session carries on.
pub async fn run_shell<R: BufRead>(session: &mut Session, input: R, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "finboard shell. Type 'help' for commands, 'quit' to leave.")?;
    let mut lines = input.lines();

    loop {
        write!(out, "finboard> ")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;

        let args = match split_args(&line) {
            Ok(args) if args.is_empty() => continue,
            Ok(args) => args,
            Err(e) => {
                writeln!(out, "Error: {}", e)?;
                continue;
            }
        };

        let command = match ShellLine::try_parse_from(args) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(out, "{}", e.render())?;
                continue;
            }
        };

        match execute(session, command, out).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => {
                log::debug!("Shell command failed: {:#}", e);
                writeln!(out, "Error: {:#}", e)?;
            }
        }
    }

    Ok(())
}

async fn execute(session: &mut Session, command: ShellCommand, out: &mut dyn Write) -> Result<Flow> {
    let symbol = session.currency_symbol.clone();

    match command {
        ShellCommand::Add(fields) => {
            let mut fields = fields;
            if fields.date.is_none() {
                fields.date = Some(chrono::Local::now().date_naive().to_string());
            }
            let tx = session.service.record_transaction(fields.into_form())?;
            writeln!(out, "Transaction added ({})", tx.id)?;
        }

        ShellCommand::Edit { id, fields } => {
            let tx = session.service.edit_transaction(id.as_str(), fields.into_form())?;
            writeln!(out, "Transaction updated ({})", tx.id)?;
        }

        ShellCommand::Delete { id } => {
            let tx = session.service.delete_transaction(id.as_str())?;
            writeln!(out, "Deleted ({}: {})", tx.id, tx.description)?;
        }

        ShellCommand::Show { id } => {
            let tx = session.service.transaction(id.as_str())?;
            output::print_transaction(out, &tx, &symbol)?;
        }

        ShellCommand::List(filter) => {
            let transactions = session.service.transactions_filtered(&filter.to_filter()?);
            output::print_transactions(out, &transactions, &symbol)?;
        }

        ShellCommand::Categories => {
            output::print_categories(out, &session.service.categories())?;
        }

        ShellCommand::Summary { format } => {
            output::print_summary(out, &session.service.summary(), &symbol, format)?;
        }

        ShellCommand::Report { format } => {
            output::print_category_report(out, &session.service.category_report(), &symbol, format)?;
        }

        ShellCommand::Budget(BudgetCommand::Set {
            category,
            limit,
            period,
        }) => {
            let form = BudgetForm {
                category,
                limit,
                period,
            };
            let replaced = session.service.set_budget(form)?;
            writeln!(out, "Budget {}", if replaced.is_some() { "updated" } else { "set" })?;
        }

        ShellCommand::Budget(BudgetCommand::Remove { category }) => {
            let budget = session.service.remove_budget(&category)?;
            writeln!(out, "Budget removed ({})", budget.category)?;
        }

        ShellCommand::Budget(BudgetCommand::Status(args)) => {
            let statuses = session.service.budget_statuses(args.as_of_date()?);
            output::print_budget_statuses(out, &statuses, &symbol, args.format)?;
        }

        ShellCommand::Insights { format } => {
            output::print_insights(out, &session.service.insights(), &symbol, format)?;
        }

        ShellCommand::Categorize { description } => {
            writeln!(out, "{}", session.suggest(&description.join(" ")))?;
        }

        ShellCommand::Export(args) => {
            let count = super::export(&session.service, &args, out)?;
            if let Some(path) = &args.output {
                writeln!(out, "Exported {} transaction(s) to {}", count, path.display())?;
            }
        }

        ShellCommand::Import { path } => {
            let result = import_file(&path)?;
            if result.transactions.is_empty() && !result.errors.is_empty() {
                return Err(AppError::Import(format!(
                    "no usable records in {} ({} error(s))",
                    path.display(),
                    result.errors.len()
                ))
                .into());
            }
            for error in &result.errors {
                writeln!(out, "  line {}: {}", error.line, error.error)?;
            }
            session.service.restore(&result.transactions);
            writeln!(
                out,
                "Imported {} transaction(s), skipped {}",
                result.transactions.len(),
                result.errors.len()
            )?;
        }

        ShellCommand::Chat { message } => {
            let reply = session
                .chat
                .send(&message.join(" "), session.user_id.as_deref())
                .await
                .map_err(AppError::from)?;
            writeln!(out, "{}", reply.reply)?;
        }

        ShellCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

/// Split a command line into words. Single and double quotes group words;
/// a backslash escapes the next character outside single quotes.
pub fn split_args(line: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"') | None, '\\') => match chars.next() {
                Some(escaped) => {
                    current.push(escaped);
                    in_word = true;
                }
                None => return Err("trailing backslash".to_string()),
            },
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_words() {
        assert_eq!(split_args("  list  --limit 3 ").unwrap(), vec!["list", "--limit", "3"]);
        assert!(split_args("   ").unwrap().is_empty());
    }

    #[test]
    fn test_split_quotes() {
        assert_eq!(
            split_args(r#"add -d "Grocery Shopping" -c 'Food & Drink'"#).unwrap(),
            vec!["add", "-d", "Grocery Shopping", "-c", "Food & Drink"]
        );
        assert_eq!(split_args(r#"edit 1 --account """#).unwrap(), vec!["edit", "1", "--account", ""]);
    }

    #[test]
    fn test_split_escapes() {
        assert_eq!(split_args(r#"say \"hi\""#).unwrap(), vec!["say", "\"hi\""]);
        assert_eq!(split_args(r"a\ b").unwrap(), vec!["a b"]);
        assert_eq!(split_args(r"'c:\dir'").unwrap(), vec![r"c:\dir"]);
    }

    #[test]
    fn test_split_errors() {
        assert!(split_args(r#"add -d "open"#).is_err());
        assert!(split_args("oops\\").is_err());
    }

    #[test]
    fn test_parse_shell_commands() {
        let line = ShellLine::try_parse_from(["edit", "3", "--amount", "-20", "--account", ""]).unwrap();
        match line.command {
            ShellCommand::Edit { id, fields } => {
                assert_eq!(id, "3");
                assert_eq!(fields.amount.as_deref(), Some("-20"));
                assert_eq!(fields.account.as_deref(), Some(""));
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            ShellLine::try_parse_from(["exit"]).unwrap().command,
            ShellCommand::Quit
        ));

        let line = ShellLine::try_parse_from(["budget", "set", "Food", "500", "-p", "weekly"]).unwrap();
        match line.command {
            ShellCommand::Budget(BudgetCommand::Set { category, limit, period }) => {
                assert_eq!(category, "Food");
                assert_eq!(limit, "500");
                assert_eq!(period, "weekly");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
