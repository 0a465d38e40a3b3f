use std::time::Duration;

use finboard::application::LedgerService;
use finboard::chat::ChatClient;
use finboard::cli::{Session, run_shell};
use finboard::config::Config;

fn session() -> Session {
    let chat = ChatClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
    Session::new(LedgerService::with_demo_data(), chat, &Config::default())
}

async fn run(session: &mut Session, script: &str) -> String {
    let mut out = Vec::new();
    run_shell(session, script.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_add_edit_delete_in_one_session() {
    let mut session = session();

    let output = run(
        &mut session,
        "add --date 2026-03-01 -d \"Coffee Beans\" -c Food -a 12.40 -t expense\n\
         edit 6 --account Cash\n\
         delete 1\n",
    )
    .await;

    assert!(output.contains("Transaction added (6)"), "{}", output);
    assert!(output.contains("Transaction updated (6)"), "{}", output);
    assert!(output.contains("Deleted (1: Grocery Shopping)"), "{}", output);

    let added = session.service.transaction(6).unwrap();
    assert_eq!(added.amount, -1240);
    assert_eq!(added.account.as_deref(), Some("Cash"));
    assert_eq!(session.service.len(), 5);
}

#[tokio::test]
async fn test_errors_do_not_end_the_session() {
    let mut session = session();

    let output = run(&mut session, "delete 99\nshow abc\ncategories\n").await;

    assert!(output.contains("Error: Transaction not found: 99"), "{}", output);
    assert!(output.contains("Error: Transaction not found: abc"), "{}", output);
    assert!(output.contains("Utilities"), "{}", output);
    assert_eq!(session.service.len(), 5);
}

#[tokio::test]
async fn test_quit_stops_reading() {
    let mut session = session();

    let output = run(&mut session, "exit\ndelete 1\n").await;

    assert!(!output.contains("Deleted"), "{}", output);
    assert_eq!(session.service.len(), 5);
}

#[tokio::test]
async fn test_unknown_command_shows_usage() {
    let mut session = session();

    let output = run(&mut session, "frobnicate\nlist --search sal\n").await;

    assert!(output.contains("unrecognized subcommand"), "{}", output);
    assert!(output.contains("Salary"), "{}", output);
}

#[tokio::test]
async fn test_empty_chat_message_is_reported() {
    let mut session = session();

    let output = run(&mut session, "chat \"   \"\n").await;

    assert!(output.contains("Error: Assistant request failed"), "{}", output);
}

#[tokio::test]
async fn test_budget_commands() {
    let mut session = session();

    let output = run(
        &mut session,
        "budget set Food 50\n\
         budget set Food 100\n\
         budget set Transport 0\n\
         budget status --as-of 2026-02-20\n\
         budget remove Food\n\
         budget remove Food\n",
    )
    .await;

    assert!(output.contains("Budget set"), "{}", output);
    assert!(output.contains("Budget updated"), "{}", output);
    assert!(output.contains("Error: Invalid input: Please enter a valid amount: 0"), "{}", output);
    assert!(output.contains("$85.50"), "{}", output);
    assert!(output.contains("Budget removed (Food)"), "{}", output);
    assert!(output.contains("Error: Budget not found: Food"), "{}", output);
    assert!(session.service.budgets().is_empty());
}

#[tokio::test]
async fn test_categorize_and_insights() {
    let mut session = session();

    let output = run(&mut session, "categorize Careem ride to DXB\ncategorize something else\ninsights\n").await;

    assert!(output.contains("Transport\n"), "{}", output);
    assert!(output.contains("Other\n"), "{}", output);
    assert!(output.contains("Top merchants:"), "{}", output);
    assert!(output.contains("GROCERY SHOPPING"), "{}", output);
}

#[tokio::test]
async fn test_added_transaction_without_category_is_categorized() {
    let mut session = session();

    run(&mut session, "add --date 2026-03-01 -d \"Talabat order\" -a 42 -t expense\n").await;

    assert_eq!(session.service.transaction(6).unwrap().category, "Food Delivery");
}
