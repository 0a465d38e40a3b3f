mod common;

use common::{grocery_and_salary, ids, parse_date, record};
use finboard::application::{AppError, LedgerService};
use finboard::domain::{
    BudgetForm, Categorizer, CategoryRule, Ledger, PeriodType, TransactionFilter, TransactionForm,
    TransactionId, ValidationError,
};

fn form(date: &str, description: &str, category: &str, amount: &str) -> TransactionForm {
    TransactionForm {
        date: date.into(),
        description: description.into(),
        category: category.into(),
        amount: amount.into(),
        ..TransactionForm::default()
    }
}

#[test]
fn test_record_transaction_validates_and_stores() {
    let mut service = LedgerService::with_demo_data();

    let tx = service
        .record_transaction(form("2026-03-01", "Test", "Other", "10"))
        .unwrap();

    assert_eq!(tx.id, 6);
    assert_eq!(tx.amount, 1000);
    assert_eq!(service.len(), 6);
}

#[test]
fn test_record_transaction_rejects_invalid_input() {
    let mut service = LedgerService::with_demo_data();

    let err = service
        .record_transaction(form("2026-03-01", "Test", "Other", "ten"))
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::InvalidAmount(_))));

    let err = service
        .record_transaction(form("", "Test", "Other", "10"))
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::Required("date"))));

    // Nothing stored, and the failed attempts didn't consume ids
    assert_eq!(service.len(), 5);
    let tx = service
        .record_transaction(form("2026-03-01", "Test", "Other", "10"))
        .unwrap();
    assert_eq!(tx.id, 6);
}

#[test]
fn test_expense_form_with_type() {
    let mut service = LedgerService::with_demo_data();
    let tx = service
        .record_transaction(TransactionForm {
            kind: "expense".into(),
            account: Some("Credit Card".into()),
            ..form("2026-03-02", "Cinema", "Entertainment", "24.00")
        })
        .unwrap();

    assert_eq!(tx.amount, -2400);
    assert!(tx.is_expense());
    assert_eq!(tx.account.as_deref(), Some("Credit Card"));
}

#[test]
fn test_edit_transaction() {
    let mut service = LedgerService::new(Ledger::seeded(&grocery_and_salary()));

    let tx = service
        .edit_transaction(
            "1",
            TransactionForm {
                description: "Supermarket".into(),
                ..TransactionForm::default()
            },
        )
        .unwrap();

    assert_eq!(tx.description, "Supermarket");
    assert_eq!(tx.category, "Food");
    assert_eq!(service.transaction(1).unwrap().description, "Supermarket");
}

#[test]
fn test_edit_missing_transaction() {
    let mut service = LedgerService::with_demo_data();
    let err = service
        .edit_transaction(
            42,
            TransactionForm {
                description: "X".into(),
                ..TransactionForm::default()
            },
        )
        .unwrap_err();

    assert!(matches!(err, AppError::TransactionNotFound(ref id) if id == "42"));
    assert_eq!(err.to_string(), "Transaction not found: 42");
}

#[test]
fn test_edit_with_nothing_to_change() {
    let mut service = LedgerService::with_demo_data();
    let err = service
        .edit_transaction(1, TransactionForm::default())
        .unwrap_err();
    assert!(matches!(err, AppError::EmptyUpdate(_)));
}

#[test]
fn test_delete_transaction() {
    let mut service = LedgerService::with_demo_data();

    let deleted = service.delete_transaction("5").unwrap();
    assert_eq!(deleted.description, "Electricity Bill");
    assert_eq!(service.len(), 4);

    let err = service.delete_transaction("5").unwrap_err();
    assert!(matches!(err, AppError::TransactionNotFound(_)));
}

#[test]
fn test_filtered_listing_and_categories() {
    let service = LedgerService::with_demo_data();

    let bank = service.transactions_filtered(&TransactionFilter::new().with_search("bank"));
    assert_eq!(ids(&bank), vec![5, 2]);

    assert_eq!(
        service.categories(),
        vec!["Entertainment", "Food", "Income", "Transport", "Utilities"]
    );
}

#[test]
fn test_summary_tracks_mutations() {
    let mut service = LedgerService::with_demo_data();
    let before = service.summary();

    service
        .record_transaction(form("2026-03-01", "Bonus", "Income", "500"))
        .unwrap();
    service.delete_transaction(1).unwrap();

    let after = service.summary();
    assert_eq!(after.total_income, before.total_income + 50000);
    assert_eq!(after.total_expense, before.total_expense - 8550);
    assert_eq!(after.count, 5);
}

#[test]
fn test_restore_replaces_records() {
    let mut service = LedgerService::with_demo_data();
    service.restore(&grocery_and_salary());

    assert_eq!(service.len(), 2);
    let tx = service
        .record_transaction(form("2026-03-01", "Next", "Other", "1"))
        .unwrap();
    assert_eq!(tx.id, 3);
}

#[test]
fn test_edit_type_only_flips_sign() {
    let mut service = LedgerService::with_demo_data();

    let tx = service
        .edit_transaction(
            "2",
            TransactionForm {
                kind: "expense".into(),
                ..TransactionForm::default()
            },
        )
        .unwrap();

    assert_eq!(tx.amount, -350000);
    assert!(tx.is_expense());

    let tx = service
        .edit_transaction(
            "2",
            TransactionForm {
                kind: "income".into(),
                ..TransactionForm::default()
            },
        )
        .unwrap();
    assert_eq!(tx.amount, 350000);
}

#[test]
fn test_edit_rejects_unknown_type_without_amount() {
    let mut service = LedgerService::with_demo_data();

    let err = service
        .edit_transaction(
            "1",
            TransactionForm {
                description: "Market".into(),
                kind: "bogus".into(),
                ..TransactionForm::default()
            },
        )
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ValidationError::InvalidType(ref t)) if t == "bogus"));
    assert_eq!(service.transaction(1).unwrap().description, "Grocery Shopping");
}

#[test]
fn test_blank_category_is_filled_by_rules() {
    let mut service = LedgerService::with_demo_data();

    let uber = service
        .record_transaction(form("2026-03-01", "Uber to airport", "", "-45"))
        .unwrap();
    assert_eq!(uber.category, "Transport");

    let unknown = service
        .record_transaction(form("2026-03-01", "Corner bakery", "  ", "-8"))
        .unwrap();
    assert_eq!(unknown.category, "Other");

    let explicit = service
        .record_transaction(form("2026-03-01", "Uber", "Business", "-20"))
        .unwrap();
    assert_eq!(explicit.category, "Business");
}

#[test]
fn test_custom_rules_and_restore() {
    let categorizer = Categorizer::with_rules(&[CategoryRule::new("bakery", "Food")]).unwrap();
    let mut service = LedgerService::new(Ledger::new()).with_categorizer(categorizer);

    service.restore(&[
        record(1, "2026-02-01", "Corner Bakery", "", -800, None),
        record(2, "2026-02-02", "DEWA", "", -30000, None),
        record(3, "2026-02-03", "Corner Bakery", "Treats", -500, None),
    ]);

    assert_eq!(service.transaction(1).unwrap().category, "Food");
    assert_eq!(service.transaction(2).unwrap().category, "Utilities");
    assert_eq!(service.transaction(3).unwrap().category, "Treats");
    assert_eq!(service.suggest_category("corner bakery #2").as_deref(), Some("Food"));
    assert_eq!(service.suggest_category("Mystery"), None);
}

#[test]
fn test_invalid_category_rule() {
    let err = LedgerService::with_demo_data()
        .with_category_rules(&[CategoryRule::new("([a-z]", "Broken")])
        .err()
        .unwrap();

    assert!(matches!(err, AppError::Rules(ref e) if e.pattern == "([a-z]"));
    assert!(err.to_string().starts_with("Invalid category rule '([a-z]'"));
}

#[test]
fn test_budgets_track_spending() {
    let mut service = LedgerService::with_demo_data();
    let budget = |category: &str, limit: &str| BudgetForm {
        category: category.into(),
        limit: limit.into(),
        period: String::new(),
    };

    assert_eq!(service.set_budget(budget("Food", "50")).unwrap(), None);
    service.set_budget(budget("Utilities", "200")).unwrap();

    let statuses = service.budget_statuses(parse_date("2026-02-20"));
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0].budget.category, "Food");
    assert_eq!(statuses[0].spent, 8550);
    assert!(statuses[0].is_over());
    assert_eq!(statuses[1].remaining, 8000);

    // Replacing keeps one budget per category
    let replaced = service.set_budget(budget("Food", "100")).unwrap();
    assert_eq!(replaced.map(|b| b.limit), Some(5000));
    assert_eq!(service.budgets().len(), 2);

    // Spending added later counts
    service
        .record_transaction(form("2026-02-21", "Market", "Food", "-20"))
        .unwrap();
    let food = service.budget_status("Food", parse_date("2026-02-21")).unwrap();
    assert_eq!(food.spent, 10550);
    assert_eq!(food.remaining, -550);

    // A different month starts from zero
    let march = service.budget_status("Food", parse_date("2026-03-01")).unwrap();
    assert_eq!(march.spent, 0);
    assert_eq!(march.budget.period, PeriodType::Monthly);
}

#[test]
fn test_remove_budget() {
    let mut service = LedgerService::with_demo_data();
    service
        .set_budget(BudgetForm {
            category: "Transport".into(),
            limit: "75".into(),
            period: "weekly".into(),
        })
        .unwrap();

    let removed = service.remove_budget(" Transport ").unwrap();
    assert_eq!(removed.period, PeriodType::Weekly);
    assert!(service.budgets().is_empty());

    let err = service.remove_budget("Transport").unwrap_err();
    assert_eq!(err.to_string(), "Budget not found: Transport");
    assert!(matches!(
        service.budget_status("Transport", parse_date("2026-02-01")),
        Err(AppError::BudgetNotFound(_))
    ));
}

#[test]
fn test_invalid_budget_is_rejected() {
    let mut service = LedgerService::with_demo_data();
    let err = service
        .set_budget(BudgetForm {
            category: "Food".into(),
            limit: "-5".into(),
            period: String::new(),
        })
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(ValidationError::InvalidAmount(_))));
    assert!(service.budgets().is_empty());
}

#[test]
fn test_insights_follow_the_ledger() {
    let mut service = LedgerService::with_demo_data();
    assert_eq!(service.insights().count, 5);

    service.delete_transaction(1).unwrap();
    let insights = service.insights();
    assert_eq!(insights.count, 4);
    assert_eq!(insights.total_spent, 15074);
    assert!(insights.top_merchants.iter().all(|m| m.merchant != "GROCERY SHOPPING"));
}

#[test]
fn test_adding_stops_when_ids_run_out() {
    let last = TransactionId::MAX - 1;
    let mut service = LedgerService::new(Ledger::seeded(&[record(
        last,
        "2026-02-01",
        "Salary",
        "Income",
        1000,
        None,
    )]));

    let tx = service
        .record_transaction(form("2026-02-02", "Coffee", "Food", "-3"))
        .unwrap();
    assert_eq!(tx.id, TransactionId::MAX);

    let err = service
        .record_transaction(form("2026-02-03", "Coffee", "Food", "-3"))
        .unwrap_err();
    assert!(matches!(err, AppError::IdsExhausted));
    assert_eq!(service.len(), 2);
}
