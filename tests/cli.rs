use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn moneta(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("moneta").unwrap();
    cmd.env("MONETA_DATA_DIR", dir.path())
        .env_remove("MONETA_USER")
        .env_remove("RUST_LOG");
    cmd
}

fn with_user(dir: &TempDir) {
    moneta(dir).args(["user", "create", "alice"]).assert().success();
}

#[test]
fn test_init_creates_data_files() {
    let dir = TempDir::new().unwrap();

    moneta(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(dir.path().join("config.json").exists());
}

#[test]
fn test_first_user_becomes_default() {
    let dir = TempDir::new().unwrap();

    moneta(&dir)
        .args(["user", "create", "alice", "--currency", "EUR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created user: alice"))
        .stdout(predicate::str::contains("Now the default user"));

    moneta(&dir)
        .args(["user", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice *"));
}

#[test]
fn test_commands_need_a_user() {
    let dir = TempDir::new().unwrap();

    moneta(&dir)
        .args(["category", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No user selected"));
}

#[test]
fn test_unknown_user_is_reported() {
    let dir = TempDir::new().unwrap();
    with_user(&dir);

    moneta(&dir)
        .args(["--user", "bob", "category", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found: bob"));
}

#[test]
fn test_record_and_list_transactions() {
    let dir = TempDir::new().unwrap();
    with_user(&dir);

    moneta(&dir)
        .args(["category", "create", "Salary", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created category: "));
    moneta(&dir)
        .args(["category", "create", "Food", "--type", "expense"])
        .assert()
        .success();

    moneta(&dir)
        .args(["transaction", "add", "2500", "--category", "Salary", "--date", "2026-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded income: "));
    moneta(&dir)
        .args(["txn", "add", "42.50", "-c", "Food", "-d", "2026-01-05", "-m", "Groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded expense: "));

    moneta(&dir)
        .args(["transaction", "list", "--month", "2026-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("2 transaction(s)"));
}

#[test]
fn test_type_mismatch_is_rejected() {
    let dir = TempDir::new().unwrap();
    with_user(&dir);

    moneta(&dir)
        .args(["category", "create", "Food", "--type", "expense"])
        .assert()
        .success();

    moneta(&dir)
        .args(["transaction", "add", "10", "--type", "income", "--category", "Food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match category 'Food'"));

    moneta(&dir)
        .args(["transaction", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));
}

#[test]
fn test_budget_alert_after_spending() {
    let dir = TempDir::new().unwrap();
    with_user(&dir);

    moneta(&dir)
        .args(["category", "create", "Food", "--type", "expense"])
        .assert()
        .success();
    moneta(&dir)
        .args(["budget", "create", "Food", "100", "--threshold", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alert at: 80%"));

    moneta(&dir)
        .args(["budget", "alerts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No budget alerts."));

    moneta(&dir)
        .args(["transaction", "add", "90", "--category", "Food"])
        .assert()
        .success();

    moneta(&dir)
        .args(["budget", "alerts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food"))
        .stdout(predicate::str::contains("10.00 left"));
}

#[test]
fn test_budget_requires_expense_category() {
    let dir = TempDir::new().unwrap();
    with_user(&dir);

    moneta(&dir)
        .args(["category", "create", "Salary", "--type", "income"])
        .assert()
        .success();

    moneta(&dir)
        .args(["budget", "create", "Salary", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Budget error"));
}

#[test]
fn test_demo_and_dashboard() {
    let dir = TempDir::new().unwrap();

    moneta(&dir)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created demo user 'demo'"))
        .stdout(predicate::str::contains("24 transactions"));

    moneta(&dir)
        .arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    moneta(&dir)
        .args(["dashboard", "--months", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard: demo"))
        .stdout(predicate::str::contains("Last 3 months"));
}

#[test]
fn test_export_csv_to_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("transactions.csv");

    moneta(&dir).arg("demo").assert().success();

    moneta(&dir)
        .args(["export", "csv", "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("24 transactions exported to"));

    let contents = std::fs::read_to_string(&output).unwrap();
    assert!(contents.contains("Date,Type,Category,Amount,Description"));
    assert!(contents.contains("Salary"));
}

#[test]
fn test_audit_lists_changes() {
    let dir = TempDir::new().unwrap();

    moneta(&dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries."));

    with_user(&dir);

    moneta(&dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE User"));
}

#[test]
fn test_dashboard_months_are_capped() {
    let dir = TempDir::new().unwrap();
    with_user(&dir);

    moneta(&dir)
        .args(["dashboard", "--months", "100000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 120 months"));
}
