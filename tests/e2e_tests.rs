use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

// Copies the seeded database into a fresh directory for one test
fn data_dir(name: &str, seeded: bool) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bank-cli-e2e-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("Failed to create data dir");
    if seeded {
        for file in ["database.json", "member_count.txt"] {
            fs::copy(Path::new("tests/data").join(file), dir.join(file))
                .unwrap_or_else(|e| panic!("Failed to copy {file}: {e}"));
        }
    }
    dir
}

fn bank_cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bank-cli").expect("Binary not found");
    cmd.arg("--data-dir").arg(dir);
    cmd
}

#[test]
fn test_end_to_end_sessions() {
    // List of test cases: (scripted input, text the session must print)
    let test_cases = vec![
        // Test Case 1: Deposit into a customer account
        ("deposit.txt", "Success!! N1000 has been deposited to Ada Obi!"),
        // Test Case 2: Transfer, then the recipient checks the new balance
        ("transfer.txt", "Your current account balance is N200."),
        // Test Case 3: Withdrawal with insufficient funds
        // - Withdrawal should fail, balance remains unchanged
        ("withdraw_insufficient.txt", "Sorry, insufficient funds, current balance is N500!"),
        // Test Case 4: Transfer to an account number nobody holds
        ("transfer_unknown_account.txt", "Sorry, account number 9999 not found!"),
        // Test Case 5: A customer tries the admin portal
        ("admin_denied.txt", "Sorry, you don't have access to this portal!"),
        // Test Case 6: An official promotes a customer, who then uses the portal
        ("admin_promote.txt", "Good day Bola Ade."),
        // Test Case 7: Opening a second account for an existing email
        ("open_existing_email.txt", "Sorry, email ada@mail.com already exists"),
    ];

    for (script, expected) in test_cases {
        let dir = data_dir(script.trim_end_matches(".txt"), true);
        let input = fs::read_to_string(Path::new("tests/data").join(script))
            .unwrap_or_else(|e| panic!("Failed to read {script}: {e}"));

        bank_cli(&dir)
            .write_stdin(input)
            .assert()
            .success()
            .stdout(predicate::str::contains(expected))
            .stdout(predicate::str::contains("Thank you and have a nice day."));
    }
}

#[test]
fn test_transactions_are_logged() {
    let dir = data_dir("logged", true);
    let input = fs::read_to_string("tests/data/transfer.txt").expect("Failed to read script");

    bank_cli(&dir).write_stdin(input).assert().success();

    let log = fs::read_to_string(dir.join("records.csv")).expect("No transaction log");
    let mut lines = log.lines();
    assert_eq!(lines.next(), Some("user,time,date,transaction,amount,account"));
    assert!(lines.next().unwrap().ends_with(",transfer,200,Bola Ade"));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_login_without_database() {
    let dir = data_dir("no-database", false);

    bank_cli(&dir)
        .write_stdin("5\nada@mail.com\nass\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("there is no database"));
    assert!(!dir.join("database.json").exists());
}

#[test]
fn test_add_official_then_login() {
    let dir = data_dir("add-official", false);

    bank_cli(&dir)
        .args(["add-official", "--name", "Jane Roe", "--password", "qwerty"])
        .assert()
        .success()
        .stdout("janeroe@bank.com\n");

    bank_cli(&dir)
        .write_stdin("8\njaneroe@bank.com\nqwerty\n9\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Good day Jane Roe."));

    assert_eq!(fs::read_to_string(dir.join("member_count.txt")).unwrap(), "2");
}

#[test]
fn test_add_official_password_required() {
    let dir = data_dir("add-official-empty", false);

    bank_cli(&dir)
        .args(["add-official", "--name", "Jane Roe", "--password", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidInput"));
}
