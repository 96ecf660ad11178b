use std::path::{Path, PathBuf};

use assert_cmd::Command;
use meowdb::common::{COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE};
use predicates::prelude::*;
use tempfile::TempDir;

const MAX_ROWS: usize = 1400;

fn create_db_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temporary directory");
    let db_path = dir.path().join("test.db");
    (dir, db_path)
}

fn run_commands_with_args<T: AsRef<str>>(commands: &[T], db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("meowdb").expect("Failed to run command");
    cmd.arg(db_path);

    let input = commands
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    cmd.write_stdin(input);
    cmd
}

#[test]
fn it_inserts_and_retrieves_a_row() {
    let (_dir, db_path) = create_db_path();
    let mut cmd = run_commands_with_args(
        &["insert 1 user1 person1@example.com", "select", ".exit"],
        &db_path,
    );

    let expected = [
        "meowdb > Executed.",
        "meowdb > (1, user1, person1@example.com)",
        "Executed.",
        "meowdb > ",
    ]
    .join("\n");

    cmd.assert().success().stdout(expected);
}

#[test]
fn it_prints_error_message_when_table_is_full() {
    let (_dir, db_path) = create_db_path();
    let mut commands: Vec<String> = (0..=MAX_ROWS)
        .map(|i| format!("insert {i} user{i} person{i}@example.com"))
        .collect();
    commands.push(".exit".to_string());

    let mut cmd = run_commands_with_args(&commands, &db_path);

    cmd.assert()
        .success()
        .stdout(predicate::str::ends_with("meowdb > Error: Table full.\nmeowdb > "));
}

#[test]
fn it_fills_and_saves_full_table() {
    let (_dir, db_path) = create_db_path();
    let mut commands = Vec::new();
    let mut expected = Vec::new();
    for i in 0..MAX_ROWS {
        commands.push(format!("insert {i} user{i} person{i}@example.com"));
        expected.push(format!("({i}, user{i}, person{i}@example.com)"));
    }
    commands.push(".exit".to_string());

    let mut cmd = run_commands_with_args(&commands, &db_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::ends_with("meowdb > "));

    let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(expected.join("\n")));
}

#[test]
fn it_allows_inserting_strings_that_are_the_maximum_length() {
    let (_dir, db_path) = create_db_path();
    let long_username = "a".repeat(COLUMN_USERNAME_SIZE);
    let long_email = "a".repeat(COLUMN_EMAIL_SIZE);

    let commands = [
        format!("insert 1 {long_username} {long_email}"),
        "select".to_string(),
        ".exit".to_string(),
    ];
    let mut cmd = run_commands_with_args(&commands, &db_path);

    let expected = [
        "meowdb > Executed.".to_string(),
        format!("meowdb > (1, {long_username}, {long_email})"),
        "Executed.".to_string(),
        "meowdb > ".to_string(),
    ]
    .join("\n");

    cmd.assert().success().stdout(expected);
}

#[test]
fn it_prints_error_message_if_strings_are_too_long() {
    let (_dir, db_path) = create_db_path();
    let long_username = "a".repeat(COLUMN_USERNAME_SIZE + 1);
    let long_email = "a".repeat(COLUMN_EMAIL_SIZE + 1);

    let commands = [
        format!("insert 1 {long_username} {long_email}"),
        "select".to_string(),
        ".exit".to_string(),
    ];
    let mut cmd = run_commands_with_args(&commands, &db_path);

    let expected = [
        "meowdb > String is too long.",
        "meowdb > Executed.",
        "meowdb > ",
    ]
    .join("\n");

    cmd.assert().success().stdout(expected);
}

#[test]
fn it_prints_error_message_if_id_is_negative() {
    let (_dir, db_path) = create_db_path();
    let mut cmd = run_commands_with_args(
        &["insert -1 user1 person1@example.com", "select", ".exit"],
        &db_path,
    );

    let expected = [
        "meowdb > ID must be positive.",
        "meowdb > Executed.",
        "meowdb > ",
    ]
    .join("\n");

    cmd.assert().success().stdout(expected);
}

#[test]
fn it_reports_unrecognized_input() {
    let (_dir, db_path) = create_db_path();
    let mut cmd = run_commands_with_args(&[".tables", "drop users", "insert 1", ".exit"], &db_path);

    let expected = [
        "meowdb > Unrecognized metacommand '.tables'",
        "meowdb > Unrecognized command 'drop users'",
        "meowdb > Syntax error. Could not parse statement.",
        "meowdb > ",
    ]
    .join("\n");

    cmd.assert().success().stdout(expected);
}

#[test]
fn it_keeps_data_after_closing_connection() {
    let (_dir, db_path) = create_db_path();

    let mut cmd = run_commands_with_args(&["insert 1 user1 person1@example.com", ".exit"], &db_path);
    cmd.assert()
        .success()
        .stdout(["meowdb > Executed.", "meowdb > "].join("\n"));

    let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
    cmd.assert().success().stdout(
        [
            "meowdb > (1, user1, person1@example.com)",
            "Executed.",
            "meowdb > ",
        ]
        .join("\n"),
    );
}

#[test]
fn it_saves_data_when_input_ends_without_exit() {
    let (_dir, db_path) = create_db_path();

    let mut cmd = run_commands_with_args(&["insert 5 eve eve@example.com"], &db_path);
    cmd.assert().success();

    let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(5, eve, eve@example.com)"));
}

#[test]
fn it_keeps_rows_when_a_line_is_not_utf8() {
    let (_dir, db_path) = create_db_path();

    let mut cmd = Command::cargo_bin("meowdb").expect("Failed to run command");
    cmd.arg(&db_path)
        .write_stdin(&b"insert 1 ada ada@example.com\n\xff\xfe\n.exit\n"[..]);
    cmd.assert().success().stdout(
        [
            "meowdb > Executed.",
            "meowdb > Unrecognized command '\u{FFFD}\u{FFFD}'",
            "meowdb > ",
        ]
        .join("\n"),
    );

    assert_eq!(std::fs::metadata(&db_path).unwrap().len(), 291);

    let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("(1, ada, ada@example.com)"));
}

#[test]
fn it_writes_plain_logs_when_stderr_is_not_a_terminal() {
    let (_dir, db_path) = create_db_path();

    let mut cmd = run_commands_with_args(&[".exit"], &db_path);
    cmd.env("RUST_LOG", "meowdb=info");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("opened table"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}
