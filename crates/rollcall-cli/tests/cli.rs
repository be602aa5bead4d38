// crates/rollcall-cli/tests/cli.rs - End-to-end tests against the built binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rollcall(data_file: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("rollcall").unwrap();
    cmd.env_remove("ROLLCALL_DATA_FILE")
        .env_remove("ROLLCALL_COLOR")
        .arg("--data-file")
        .arg(data_file);
    cmd
}

#[test]
fn add_list_exit_session() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("roster.json");

    rollcall(&data)
        .write_stdin("add n=John Doe p=91234567 e=john@example.com c=4A\nlist\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added student: John Doe"))
        .stdout(predicate::str::contains("Listed 1 student(s)"))
        .stdout(predicate::str::contains("Exiting"));

    assert!(data.exists());
}

#[test]
fn roster_survives_across_sessions() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("roster.json");

    rollcall(&data)
        .write_stdin("add n=Jane Roe p=555123 e=jane@example.com c=5B\n")
        .assert()
        .success();

    rollcall(&data)
        .write_stdin("view n=Jane Roe\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Jane Roe"))
        .stdout(predicate::str::contains("5B"));
}

#[test]
fn rejected_commands_go_to_stderr_and_do_not_end_the_session() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("roster.json");

    rollcall(&data)
        .write_stdin("frobnicate\nhelp\nexit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("unknown command 'frobnicate'"))
        .stdout(predicate::str::contains("Exiting"));
}

#[test]
fn one_shot_command_exits_nonzero_on_rejection() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("roster.json");

    rollcall(&data)
        .args(["--command", "add n=Ann p=123456 e=ann@example.com c=1A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added student: Ann"));

    rollcall(&data)
        .args(["--command", "add n=Ann p=123456 e=ann@example.com c=1A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a student named 'Ann' already exists"));
}

#[test]
fn bulk_assignment_reports_skips_across_a_class() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("roster.json");

    let script = "\
add n=Alpha p=111222 e=a@example.com c=4A
add n=Beta p=333444 e=b@example.com c=4A
assign a=HW 1 n=Alpha
assign a=HW 1 c=4A
exit
";
    rollcall(&data)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 updated, 1 skipped"));
}
