use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::{contains, is_match};

const BINARY_NAME: &str = "oxo";

fn engine() -> Command {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.args([
        "--budget-ms",
        "5",
        "--first-move-bonus-ms",
        "5",
        "--seed",
        "42",
    ]);
    cmd
}

#[test]
fn harness_first_move() {
    let mut cmd = engine();
    let _ = cmd.args(["--mode", "harness"]);

    drop(
        cmd.write_stdin("-1 -1\n9\n0 0\n1 0\n2 0\n0 1\n1 1\n2 1\n0 2\n1 2\n2 2\n")
            .assert()
            .success()
            .stdout(is_match(r"^[0-2] [0-2]\n$").unwrap()),
    );
}

#[test]
fn harness_answers_every_turn() {
    let mut cmd = engine();
    let _ = cmd.args(["--mode", "harness"]);

    let output = cmd.write_stdin("1 1\n0\n").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "{stdout}");
    assert_ne!(lines[0], "1 1");
}

#[test]
fn harness_protocol_violation() {
    let mut cmd = engine();
    let _ = cmd.args(["--mode", "harness"]);

    drop(cmd.write_stdin("4 4\n").assert().failure());
}

#[test]
fn interactive_session() {
    let mut cmd = engine();

    drop(
        cmd.write_stdin("3 3\n1 1\nquit\n")
            .assert()
            .success()
            .stdout(
                contains("Oxo tic-tac-toe engine")
                    .and(contains("Error: invalid move notation '3 3'"))
                    .and(contains("Computer plays: "))
                    .and(contains("Iterations: ")),
            ),
    );
}

#[test]
fn bench_output() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).expect("Binary should be built");
    let _ = cmd.arg("bench");

    drop(
        cmd.assert()
            .stdout(is_match(r"^\d+ nodes \d+ nps\n$").unwrap())
            .success(),
    );
}
