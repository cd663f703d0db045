//! End-to-end CLI integration tests.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn moebench() -> Command {
    let mut cmd = Command::cargo_bin("moebench").expect("binary not found");
    cmd.env("NO_COLOR", "1");
    for var in [
        "MOEBENCH_PROBLEMS",
        "MOEBENCH_ALGORITHMS",
        "MOEBENCH_RUNS",
        "MOEBENCH_WORKERS",
        "MOEBENCH_INDICATORS",
        "MOEBENCH_CONFIG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn small_experiment(dir: &Path) -> Command {
    let mut cmd = moebench();
    cmd.args(["-p", "zdt1", "-a", "all", "-r", "3", "--evaluations", "200"])
        .args(["--variables", "5", "-n", "study", "-q", "-o"])
        .arg(dir);
    cmd
}

#[test]
fn help_flag() {
    moebench()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--reference-front"));
}

#[test]
fn version_flag() {
    moebench()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("moebench"));
}

#[test]
fn small_experiment_writes_every_artifact() {
    let dir = tempfile::tempdir().unwrap();
    small_experiment(dir.path()).assert().success();

    let root = dir.path().join("study");
    for run in 0..3 {
        assert!(root.join(format!("data/random/ZDT1/FUN{run}.tsv")).is_file());
        assert!(root.join(format!("data/mutation/ZDT1/VAR{run}.tsv")).is_file());
    }
    assert!(root.join("referenceFronts/ZDT1.pf").is_file());
    assert!(root.join("referenceFronts/ZDT1.ps").is_file());

    let csv = fs::read_to_string(root.join("QualityIndicatorSummary.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Algorithm,Problem,IndicatorName,ExecutionId,IndicatorValue")
    );
    // 6 indicators x 2 algorithms x 3 runs
    assert_eq!(lines.count(), 36);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(root.join("statistics.json")).unwrap()).unwrap();
    assert_eq!(json["per_problem"].as_array().map(Vec::len), Some(6));
}

#[test]
fn same_seed_gives_identical_tables() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    small_experiment(first.path()).args(["--seed", "11", "-w", "1"]).assert().success();
    small_experiment(second.path()).args(["--seed", "11", "-w", "4"]).assert().success();
    let read = |dir: &Path| {
        fs::read_to_string(dir.join("study/QualityIndicatorSummary.csv")).unwrap()
    };
    assert_eq!(read(first.path()), read(second.path()));
}

#[test]
fn report_lists_indicators() {
    let dir = tempfile::tempdir().unwrap();
    moebench()
        .args(["-p", "zdt1", "-a", "all", "-r", "3", "--evaluations", "200"])
        .args(["--variables", "5", "-i", "hv,igd", "-o"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("HV on ZDT1"))
        .stdout(predicate::str::contains("IGD on ZDT1"))
        .stdout(predicate::str::contains("Rank-sum"));
}

#[test]
fn unknown_algorithm_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    moebench()
        .args(["-a", "nsga9", "-q", "-o"])
        .arg(dir.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unknown algorithm"));
}

#[test]
fn zero_runs_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    moebench()
        .args(["-r", "0", "-q", "-o"])
        .arg(dir.path())
        .assert()
        .code(4);
}

#[test]
fn expired_deadline_exits_with_timeout_code() {
    let dir = tempfile::tempdir().unwrap();
    small_experiment(dir.path())
        .args(["--timeout", "0s"])
        .assert()
        .code(2);
}

#[test]
fn supplied_front_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let front = dir.path().join("zdt1.pf");
    fs::write(&front, "# true front\n0 1\n0.25 0.5\n1 0\n").unwrap();
    small_experiment(dir.path())
        .arg("--reference-front")
        .arg(format!("ZDT1={}", front.display()))
        .assert()
        .success();
    let pf = fs::read_to_string(dir.path().join("study/referenceFronts/ZDT1.pf")).unwrap();
    assert_eq!(pf, "0\t1\n0.25\t0.5\n1\t0\n");
}

#[test]
fn experiment_file_is_merged_under_flags() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("experiment.json");
    fs::write(
        &config,
        r#"{"name": "from-file", "problems": ["schaffer"], "algorithms": ["random"], "runs": 2, "evaluations": 100}"#,
    )
    .unwrap();
    moebench()
        .args(["-q", "-r", "4", "-c"])
        .arg(&config)
        .arg("-o")
        .arg(dir.path())
        .assert()
        .success();
    let csv =
        fs::read_to_string(dir.path().join("from-file/QualityIndicatorSummary.csv")).unwrap();
    // 6 indicators x 1 algorithm x 4 runs
    assert_eq!(csv.lines().count(), 1 + 24);
    assert!(csv.contains("random,Schaffer,HV,3,"));
}

#[test]
fn bash_completion() {
    moebench()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moebench"));
}
