use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A throwaway copy of the inspection fixture project.
struct QualisTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl QualisTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let fixture = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/inspection");

        let dest = tmp.path().join("inspection");
        Self::copy_dir(&fixture, &dest)?;

        Ok(Self {
            _tmp: tmp,
            root: dest,
        })
    }

    fn copy_dir(src: &Path, dst: &Path) -> std::io::Result<()> {
        let mut options = fs_extra::dir::CopyOptions::new();
        options.content_only = true;

        std::fs::create_dir_all(dst)?;
        fs_extra::dir::copy(src, dst, &options)
            .map(|_| ())
            .map_err(|e| std::io::Error::other(e.to_string()))
    }

    fn qualis(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qualis"));
        cmd.current_dir(&self.root);
        cmd.env_remove("QUALIS_DATABASE")
            .env_remove("QUALIS_TARGET_PATH")
            .env_remove("QUALIS_SCORE_PRECISION");
        cmd
    }

    fn json(&self, args: &[&str]) -> Result<serde_json::Value> {
        let output = self.qualis().args(args).output()?;
        anyhow::ensure!(
            output.status.success(),
            "qualis {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).context("stdout is not JSON")
    }
}

#[test]
fn test_catalog_lists_criteria() -> Result<()> {
    let env = QualisTestEnv::new()?;

    env.qualis()
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("6 criteria"))
        .stdout(predicate::str::contains("TEMP-01"))
        .stdout(predicate::str::contains("All criteria are well-formed"));
    Ok(())
}

#[test]
fn test_catalog_flags_misconfigured_criterion() -> Result<()> {
    let env = QualisTestEnv::new()?;
    let catalog = env.root.join("criteria.yaml");
    let mut content = std::fs::read_to_string(&catalog)?;
    content.push_str("  - code: COLOR\n    title: Colour match\n    data_type: select\n");
    std::fs::write(&catalog, content)?;

    env.qualis()
        .arg("catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 misconfigured criteria"))
        .stderr(predicate::str::contains("COLOR"));
    Ok(())
}

#[test]
fn test_evaluate_directory_summary() -> Result<()> {
    let env = QualisTestEnv::new()?;

    let output = env.qualis().args(["evaluate", "records"]).output()?;
    assert_eq!(output.status.code(), Some(1), "a non-compliant record fails the run");

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("INS-002"));
    assert!(stdout.contains("33.33%"));

    let stderr = String::from_utf8(output.stderr)?;
    let summary = stderr
        .lines()
        .find(|line| line.starts_with("📊"))
        .context("summary line missing")?;
    insta::assert_snapshot!(summary, @"📊 3 record(s): 1 compliant, 1 non-compliant, 1 pending, 0 unreadable");
    Ok(())
}

#[test]
fn test_evaluate_single_compliant_file_as_json() -> Result<()> {
    let env = QualisTestEnv::new()?;

    let records = env.json(&["evaluate", "records/ins-001.yaml", "--json"])?;
    let summary = &records[0]["assessment"]["summary"];
    assert_eq!(summary["overall_compliance"], true);
    assert_eq!(summary["compliance_score"], 100.0);
    assert_eq!(summary["evaluated_count"], 6);

    // Dry run: nothing was stored
    assert!(!env.root.join("qualis.duckdb").exists());
    Ok(())
}

#[test]
fn test_record_workflow_end_to_end() -> Result<()> {
    let env = QualisTestEnv::new()?;

    env.qualis()
        .args(["record", "create", "records/ins-002.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Record INS-002 created"))
        .stdout(predicate::str::contains("33.33%"));

    env.qualis()
        .args(["record", "set", "INS-002", "FINISH", "Good"])
        .assert()
        .success()
        .stdout(predicate::str::contains("66.67%"));

    env.qualis()
        .args(["record", "set", "INS-002", "TEMP-01", "100.4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("100%"));

    for action in ["submit", "start-review", "approve"] {
        env.qualis()
            .args(["record", "transition", "INS-002", action])
            .assert()
            .success();
    }

    env.qualis()
        .args(["record", "set", "INS-002", "SEAL", "no"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("can no longer be edited"))
        .stderr(predicate::str::contains("qualis::domain::record_locked"));

    let record = env.json(&["record", "show", "INS-002", "--json"])?;
    assert_eq!(record["status"], "approved");
    assert_eq!(record["assessment"]["summary"]["compliance_score"], 100.0);
    assert_eq!(record["values"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[test]
fn test_invalid_transition_is_rejected() -> Result<()> {
    let env = QualisTestEnv::new()?;

    env.qualis()
        .args(["record", "create", "records/ins-001.yaml"])
        .assert()
        .success();

    env.qualis()
        .args(["record", "transition", "INS-001", "approve"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot approve a record in status 'draft'"));

    env.qualis()
        .args(["record", "transition", "INS-001", "archive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown record action"));
    Ok(())
}

#[test]
fn test_report_over_stored_records() -> Result<()> {
    let env = QualisTestEnv::new()?;

    for file in [
        "records/ins-001.yaml",
        "records/ins-002.yaml",
        "records/ins-003.yaml",
        "pending/ins-010.yaml",
    ] {
        env.qualis()
            .args(["record", "create", file])
            .assert()
            .success();
    }

    let report = env.json(&["report", "--format", "json", "--top", "2"])?;
    let compliance = &report["compliance"];
    assert_eq!(compliance["total_records"], 4);
    assert_eq!(compliance["passed"], 1);
    assert_eq!(compliance["failed"], 2);
    assert_eq!(compliance["pending"], 1);
    assert_eq!(compliance["pass_rate"], 33.33);
    assert_eq!(compliance["category_breakdown"]["incoming"], 2);
    assert_eq!(compliance["category_breakdown"]["final"], 1);
    assert_eq!(compliance["category_breakdown"]["Unknown"], 1);

    let top = report["top_failures"].as_array().context("top_failures")?;
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["criterion"], "TEMP-01");
    assert_eq!(top[0]["failure_count"], 2);
    assert_eq!(top[0]["severity"], "critical");

    assert!(env.root.join("target/compliance_report.json").exists());

    env.qualis()
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Most failed criteria"))
        .stdout(predicate::str::contains("Bath temperature"))
        .stdout(predicate::str::contains("Category: Unknown: 1, final: 1, incoming: 2"));

    // Everything was evaluated today
    let past = env.json(&["report", "--format", "json", "--until", "2000-01-01"])?;
    assert_eq!(past["compliance"]["total_records"], 0);
    assert_eq!(past["window"]["until"], "2000-01-01");
    Ok(())
}

#[test]
fn test_create_rejects_record_past_draft() -> Result<()> {
    let env = QualisTestEnv::new()?;
    let file = env.root.join("records/closed.yaml");
    let content = std::fs::read_to_string(env.root.join("records/ins-001.yaml"))?
        .replace("INS-001", "INS-099");
    std::fs::write(&file, format!("{content}\nstatus: closed\n"))?;

    env.qualis()
        .args(["record", "create", "records/closed.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot import a record in status 'closed'"));

    env.qualis()
        .args(["record", "show", "INS-099"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_missing_project_config() -> Result<()> {
    let tmp = tempfile::tempdir()?;

    Command::new(assert_cmd::cargo::cargo_bin!("qualis"))
        .args(["catalog", "--project-dir"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load project configuration"));
    Ok(())
}
