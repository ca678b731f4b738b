//! Integration tests for the mstudy CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STUDY_CSV: &str = "\
SEC order,product,item,description,req_qty,allocated_qty,balance,supply_type,source,locater,supplier,delay,SEC delivery
SO-100,PUMP,ITM-1,Bolt M8,10,10,0,inventory,free_stock,A-1,,,2030-01-15
SO-100,PUMP,ITM-2,Gasket,5,5,0,inventory,free_stock,1-1-1-1,,,2030-01-15
SO-200,VALVE,ITM-1,Bolt M8,10,6,4,PO,PO-555,,ACME,5,2030-02-01
SO-200,VALVE,ITM-3,Housing,2,2,0,QC,,,BETA,,2030-02-01
SO-300,PUMP,ITM-4,Shaft,3,0,3,PR,,,ACME,late,2029-12-01
SO-300,PUMP,ITM-2,Gasket,4,4,0,inventory,SO-100,,,,2029-12-01
";

/// Helper to get an mstudy command isolated from the user's config
fn mstudy(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mstudy").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("HOME", dir)
        .env_remove("MSTUDY_FILE")
        .env_remove("MSTUDY_SHEET")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to create a temp directory holding the csv study
fn setup_csv_study() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("study.csv");
    fs::write(&path, STUDY_CSV).unwrap();
    (tmp, path)
}

/// Helper to write the csv study as a workbook with a `Study` sheet
fn write_study_workbook(path: &Path) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Study").unwrap();
    for (r, line) in STUDY_CSV.lines().enumerate() {
        for (c, value) in line.split(',').enumerate() {
            if value.is_empty() {
                continue;
            }
            let (row, col) = (r as u32, c as u16);
            match value.parse::<f64>() {
                Ok(n) if r > 0 => sheet.write_number(row, col, n).unwrap(),
                _ => sheet.write_string(row, col, value).unwrap(),
            };
        }
    }
    workbook.save(path).unwrap();
}

// ============================================================================
// Basic CLI
// ============================================================================

#[test]
fn test_help_displays() {
    let tmp = TempDir::new().unwrap();
    mstudy(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Material Study"))
        .stdout(predicate::str::contains("push"));
}

#[test]
fn test_version_displays() {
    let tmp = TempDir::new().unwrap();
    mstudy(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mstudy"));
}

#[test]
fn test_unknown_command_fails() {
    let tmp = TempDir::new().unwrap();
    mstudy(tmp.path()).arg("bogus").assert().failure();
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    mstudy(tmp.path())
        .args(["overview", "--file", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_no_study_in_directory_fails() {
    let tmp = TempDir::new().unwrap();
    mstudy(tmp.path())
        .arg("overview")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Material Study file found"));
}

#[test]
fn test_missing_columns_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("thin.csv");
    fs::write(&path, "SEC order,item\nSO-1,ITM-1\n").unwrap();
    mstudy(tmp.path())
        .args(["overview", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required column"))
        .stderr(predicate::str::contains("req_qty"));
}

#[test]
fn test_non_numeric_quantity_reports_row() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.csv");
    fs::write(
        &path,
        "SEC order,item,req_qty,allocated_qty,balance,supply_type\n\
         SO-1,ITM-1,10,10,0,inventory\n\
         SO-1,ITM-2,ten,0,10,PR\n",
    )
    .unwrap();
    mstudy(tmp.path())
        .args(["overview", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ten"));
}

#[test]
fn test_workbook_is_auto_detected() {
    let tmp = TempDir::new().unwrap();
    write_study_workbook(&tmp.path().join("MV_Material_Study-2024-06-01.xlsx"));

    let output = mstudy(tmp.path())
        .args(["overview", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total_projects"], 3);
    assert_eq!(json["total_items"], 6);
}

#[test]
fn test_workbook_with_dir_flag() {
    let tmp = TempDir::new().unwrap();
    let studies = tmp.path().join("studies");
    fs::create_dir(&studies).unwrap();
    write_study_workbook(&studies.join("MV_Material_Study-latest.xlsx"));

    mstudy(tmp.path())
        .args(["project", "--list", "-f", "csv", "--dir"])
        .arg(&studies)
        .assert()
        .success()
        .stdout(predicate::str::contains("SO-300"));
}

#[test]
fn test_workbook_missing_sheet_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("MV_Material_Study-x.xlsx");
    write_study_workbook(&path);

    mstudy(tmp.path())
        .args(["overview", "--sheet", "Nope", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sheet 'Nope' not found"));
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn test_overview_report() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["overview", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Material Study Overview"))
        .stdout(predicate::str::contains("Delayed Items"));
}

#[test]
fn test_overview_json_counts() {
    let (tmp, path) = setup_csv_study();
    let output = mstudy(tmp.path())
        .args(["overview", "-f", "json", "--file"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ready_projects"], 1);
    assert_eq!(json["partial_projects"], 1);
    assert_eq!(json["critical_projects"], 1);
    assert_eq!(json["delayed_count"], 2);
}

#[test]
fn test_project_list_csv() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["project", "--list", "-f", "csv", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("SEC order,Status"))
        .stdout(predicate::str::contains("SO-100"))
        .stdout(predicate::str::contains("SO-200"))
        .stdout(predicate::str::contains("SO-300"));
}

#[test]
fn test_project_status_json() {
    let (tmp, path) = setup_csv_study();
    let output = mstudy(tmp.path())
        .args(["project", "SO-200", "-f", "json", "--file"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"]["status"], "partial");
    assert_eq!(json["status"]["total_items"], 2);
    assert_eq!(json["lines"].as_array().unwrap().len(), 2);
}

#[test]
fn test_project_report_lists_issues() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["project", "SO-300", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Critical"))
        .stdout(predicate::str::contains("Blocking Issues"))
        .stdout(predicate::str::contains("ITM-4"));
}

#[test]
fn test_project_not_found() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["project", "SO-999", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("SO-999"));
}

#[test]
fn test_inquiry_csv() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["inquiry", "ITM-1", "-f", "csv", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("SO-100"))
        .stdout(predicate::str::contains("SO-200"))
        .stdout(predicate::str::contains("SO-300").not());
}

#[test]
fn test_inquiry_unknown_item() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["inquiry", "NOPE", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Item 'NOPE' not found"));
}

#[test]
fn test_suppliers_ranking() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["suppliers", "-f", "csv", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ACME"))
        .stdout(predicate::str::contains("BETA").not());
}

#[test]
fn test_suppliers_without_column_fails() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plain.csv");
    fs::write(
        &path,
        "SEC order,item,req_qty,allocated_qty,balance,supply_type\nSO-1,ITM-1,1,1,0,inventory\n",
    )
    .unwrap();
    mstudy(tmp.path())
        .args(["suppliers", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no supplier column"));
}

#[test]
fn test_critical_projects() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["critical", "-f", "csv", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("SO-300"))
        .stdout(predicate::str::contains("SO-100").not());
}

#[test]
fn test_critical_problem_lines() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["critical", "--project", "SO-300", "-f", "csv", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ITM-4"))
        .stdout(predicate::str::contains("ITM-2").not());
}

#[test]
fn test_readiness_default_only_complete() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["readiness", "-f", "csv", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("SO-100"))
        .stdout(predicate::str::contains("SO-200").not());
}

#[test]
fn test_readiness_min_threshold() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["readiness", "--min", "60", "-f", "csv", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("SO-100"))
        .stdout(predicate::str::contains("SO-200"))
        .stdout(predicate::str::contains("SO-300").not());
}

#[test]
fn test_readiness_rejects_bad_threshold() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["readiness", "--min", "150", "--file"])
        .arg(&path)
        .assert()
        .failure();
}

// ============================================================================
// Push
// ============================================================================

#[test]
fn test_push_all_clear() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["push", "SO-100", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ALL CLEAR"))
        .stdout(predicate::str::contains("Materials Available in WIP"));
}

#[test]
fn test_push_summary_csv() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["push", "SO-300", "-f", "csv", "--file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Category,Count"))
        .stdout(predicate::str::contains("Missing Materials,1"))
        .stdout(predicate::str::contains("To Reallocate,1"));
}

#[test]
fn test_push_json_verdict() {
    let (tmp, path) = setup_csv_study();
    let output = mstudy(tmp.path())
        .args(["push", "SO-200", "-f", "json", "--file"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total_items"], 2);
    assert_eq!(json["blocker_count"], 1);
    assert_eq!(json["verdict"], "not_ready");
}

#[test]
fn test_push_by_product() {
    let (tmp, path) = setup_csv_study();
    let output = mstudy(tmp.path())
        .args(["push", "--by", "product", "PUMP", "-f", "json", "--file"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total_items"], 4);
}

#[test]
fn test_push_unknown_value_fails() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["push", "SO-999", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No demand lines match"));
}

#[test]
fn test_push_by_absent_column_fails() {
    let (tmp, path) = setup_csv_study();
    mstudy(tmp.path())
        .args(["push", "--by", "number", "X", "--file"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("SEC Number"));
}

#[test]
fn test_push_export_writes_workbooks() {
    let (tmp, path) = setup_csv_study();
    let out = tmp.path().join("out");
    mstudy(tmp.path())
        .args(["push", "SO-300", "-f", "csv", "--file"])
        .arg(&path)
        .arg("--export")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Exported"));

    assert!(out.join("Missing_Materials_SO-300.xlsx").exists());
    assert!(out.join("Reallocation_Needed_SO-300.xlsx").exists());
    assert!(out.join("Production_Action_Report_SO-300.xlsx").exists());
    assert!(!out.join("QC_Items_SO-300.xlsx").exists());
}

// ============================================================================
// Config and completions
// ============================================================================

#[test]
fn test_config_keys() {
    let tmp = TempDir::new().unwrap();
    mstudy(tmp.path())
        .args(["config", "keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wip_locater"))
        .stdout(predicate::str::contains("free_stock"));
}

#[test]
fn test_local_config_changes_wip_locater() {
    let (tmp, path) = setup_csv_study();
    fs::write(tmp.path().join("mstudy.yaml"), "wip_locater: A-1\n").unwrap();

    mstudy(tmp.path())
        .args(["config", "show", "wip_locater"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A-1"));

    let output = mstudy(tmp.path())
        .args(["push", "SO-100", "-f", "json", "--file"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let wip = json["buckets"]["WIP Materials"]["rows"].as_array().unwrap();
    assert_eq!(wip.len(), 1);
}

#[test]
fn test_config_unknown_key_fails() {
    let tmp = TempDir::new().unwrap();
    mstudy(tmp.path())
        .args(["config", "show", "bogus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_completions_bash() {
    let tmp = TempDir::new().unwrap();
    mstudy(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mstudy"));
}
