use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn virada(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("virada").unwrap();
    cmd.env("VIRADA_CONFIG_DIR", config_dir);
    cmd
}

fn write_report(dir: &Path, rows: &str) -> PathBuf {
    let path = dir.join("balancete.html");
    let html = format!(
        "<html><body><table>\
         <tr><th>Código</th><th>Descrição</th><th>Débito</th><th>Crédito</th></tr>\
         {rows}</table></body></html>"
    );
    std::fs::write(&path, html).unwrap();
    path
}

#[test]
fn analyze_flags_asset_and_liability_flips() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("viradas.csv");
    virada(dir.path())
        .args(["analyze", fixture("balancete.html").to_str().unwrap()])
        .args(["--format", "csv", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("6 accounts read"))
        .stdout(predicate::str::contains("2 flipped accounts found"))
        .stdout(predicate::str::contains("Banco Conta Movimento"));

    let content = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Code,Name,Debit Total,Credit Total"));
    assert!(lines[1].starts_with("1.1.1.2,Banco Conta Movimento,0.00,500.00,debtor,creditor"));
    assert!(lines[2].starts_with("2.1.1.2,Empréstimos Bancários,400.00,0.00,creditor,debtor"));
}

#[test]
fn analyze_quiet_omits_table() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("viradas.csv");
    virada(dir.path())
        .args(["analyze", fixture("balancete.html").to_str().unwrap(), "--quiet"])
        .args(["--format", "csv", "--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 flipped accounts found"))
        .stdout(predicate::str::contains("Banco Conta Movimento").not());
}

#[test]
fn analyze_equity_only_flip_reports_zero() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_report(
        dir.path(),
        "<tr><td>3.1.1</td><td>Capital Social</td><td>700,00</td><td>0,00</td></tr>",
    );
    let out = dir.path().join("viradas.csv");
    virada(dir.path())
        .args(["analyze", input.to_str().unwrap(), "--format", "csv"])
        .args(["--output", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 flipped accounts found"));

    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn analyze_header_only_report_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_report(dir.path(), "");
    virada(dir.path())
        .args(["analyze", input.to_str().unwrap()])
        .args(["--output", dir.path().join("x.csv").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Parse error"));
    assert!(!dir.path().join("x.csv").exists());
}

#[test]
fn analyze_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    virada(dir.path())
        .args(["analyze", dir.path().join("nope.html").to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: IO error"));
}

#[test]
fn analyze_uses_export_dir_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    let exports = dir.path().join("exports");
    virada(dir.path())
        .args(["settings", "set", "--export-dir", exports.to_str().unwrap()])
        .args(["--format", "csv"])
        .assert()
        .success();

    virada(dir.path())
        .args(["analyze", fixture("balancete.html").to_str().unwrap(), "--all"])
        .assert()
        .success();

    let names: Vec<String> = std::fs::read_dir(&exports)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.iter().any(|n| n.starts_with("contas-viradas-") && n.ends_with(".csv")));
    assert!(names.iter().any(|n| n.starts_with("todas-contas-") && n.ends_with(".csv")));
}

#[test]
fn settings_show_reports_saved_values() {
    let dir = tempfile::tempdir().unwrap();
    virada(dir.path())
        .args(["settings", "set", "--format", "csv"])
        .assert()
        .success();
    virada(dir.path())
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Format:     csv"));
}

#[test]
fn malformed_settings_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    virada(dir.path())
        .args(["settings", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("settings.json"));
}
