use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn logistics_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("logistics"))
}

fn init_config(temp_dir: &TempDir) -> PathBuf {
    let config_path = temp_dir.path().join("logistics-config");

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success();

    config_path
}

fn add_entry(config_path: &Path, date: &str, vehicle: &str, driver: &str, amount: &str) {
    logistics_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "add",
            "--date",
            date,
            "--particular",
            "Sand",
            "--vehicle",
            vehicle,
            "--driver",
            driver,
            "--from",
            "Pune",
            "--to",
            "Mumbai",
            "--quantity",
            "10",
            "--amount",
            amount,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added entry"));
}

#[test]
fn test_help() {
    logistics_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local logbook for trips and shipments"));
}

#[test]
fn test_version() {
    logistics_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("logistics"));
}

#[test]
fn test_init_creates_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("logistics-config");

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized logistics config"));

    assert!(config_path.join("config.toml").exists());
    assert!(config_path.join("data").is_dir());
}

#[test]
fn test_init_fails_if_exists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_status_without_init() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nonexistent");

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("logistics init"));
}

#[test]
fn test_list_empty() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries recorded yet."));
}

#[test]
fn test_add_normalizes_and_persists() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    add_entry(&config_path, "2026-01-10", "mh01ab1234", "Ramesh", "4500");

    let raw = fs::read_to_string(config_path.join("data/logistics_entries.json")).unwrap();
    assert!(raw.contains("\"vehicleNo\": \"MH01AB1234\""));
    assert!(raw.contains("\"createdAt\""));

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MH01AB1234"))
        .stdout(predicate::str::contains("Pune → Mumbai"))
        .stdout(predicate::str::contains("₹4,500.00"))
        .stdout(predicate::str::contains("Showing 1 of 1 entries"));
}

#[test]
fn test_add_invalid_date() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    logistics_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "add",
            "--date",
            "10/01/2026",
            "--particular",
            "Sand",
            "--vehicle",
            "MH01",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_add_without_amount_is_not_billed() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    add_entry(&config_path, "2026-01-10", "MH01", "Ramesh", "");

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not billed"));
}

#[test]
fn test_list_filters_case_insensitively() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    add_entry(&config_path, "2026-01-10", "MH01AB1234", "Ramesh", "100");
    add_entry(&config_path, "2026-01-11", "GJ05XY0001", "Suresh", "200");
    add_entry(&config_path, "2026-02-01", "MH01CD5678", "Anil", "300");

    logistics_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "list",
            "--vehicle",
            "mh01",
            "--month",
            "2026-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("MH01AB1234"))
        .stdout(predicate::str::contains("GJ05XY0001").not())
        .stdout(predicate::str::contains("MH01CD5678").not())
        .stdout(predicate::str::contains("Showing 1 of 3 entries (2 filters active)"));
}

#[test]
fn test_list_ignores_unparseable_bounds() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    add_entry(&config_path, "2026-01-10", "MH01", "Ramesh", "100");
    add_entry(&config_path, "2026-01-11", "GJ05", "Suresh", "200");

    logistics_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "list",
            "--min-amount",
            "lots",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 2 of 2 entries"));
}

#[test]
fn test_edit_and_delete_by_row_number() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    add_entry(&config_path, "2026-01-10", "MH01", "Ramesh", "100");
    add_entry(&config_path, "2026-01-11", "GJ05", "Suresh", "200");

    logistics_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "edit",
            "2",
            "--driver",
            "Mahesh",
            "--vehicle",
            "ka01zz9",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated entry #2"));

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mahesh"))
        .stdout(predicate::str::contains("KA01ZZ9"));

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted entry #1"));

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("KA01ZZ9"))
        .stdout(predicate::str::contains("Ramesh").not())
        .stdout(predicate::str::contains("Showing 1 of 1 entries"));
}

#[test]
fn test_delete_unknown_entry() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    add_entry(&config_path, "2026-01-10", "MH01", "Ramesh", "100");

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "delete", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Entry '7' not found"));
}

#[test]
fn test_corrupt_data_reads_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    fs::write(
        config_path.join("data/logistics_entries.json"),
        "{this is not json",
    )
    .unwrap();

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries recorded yet."));
}

#[test]
fn test_top_vehicles() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    for vehicle in ["A1", "B2", "A1", "C3", "B2", "A1"] {
        add_entry(&config_path, "2026-01-10", vehicle, "Ramesh", "100");
    }

    logistics_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "top",
            "--field",
            "vehicle",
            "-n",
            "2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Top Vehicle by Usage"))
        .stdout(predicate::str::contains("A1"))
        .stdout(predicate::str::contains("B2"))
        .stdout(predicate::str::contains("C3").not())
        .stdout(predicate::str::contains("3 distinct value(s) across 6 entries"));
}

#[test]
fn test_dashboard_shows_rankings_and_window() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    add_entry(&config_path, "2026-01-10", "MH01", "Ramesh", "100");
    add_entry(&config_path, "2026-01-11", "MH01", "Suresh", "");

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "dashboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard (all entries)"))
        .stdout(predicate::str::contains("Entries:          2"))
        .stdout(predicate::str::contains("Total amount:     ₹100.00"))
        .stdout(predicate::str::contains("Vehicles:         1"))
        .stdout(predicate::str::contains("Drivers:          2"))
        .stdout(predicate::str::contains("Top Vehicles by Usage"))
        .stdout(predicate::str::contains("Last 6 months"));
}

#[test]
fn test_bill_totals_with_gst() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    add_entry(&config_path, "2026-01-10", "MH01", "Ramesh", "600");
    add_entry(&config_path, "2026-01-20", "GJ05", "Suresh", "400");
    add_entry(&config_path, "2026-02-01", "KA01", "Anil", "999");

    logistics_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "bill",
            "--month",
            "2026-01",
            "--bill-to",
            "Acme Builders",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("INVOICE #BILL-"))
        .stdout(predicate::str::contains("Acme Builders"))
        .stdout(predicate::str::contains("January 2026"))
        .stdout(predicate::str::contains("KA01").not())
        .stdout(predicate::str::contains("₹1,000.00"))
        .stdout(predicate::str::contains("(+) GST 18%"))
        .stdout(predicate::str::contains("₹180.00"))
        .stdout(predicate::str::contains("₹1,180.00"));
}

#[test]
fn test_bill_empty_month() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    logistics_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "bill",
            "--month",
            "2026-03",
            "--bill-to",
            "Acme",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No entries recorded for March 2026"));
}

#[test]
fn test_bill_invalid_month() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    logistics_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "bill",
            "--month",
            "March",
            "--bill-to",
            "Acme",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid month 'March'"));
}

#[test]
fn test_export_filtered_csv() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);
    let csv_path = temp_dir.path().join("out.csv");

    add_entry(&config_path, "2026-01-10", "MH01", "Ramesh", "600");
    add_entry(&config_path, "2026-01-20", "GJ05", "Suresh", "");

    logistics_cmd()
        .args([
            "-C",
            config_path.to_str().unwrap(),
            "export",
            "--driver",
            "suresh",
            "-o",
            csv_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 entries"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("SR. NO.,Date,Particular"));
    assert_eq!(lines[1], "2,20/01/2026,Sand,,GJ05,Suresh,Pune,Mumbai,10,");
}

#[test]
fn test_status() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = init_config(&temp_dir);

    add_entry(&config_path, "2026-01-10", "MH01", "Ramesh", "600");

    logistics_cmd()
        .args(["-C", config_path.to_str().unwrap(), "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logistics Status"))
        .stdout(predicate::str::contains("GST rate:         18%"))
        .stdout(predicate::str::contains("Entries:          1"))
        .stdout(predicate::str::contains("Recent entries:"));
}
