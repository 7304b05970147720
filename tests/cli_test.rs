use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn xtb2csv() -> Command {
    let mut cmd = Command::cargo_bin("xtb2csv").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_missing_folder_exits_non_zero() {
    let temp = TempDir::new().unwrap();

    xtb2csv()
        .args(["--no-input", "--folder", "missing", "--output-name", "out", "--base"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Folder not found"));
}

#[test]
fn test_writes_summary_next_to_folder() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("batch").join("Macro").join("GATC");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("run.xtb.log"), "TOTAL ENERGY -123.456789 Eh\n").unwrap();

    xtb2csv()
        .args(["--no-input", "--folder", "batch", "--output-name", "xtb_summary_batch", "--base"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Extraction complete"))
        .stdout(predicate::str::contains("Total files processed: 1"));

    let csv = fs::read_to_string(temp.path().join("xtb_summary_batch.csv")).unwrap();
    assert!(csv.starts_with("Top Folder,Tetramer,Optimization Folder,File,Relative Path,"));
    assert!(csv.contains("Macro,GATC,GATC,run.xtb.log,"));
}

#[test]
fn test_empty_result_warns_and_succeeds() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("batch");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("traj.xtb.log"), "TOTAL ENERGY -1.0 Eh\n").unwrap();
    fs::write(root.join("x.err.log"), "TOTAL ENERGY -1.0 Eh\n").unwrap();

    xtb2csv()
        .args(["--no-input", "--folder", "batch", "--output-name", "empty", "--base"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No data extracted"));

    assert!(!temp.path().join("empty.csv").exists());
}

#[test]
fn test_config_file_adds_field() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("AuRing");
    fs::create_dir_all(root.join("down")).unwrap();
    fs::write(
        root.join("down").join("xtbopt.xtb.log"),
        "TOTAL ENERGY -5.5 Eh\nDISPERSION -0.125 Eh\n",
    ).unwrap();

    let config = temp.path().join("xtb2csv.toml");
    fs::write(
        &config,
        format!(
            "preset = \"thermo\"\nbase = '{}'\nfolder = \"AuRing\"\noutput_name = \"thermo\"\n\n[[fields]]\nlabel = \"Dispersion (Eh)\"\npattern = 'DISPERSION\\s+(-?\\d+\\.\\d+)\\s+Eh'\n",
            temp.path().display()
        ),
    ).unwrap();

    xtb2csv()
        .args(["--no-input", "--no-progress", "--config"])
        .arg(&config)
        .assert()
        .success();

    let csv = fs::read_to_string(root.join("thermo.csv")).unwrap();
    let mut lines = csv.lines();
    assert!(lines.next().unwrap().ends_with("Relative Path,Dispersion (Eh)"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("xtbopt.xtb.log,-5.5,"));
    // "down" is also a 4-letter alphabetic name, so it doubles as the tetramer
    assert!(row.contains(",AuRing,down,down,,"));
    assert!(row.ends_with(",-0.125"));
}

#[test]
fn test_presets_subcommand() {
    xtb2csv()
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("Preset: opt"))
        .stdout(predicate::str::contains("Preset: thermo"))
        .stdout(predicate::str::contains("G(RRHO) contrib. (Eh)"));
}

#[test]
fn test_no_input_without_base_fails() {
    xtb2csv()
        .arg("--no-input")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--base"));
}

#[test]
fn test_quiet_empty_run_still_warns() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("batch")).unwrap();

    xtb2csv()
        .args(["--no-input", "--quiet", "--folder", "batch", "--output-name", "empty", "--base"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No data extracted"));
}

#[test]
fn test_config_field_cannot_replace_file_column() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("batch").join("Macro");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("run.xtb.log"), "FILE 3.0\n").unwrap();

    let config = temp.path().join("xtb2csv.toml");
    fs::write(&config, "[[fields]]\nlabel = \"File\"\npattern = 'FILE\\s+(\\d+\\.\\d+)'\n").unwrap();

    xtb2csv()
        .args(["--no-input", "--folder", "batch", "--output-name", "out", "--config"])
        .arg(&config)
        .arg("--base")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("field label 'File'"));

    assert!(!temp.path().join("out.csv").exists());
}
