use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const HEADER: &str = "opencv_contrib-4.10.0/modules/tracking/include/opencv2/tracking.hpp";
const IMPL: &str = "opencv_contrib-4.10.0/modules/tracking/src/trackerCSRT.cpp";

const NEW_HEADER: &str = "class CV_EXPORTS_W TrackerCSRTV2 : public Tracker {};\n";
const NEW_IMPL: &str = "class TrackerCSRTV2Impl { float getLastPSRValue() const; };\n";

fn write(root: &Path, rel: &str, content: &str) -> std::io::Result<PathBuf> {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("relative path has a parent"))?;
    fs::write(&path, content)?;
    Ok(path)
}

fn setup() -> std::io::Result<(TempDir, PathBuf, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src");
    let dst = temp_dir.path().join("dst");
    write(&src, HEADER, NEW_HEADER)?;
    write(&src, IMPL, NEW_IMPL)?;
    fs::create_dir(&dst)?;
    Ok((temp_dir, src, dst))
}

fn migrate(src: &Path, dst: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("migrate-mods")?;
    cmd.arg("--source").arg(src).arg("--target").arg(dst);
    Ok(cmd)
}

fn backups_in(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains(".backup_"))
        {
            found.push(path);
        }
    }
    Ok(found)
}

#[test]
fn test_execute_copies_and_verifies() -> TestResult {
    let (_temp_dir, src, dst) = setup()?;

    migrate(&src, &dst)?
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode: execute"))
        .stdout(predicate::str::contains("Operations performed: 2"))
        .stdout(predicate::str::contains("Backups created: 0"))
        .stdout(predicate::str::contains("PSR accessor method present"))
        .stdout(predicate::str::contains("Not found").not());

    assert_eq!(fs::read_to_string(dst.join(HEADER))?, NEW_HEADER);
    assert_eq!(fs::read_to_string(dst.join(IMPL))?, NEW_IMPL);
    Ok(())
}

#[test]
fn test_dry_run_on_bare_target_warns_and_changes_nothing() -> TestResult {
    let (_temp_dir, src, dst) = setup()?;

    migrate(&src, &dst)?
        .arg("--dry-run")
        .arg("--backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("target directories are missing"))
        .stdout(predicate::str::contains("opencv-4.10.0"))
        .stdout(predicate::str::contains("Mode: preview"))
        .stdout(predicate::str::contains("Operations performed").not())
        .stdout(predicate::str::contains("Verifying").not());

    assert_eq!(fs::read_dir(&dst)?.count(), 0);
    Ok(())
}

#[test]
fn test_backup_keeps_old_content() -> TestResult {
    let (_temp_dir, src, dst) = setup()?;
    let header = write(&dst, HEADER, "OLD_HEADER")?;
    let implementation = write(&dst, IMPL, "OLD_IMPL")?;

    migrate(&src, &dst)?
        .arg("--backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backups created: 2"));

    let header_backups = backups_in(header.parent().expect("header has a parent"))?;
    let impl_backups = backups_in(implementation.parent().expect("impl has a parent"))?;
    assert_eq!(header_backups.len(), 1);
    assert_eq!(impl_backups.len(), 1);
    assert_eq!(fs::read_to_string(&header_backups[0])?, "OLD_HEADER");
    assert_eq!(fs::read_to_string(&impl_backups[0])?, "OLD_IMPL");

    assert_eq!(fs::read_to_string(&header)?, NEW_HEADER);
    assert_eq!(fs::read_to_string(&implementation)?, NEW_IMPL);
    Ok(())
}

#[test]
fn test_missing_source_root_exits_one() -> TestResult {
    let temp_dir = TempDir::new()?;
    let missing = temp_dir.path().join("no-such-source");

    migrate(&missing, temp_dir.path())?
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no-such-source"));
    Ok(())
}

#[test]
fn test_missing_source_files_are_all_listed() -> TestResult {
    let temp_dir = TempDir::new()?;
    let src = temp_dir.path().join("src");
    fs::create_dir(&src)?;

    migrate(&src, temp_dir.path())?
        .assert()
        .code(1)
        .stdout(predicate::str::contains("tracking.hpp"))
        .stdout(predicate::str::contains("trackerCSRT.cpp"));
    Ok(())
}

#[test]
fn test_marker_mismatch_is_not_fatal() -> TestResult {
    let (_temp_dir, src, dst) = setup()?;
    write(&src, IMPL, "class TrackerCSRTImpl {};\n")?;

    migrate(&src, &dst)?
        .assert()
        .success()
        .stdout(predicate::str::contains("Not found: getLastPSRValue"));
    Ok(())
}

#[test]
fn test_verify_hash_reports_match() -> TestResult {
    let (_temp_dir, src, dst) = setup()?;

    migrate(&src, &dst)?
        .args(["--verify-hash", "blake3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Checksum match (blake3:"));
    Ok(())
}

#[test]
fn test_invalid_hash_algorithm_exits_one() -> TestResult {
    let (_temp_dir, src, dst) = setup()?;

    migrate(&src, &dst)?
        .args(["--verify-hash", "md5"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Invalid hash algorithm"));

    assert!(!dst.join(HEADER).exists());
    Ok(())
}

#[test]
fn test_same_source_and_target_exits_one_without_truncating() -> TestResult {
    let (_temp_dir, src, _dst) = setup()?;

    migrate(&src, &src)?
        .arg("--backup")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("same file"));

    assert_eq!(fs::read_to_string(src.join(HEADER))?, NEW_HEADER);
    assert_eq!(fs::read_to_string(src.join(IMPL))?, NEW_IMPL);
    let header_dir = src.join(HEADER);
    assert!(backups_in(header_dir.parent().expect("header has a parent"))?.is_empty());
    Ok(())
}
