use super::*;
use chrono::TimeZone;
use std::fs;

fn cutoff(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn write_log(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_purge_keeps_recent_deletes_stale() {
    let dir = tempfile::tempdir().unwrap();
    // Entry A last seen 2024-01-01, entry B last seen 2024-06-01.
    let path = write_log(
        &dir,
        "debug.log",
        "[01-Jan-2024 10:00:00 UTC] stale error\n\
         [01-Jun-2024 10:00:00 UTC] fresh error\n",
    );

    let outcome = purge_before(&path, cutoff(2024, 3, 1), LogKind::Php).unwrap();

    assert_eq!(outcome.deleted_entries, 1);
    assert_eq!(outcome.kept_occurrences, 1);
    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains("fresh error"));
    assert!(!rewritten.contains("stale error"));
}

#[test]
fn test_recent_occurrence_retains_older_history() {
    let dir = tempfile::tempdir().unwrap();
    // Same message fired before and after the cutoff: the whole entry stays,
    // pre-cutoff occurrences included.
    let path = write_log(
        &dir,
        "debug.log",
        "[01-Jan-2024 10:00:00 UTC] recurring error\n\
         [01-Jun-2024 10:00:00 UTC] recurring error\n",
    );

    let outcome = purge_before(&path, cutoff(2024, 3, 1), LogKind::Php).unwrap();

    assert_eq!(outcome.deleted_entries, 0);
    assert_eq!(outcome.kept_occurrences, 2);
    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains("[01-Jan-2024 10:00:00 UTC] recurring error"));
}

#[test]
fn test_purge_monotonicity() {
    let content = "[01-Jan-2024 10:00:00 UTC] a\n\
                   [01-Mar-2024 10:00:00 UTC] b\n\
                   [01-Jun-2024 10:00:00 UTC] c\n";
    let dir = tempfile::tempdir().unwrap();

    let early = write_log(&dir, "early.log", content);
    let late = write_log(&dir, "late.log", content);
    purge_before(&early, cutoff(2024, 2, 1), LogKind::Php).unwrap();
    purge_before(&late, cutoff(2024, 5, 1), LogKind::Php).unwrap();

    let kept_early = fs::read_to_string(&early).unwrap();
    let kept_late = fs::read_to_string(&late).unwrap();
    // Everything kept by the later cutoff is also kept by the earlier one.
    for line in kept_late.lines() {
        assert!(kept_early.contains(line), "{line} missing from earlier-cutoff result");
    }
}

#[test]
fn test_multiline_entries_round_trip_through_purge() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_log(
        &dir,
        "debug.log",
        "[01-Jun-2024 10:00:00 UTC] PHP Fatal error: boom\n\
         Stack trace:\n\
         #0 [internal function]: f()\n",
    );

    purge_before(&path, cutoff(2024, 1, 1), LogKind::Php).unwrap();

    let rewritten = fs::read_to_string(&path).unwrap();
    let entries = aggregate::aggregate(parser::parse(&rewritten), LogKind::Php);
    assert_eq!(entries.len(), 1);
    assert!(entries[0].message.contains("[internal function]"));
}

#[test]
fn test_file_without_boundaries_purges_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_log(&dir, "debug.log", "garbage without any boundary\n");

    let outcome = purge_before(&path, cutoff(2024, 1, 1), LogKind::Php).unwrap();

    assert_eq!(outcome.deleted_entries, 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.log");
    match purge_before(&missing, cutoff(2024, 1, 1), LogKind::Php) {
        Err(CoreError::NotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn test_keep_last_zero_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_log(&dir, "debug.log", "");
    assert!(matches!(
        keep_last(&path, 0, Period::Days, LogKind::Php),
        Err(CoreError::InvalidCount)
    ));
}

#[test]
fn test_keep_last_purges_old_entries() {
    let dir = tempfile::tempdir().unwrap();
    let recent = Utc::now().format("%d-%b-%Y %H:%M:%S UTC").to_string();
    let path = write_log(
        &dir,
        "debug.log",
        &format!("[01-Jan-2001 10:00:00 UTC] ancient\n[{recent}] current\n"),
    );

    let outcome = keep_last(&path, 2, Period::Weeks, LogKind::Php).unwrap();

    assert_eq!(outcome.deleted_entries, 1);
    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains("current"));
    assert!(!rewritten.contains("ancient"));
}

#[test]
fn test_period_parsing() {
    assert_eq!("days".parse::<Period>().unwrap(), Period::Days);
    assert_eq!("weeks".parse::<Period>().unwrap(), Period::Weeks);
    assert_eq!("months".parse::<Period>().unwrap(), Period::Months);
    assert!(matches!(
        "fortnights".parse::<Period>(),
        Err(CoreError::InvalidPeriod(_))
    ));
}

#[test]
fn test_month_is_thirty_days() {
    assert_eq!(Period::Months.duration(2), Duration::days(60));
}

#[test]
fn test_no_temp_droppings_after_purge() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_log(&dir, "debug.log", "[01-Jun-2024 10:00:00 UTC] x\n");
    purge_before(&path, cutoff(2024, 1, 1), LogKind::Php).unwrap();

    let files: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(files, vec![std::ffi::OsString::from("debug.log")]);
}
