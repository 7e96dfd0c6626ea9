use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|err| panic!("clock should be >= UNIX_EPOCH: {err}"))
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{prefix}-{now}"));
    fs::create_dir_all(&dir)
        .unwrap_or_else(|err| panic!("failed to create temp dir {}: {err}", dir.display()));
    dir
}

fn run_hs<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_hs"))
        .args(args)
        .output()
        .unwrap_or_else(|err| panic!("failed to execute hs binary: {err}"))
}

fn run_json<I, S>(args: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = run_hs(args);
    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!(
            "hs command failed (status={}):\nstdout:\n{}\nstderr:\n{}",
            output.status, stdout, stderr
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    serde_json::from_str(&stdout)
        .unwrap_or_else(|err| panic!("stdout is not valid JSON: {err}\nstdout:\n{stdout}"))
}

fn as_i64(value: &Value, key: &str) -> i64 {
    value
        .get(key)
        .and_then(Value::as_i64)
        .unwrap_or_else(|| panic!("missing integer field `{key}` in payload: {value}"))
}

fn as_str<'a>(value: &'a Value, key: &str) -> &'a str {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("missing string field `{key}` in payload: {value}"))
}

fn as_f64(value: &Value, key: &str) -> f64 {
    value
        .get(key)
        .and_then(Value::as_f64)
        .unwrap_or_else(|| panic!("missing number field `{key}` in payload: {value}"))
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap_or_else(|| panic!("path should be valid UTF-8: {}", path.display()))
}

#[test]
fn schema_version_and_migrate_flow() {
    let dir = unique_temp_dir("hs-cli-migrate");
    let db = dir.join("journal.sqlite3");

    let before = run_json(["--db", path_str(&db), "db", "schema-version"]);
    assert_eq!(as_str(&before, "contract_version"), "cli.v1");
    assert_eq!(as_i64(&before, "current_version"), 0);
    assert_eq!(as_i64(&before, "target_version"), 1);

    let dry = run_json(["--db", path_str(&db), "db", "migrate", "--dry-run"]);
    assert_eq!(dry["dry_run"], Value::Bool(true));
    assert_eq!(dry["would_apply_versions"], serde_json::json!([1]));

    let applied = run_json(["--db", path_str(&db), "db", "migrate"]);
    assert_eq!(as_i64(&applied, "after_version"), 1);
    assert_eq!(applied["up_to_date"], Value::Bool(true));

    let after = run_json(["--db", path_str(&db), "db", "schema-version"]);
    assert_eq!(as_i64(&after, "current_version"), 1);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn sleep_record_reports_the_derived_duration() {
    let dir = unique_temp_dir("hs-cli-sleep");
    let db = dir.join("journal.sqlite3");

    let recorded = run_json([
        "--db",
        path_str(&db),
        "sleep",
        "record",
        "--date",
        "2023-04-16",
        "--bed",
        "22:30",
        "--wake",
        "06:30",
        "--quality",
        "4",
    ]);
    assert!((as_f64(&recorded, "duration_hours") - 8.0).abs() < f64::EPSILON);
    assert_eq!(recorded["recorded"]["bedTime"], "22:30");

    // Re-recording the same date replaces the night instead of adding one.
    let count_before = as_i64(&run_json(["--db", path_str(&db), "sleep", "history"]), "count");
    run_json([
        "--db",
        path_str(&db),
        "sleep",
        "record",
        "--date",
        "2023-04-16",
        "--bed",
        "23:00",
        "--wake",
        "06:00",
    ]);
    let count_after = as_i64(&run_json(["--db", path_str(&db), "sleep", "history"]), "count");
    assert_eq!(count_before, count_after);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn out_of_scale_pain_level_fails_without_touching_the_journal() {
    let dir = unique_temp_dir("hs-cli-pain");
    let db = dir.join("journal.sqlite3");

    let before = run_json(["--db", path_str(&db), "pain", "history"]);
    assert_eq!(before["entries"][0]["locationLabel"], "Lower Back");

    let rejected = run_hs([
        "--db",
        path_str(&db),
        "pain",
        "record",
        "--level",
        "11",
        "--location",
        "lower-back",
    ]);
    assert!(!rejected.status.success());
    let stderr = String::from_utf8_lossy(&rejected.stderr);
    assert!(stderr.contains("between 1 and 10"), "stderr: {stderr}");

    let after = run_json(["--db", path_str(&db), "pain", "history"]);
    assert_eq!(as_i64(&before, "count"), as_i64(&after, "count"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn manual_sitting_blocks_accumulate_into_the_day() {
    let dir = unique_temp_dir("hs-cli-sit");
    let db = dir.join("journal.sqlite3");

    // First use seeds five sample days; today's seeded total is 210 minutes.
    let first = run_json([
        "--db",
        path_str(&db),
        "sit",
        "add",
        "--hours",
        "2",
        "--minutes",
        "30",
    ]);
    assert_eq!(first["day"]["duration"], serde_json::json!(360));

    let second = run_json(["--db", path_str(&db), "sit", "add", "--minutes", "60"]);
    assert_eq!(second["day"]["duration"], serde_json::json!(420));

    let summary = run_json(["--db", path_str(&db), "sit", "summary"]);
    assert_eq!(as_i64(&summary, "today_minutes"), 420);
    assert_eq!(as_str(&summary, "today_label"), "7 hr");
    assert_eq!(as_i64(&summary, "limit_minutes"), 480);
    assert_eq!(summary["over_limit"], Value::Bool(false));

    let zero = run_hs(["--db", path_str(&db), "sit", "add", "--minutes", "0"]);
    assert!(!zero.status.success());

    // An hour count whose minute total overflows u32 is rejected, not wrapped.
    let oversized = run_hs(["--db", path_str(&db), "sit", "add", "--hours", "71582789"]);
    assert!(!oversized.status.success());
    let stderr = String::from_utf8_lossy(&oversized.stderr);
    assert!(stderr.contains("whole number of minutes"), "stderr: {stderr}");

    let history = run_json(["--db", path_str(&db), "sit", "history"]);
    assert_eq!(history["days"][4]["durationLabel"], "7 hr");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn reminder_lifecycle_add_toggle_delete() {
    let dir = unique_temp_dir("hs-cli-remind");
    let db = dir.join("journal.sqlite3");

    let added = run_json([
        "--db",
        path_str(&db),
        "remind",
        "add",
        "--time",
        "09:15",
        "--day",
        "mon",
        "--day",
        "wed",
    ]);
    assert_eq!(added["reminder"]["label"], "Exercise Reminder");
    assert_eq!(added["reminder"]["enabled"], Value::Bool(true));
    let id = added["reminder"]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("missing reminder id: {added}"))
        .to_string();

    // Three seeded reminders plus the new one.
    let listed = run_json(["--db", path_str(&db), "remind", "list"]);
    assert_eq!(as_i64(&listed, "count"), 4);

    // The seeded weekday reminder renders its compressed labels.
    let reminders = listed["reminders"]
        .as_array()
        .unwrap_or_else(|| panic!("missing reminders array: {listed}"));
    let morning = reminders
        .iter()
        .find(|reminder| reminder["label"] == "Morning Stretch")
        .unwrap_or_else(|| panic!("missing seeded reminder: {listed}"));
    assert_eq!(morning["daysLabel"], "Weekdays");
    assert_eq!(morning["timeLabel"], "8:00 AM");

    let toggled = run_json(["--db", path_str(&db), "remind", "toggle", "--id", &id]);
    assert_eq!(toggled["toggled"], Value::Bool(true));
    assert_eq!(toggled["reminder"]["enabled"], Value::Bool(false));

    let deleted = run_json(["--db", path_str(&db), "remind", "delete", "--id", &id]);
    assert_eq!(deleted["deleted"], Value::Bool(true));
    let relisted = run_json(["--db", path_str(&db), "remind", "list"]);
    assert_eq!(as_i64(&relisted, "count"), 3);

    let no_days = run_hs(["--db", path_str(&db), "remind", "add", "--time", "09:15"]);
    assert!(!no_days.status.success());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn community_like_toggle_is_self_inverse() {
    let dir = unique_temp_dir("hs-cli-community");
    let db = dir.join("journal.sqlite3");

    let feed = run_json(["--db", path_str(&db), "community", "feed"]);
    assert_eq!(as_i64(&feed, "count"), 5);
    let first = &feed["posts"][0];
    let id = first["id"]
        .as_str()
        .unwrap_or_else(|| panic!("missing post id: {feed}"))
        .to_string();
    let likes = first["likes"]
        .as_i64()
        .unwrap_or_else(|| panic!("missing likes: {feed}"));

    let liked = run_json(["--db", path_str(&db), "community", "like", "--id", &id]);
    assert_eq!(liked["post"]["likes"], serde_json::json!(likes + 1));
    assert_eq!(liked["post"]["liked"], Value::Bool(true));

    let restored = run_json(["--db", path_str(&db), "community", "like", "--id", &id]);
    assert_eq!(restored["post"]["likes"], serde_json::json!(likes));
    assert_eq!(restored["post"]["liked"], Value::Bool(false));

    // A signed-out post publishes under the fallback author.
    let posted = run_json([
        "--db",
        path_str(&db),
        "community",
        "post",
        "--content",
        "Back stretches done!",
    ]);
    assert_eq!(posted["post"]["author"], "User");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn plan_progress_follows_completion_toggles() {
    let dir = unique_temp_dir("hs-cli-plan");
    let db = dir.join("journal.sqlite3");

    run_json(["--db", path_str(&db), "plan", "toggle", "--exercise", "b1"]);
    let progress = run_json(["--db", path_str(&db), "plan", "progress", "--plan", "beginner"]);
    assert_eq!(as_i64(&progress, "completed"), 1);
    assert_eq!(as_i64(&progress, "total"), 4);
    assert_eq!(as_i64(&progress, "percent"), 25);

    let reset = run_json(["--db", path_str(&db), "plan", "reset", "--plan", "beginner"]);
    assert_eq!(as_i64(&reset, "cleared"), 1);
    let cleared = run_json(["--db", path_str(&db), "plan", "progress", "--plan", "beginner"]);
    assert_eq!(as_i64(&cleared, "completed"), 0);

    let unknown = run_hs(["--db", path_str(&db), "plan", "toggle", "--exercise", "z9"]);
    assert!(!unknown.status.success());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn profile_defaults_and_whoami_when_signed_out() {
    let dir = unique_temp_dir("hs-cli-profile");
    let db = dir.join("journal.sqlite3");

    let whoami = run_json(["--db", path_str(&db), "auth", "whoami"]);
    assert_eq!(whoami["user"], Value::Null);

    let profile = run_json(["--db", path_str(&db), "profile", "show"]);
    assert_eq!(as_str(&profile, "name"), "User");
    assert_eq!(as_str(&profile, "age"), "35");

    let saved = run_json([
        "--db",
        path_str(&db),
        "profile",
        "save",
        "--name",
        "Jane Doe",
        "--email",
        "jane@example.com",
        "--age",
        "34",
        "--gender",
        "female",
        "--pain-history",
        "Intermittent lower back pain",
    ]);
    assert_eq!(as_str(&saved, "name"), "Jane Doe");

    // Saving the profile refreshes the session pair.
    let session = run_json(["--db", path_str(&db), "auth", "whoami"]);
    assert_eq!(session["user"]["name"], "Jane Doe");

    let signed_out = run_json(["--db", path_str(&db), "auth", "sign-out"]);
    assert_eq!(signed_out["signed_out"], Value::Bool(true));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn backup_and_restore_round_trip() {
    let dir = unique_temp_dir("hs-cli-backup");
    let db = dir.join("journal.sqlite3");
    let backup = dir.join("backup.sqlite3");

    run_json(["--db", path_str(&db), "sit", "add", "--minutes", "45", "--date", "2023-04-20"]);
    run_json(["--db", path_str(&db), "db", "backup", "--out", path_str(&backup)]);

    // Mutate after the backup, then roll back to it.
    run_json(["--db", path_str(&db), "sit", "add", "--minutes", "45", "--date", "2023-04-21"]);
    run_json(["--db", path_str(&db), "db", "restore", "--in", path_str(&backup)]);

    let history = run_json(["--db", path_str(&db), "sit", "history"]);
    let days = history["days"]
        .as_array()
        .unwrap_or_else(|| panic!("missing days array: {history}"));
    assert!(days.iter().any(|day| day["date"] == "2023-04-20"));
    assert!(!days.iter().any(|day| day["date"] == "2023-04-21"));

    let _ = fs::remove_dir_all(&dir);
}
