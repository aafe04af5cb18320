use std::time::Duration;

use tokio::sync::mpsc;
use updatery_backend::{BackendError, PackageManager, UpgradeOutcome};

use super::Updatery;
use super::upgrade::run_batch;
use crate::manager_kind::ManagerKind;
use crate::message::Message;
use crate::state::{LogEntry, LogLevel};
use crate::test_support::{MockManager, package};

const KIND: ManagerKind = ManagerKind::Npm;

fn app_with(manager: MockManager) -> Updatery {
    Updatery::with_managers([(KIND, Box::new(manager) as Box<dyn PackageManager>)], true)
}

fn texts(entries: &[LogEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.text.as_str()).collect()
}

fn ids(app: &Updatery) -> Vec<&str> {
    app.packages(KIND)
        .iter()
        .map(|package| package.package_id.as_str())
        .collect()
}

fn app_with_listed(ids: &[&str]) -> Updatery {
    let mut app = app_with(MockManager::default());
    app.panels
        .get_mut(&KIND)
        .expect("panel should exist")
        .set_packages(ids.iter().map(|id| package(id)).collect());
    app
}

fn begin_upgrade(app: &mut Updatery) -> u64 {
    app.panels
        .get_mut(&KIND)
        .expect("panel should exist")
        .upgrade
        .begin()
}

#[test]
fn stale_scan_result_is_discarded() {
    let mut app = app_with(MockManager::default());
    let panel = app.panels.get_mut(&KIND).expect("panel should exist");
    let stale = panel.scan.begin();
    let current = panel.scan.begin();

    app.update(Message::ScanCompleted {
        manager: KIND,
        request_seq: stale,
        packages: vec![package("old")],
    });

    assert!(app.packages(KIND).is_empty());
    assert!(app.is_busy());

    app.update(Message::ScanCompleted {
        manager: KIND,
        request_seq: current,
        packages: vec![package("new")],
    });

    assert_eq!(ids(&app), ["new"]);
    assert!(!app.is_busy());
    assert_eq!(
        texts(&app.drain_log(KIND)),
        ["Found 1 mock package(s) with updates."]
    );
}

#[test]
fn stale_upgrade_messages_are_discarded() {
    let mut app = app_with_listed(&["a"]);
    app.select(KIND, "a");
    let stale = begin_upgrade(&mut app);
    let current = begin_upgrade(&mut app);

    app.update(Message::UpgradeFinished {
        manager: KIND,
        request_seq: stale,
        package_id: "a".to_string(),
        result: Ok(UpgradeOutcome {
            exit_code: 0,
            output: String::new(),
        }),
    });
    app.update(Message::BatchCompleted {
        manager: KIND,
        request_seq: stale,
    });

    assert_eq!(ids(&app), ["a"]);
    assert!(app.drain_log(KIND).is_empty());
    assert!(app.is_busy());

    app.update(Message::BatchCompleted {
        manager: KIND,
        request_seq: current,
    });
    assert!(!app.is_busy());
}

#[test]
fn successful_upgrade_removes_record_and_selection() {
    let mut app = app_with_listed(&["a", "b"]);
    app.select(KIND, "a");
    app.select(KIND, "b");
    let request_seq = begin_upgrade(&mut app);

    app.update(Message::UpgradeFinished {
        manager: KIND,
        request_seq,
        package_id: "a".to_string(),
        result: Ok(UpgradeOutcome {
            exit_code: 0,
            output: "done".to_string(),
        }),
    });

    assert_eq!(ids(&app), ["b"]);
    assert_eq!(app.selection(KIND), ["b"]);
    assert_eq!(texts(&app.drain_log(KIND)), ["Successfully upgraded a"]);
}

#[test]
fn failed_upgrade_reports_translated_code_and_keeps_record() {
    let mut app = app_with_listed(&["a"]);
    app.select(KIND, "a");
    let request_seq = begin_upgrade(&mut app);

    app.update(Message::UpgradeFinished {
        manager: KIND,
        request_seq,
        package_id: "a".to_string(),
        result: Ok(UpgradeOutcome {
            exit_code: 5,
            output: String::new(),
        }),
    });

    assert_eq!(ids(&app), ["a"]);
    assert_eq!(app.selection(KIND), ["a"]);
    let log = app.drain_log(KIND);
    assert_eq!(texts(&log), ["a: mock code 5"]);
    assert_eq!(log[0].level, LogLevel::Error);
}

#[test]
fn spawn_failure_is_reported_against_the_id() {
    let mut app = app_with_listed(&["a"]);
    let request_seq = begin_upgrade(&mut app);

    app.update(Message::UpgradeFinished {
        manager: KIND,
        request_seq,
        package_id: "a".to_string(),
        result: Err(BackendError::Spawn {
            program: "npm".to_string(),
            details: "No such file or directory".to_string(),
        }),
    });

    assert_eq!(ids(&app), ["a"]);
    assert_eq!(
        texts(&app.drain_log(KIND)),
        ["Error upgrading a: Failed to start npm: No such file or directory"]
    );
}

#[test]
fn blank_output_lines_are_not_logged() {
    let mut app = app_with_listed(&["a"]);
    let request_seq = begin_upgrade(&mut app);

    for line in ["  ", "progress 50%", ""] {
        app.update(Message::UpgradeOutput {
            manager: KIND,
            request_seq,
            package_id: "a".to_string(),
            line: line.to_string(),
        });
    }

    let log = app.drain_log(KIND);
    assert_eq!(texts(&log), ["progress 50%"]);
    assert_eq!(log[0].level, LogLevel::Output);
}

#[test]
fn selection_keeps_order_and_rejects_unlisted_ids() {
    let mut app = app_with_listed(&["a", "b", "c"]);

    assert!(app.select(KIND, "c"));
    assert!(app.select(KIND, "a"));
    assert!(!app.select(KIND, "a"));
    assert!(!app.select(KIND, "zzz"));
    assert_eq!(app.selection(KIND), ["c", "a"]);

    let panel = app.panels.get_mut(&KIND).expect("panel should exist");
    assert!(panel.deselect("c"));
    assert_eq!(app.selection(KIND), ["a"]);

    app.select_all(KIND);
    assert_eq!(app.selection(KIND), ["a", "b", "c"]);
}

#[test]
fn select_all_collapses_duplicate_ids() {
    let mut app = app_with_listed(&["a", "a", "b"]);

    app.select_all(KIND);

    assert_eq!(ids(&app), ["a", "a", "b"]);
    assert_eq!(app.selection(KIND), ["a", "b"]);
}

#[test]
fn upgrade_without_selection_logs_and_starts_nothing() {
    let mut app = app_with_listed(&["a"]);

    app.upgrade_selected(KIND);

    assert!(!app.is_busy());
    assert_eq!(texts(&app.drain_log(KIND)), ["No packages selected."]);
}

#[test]
fn not_installed_manager_starts_nothing() {
    let mut app = app_with(MockManager {
        installed: false,
        ..MockManager::with_packages(&["a"])
    });

    app.refresh(KIND);
    app.select_all(KIND);
    app.upgrade_selected(KIND);

    assert!(!app.is_busy());
    assert_eq!(
        texts(&app.drain_log(KIND)),
        ["mock is not installed.", "mock is not installed."]
    );
}

#[test]
fn elevation_warning_only_when_needed() {
    let elevated_required = MockManager {
        requires_elevation: true,
        ..MockManager::default()
    };

    let mut unelevated = Updatery::with_managers(
        [(KIND, Box::new(elevated_required.clone()) as Box<dyn PackageManager>)],
        false,
    );
    let log = unelevated.drain_log(KIND);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].level, LogLevel::Warning);
    assert!(log[0].text.starts_with("Warning: Not running as admin."));

    let mut elevated = Updatery::with_managers(
        [(KIND, Box::new(elevated_required) as Box<dyn PackageManager>)],
        true,
    );
    assert!(elevated.drain_log(KIND).is_empty());

    let mut missing = Updatery::with_managers(
        [(
            KIND,
            Box::new(MockManager {
                installed: false,
                requires_elevation: true,
                ..MockManager::default()
            }) as Box<dyn PackageManager>,
        )],
        false,
    );
    assert!(missing.drain_log(KIND).is_empty());
}

#[test]
fn unknown_manager_is_ignored() {
    let mut app = app_with(MockManager::default());

    app.refresh(ManagerKind::Winget);
    app.update(Message::BatchCompleted {
        manager: ManagerKind::Winget,
        request_seq: 1,
    });

    assert!(app.packages(ManagerKind::Winget).is_empty());
    assert!(app.drain_log(ManagerKind::Winget).is_empty());
    assert!(!app.is_busy());
}

#[tokio::test]
async fn refresh_populates_packages() {
    let mut app = app_with(MockManager::with_packages(&["a", "b"]));
    let mut log = Vec::new();

    app.refresh(KIND);
    app.run_until_idle(|_, entries| log.extend(entries)).await;

    assert_eq!(ids(&app), ["a", "b"]);
    assert_eq!(
        texts(&log),
        [
            "Scanning for mock updates...",
            "Found 2 mock package(s) with updates."
        ]
    );
}

#[tokio::test]
async fn second_refresh_supersedes_first() {
    let mut app = app_with(MockManager {
        scan_delay: Duration::from_millis(100),
        ..MockManager::with_packages(&["a"])
    });
    let mut log = Vec::new();

    app.refresh(KIND);
    app.refresh(KIND);
    app.run_until_idle(|_, entries| log.extend(entries)).await;

    let found = texts(&log)
        .into_iter()
        .filter(|text| text.starts_with("Found"))
        .count();
    assert_eq!(found, 1);
    assert_eq!(ids(&app), ["a"]);
}

#[cfg(unix)]
#[tokio::test]
async fn batch_of_three_runs_in_strict_order() {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let manager: Box<dyn PackageManager> = Box::new(MockManager::default());
    let ids = vec!["a".to_string(), "b".to_string(), "c".to_string()];

    run_batch(manager, KIND, 7, ids, sender).await;

    let mut events = Vec::new();
    while let Some(message) = receiver.recv().await {
        assert_eq!(message.request_seq(), 7);
        events.push(match message {
            Message::UpgradeStarted { package_id, .. } => format!("start {package_id}"),
            Message::UpgradeOutput { line, .. } => format!("line {line}"),
            Message::UpgradeFinished {
                package_id, result, ..
            } => {
                let outcome = result.expect("mock upgrade should spawn");
                format!("finish {package_id} {}", outcome.exit_code)
            }
            Message::BatchCompleted { .. } => "batch done".to_string(),
            Message::ScanCompleted { .. } => "unexpected scan".to_string(),
        });
    }

    assert_eq!(
        events,
        [
            "start a",
            "line upgrading a",
            "finish a 0",
            "start b",
            "line upgrading b",
            "finish b 0",
            "start c",
            "line upgrading c",
            "finish c 0",
            "batch done",
        ]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn batch_continues_past_failures() {
    let mut app = app_with(MockManager {
        script: r#"echo "upgrading $1"; [ "$1" != "b" ] || exit 3"#.to_string(),
        ..MockManager::with_packages(&["a", "b", "c"])
    });
    let mut log = Vec::new();

    app.refresh(KIND);
    app.run_until_idle(|_, entries| log.extend(entries)).await;
    app.select_all(KIND);
    app.upgrade_selected(KIND);
    app.run_until_idle(|_, entries| log.extend(entries)).await;

    assert_eq!(ids(&app), ["b"]);
    assert_eq!(app.selection(KIND), ["b"]);
    assert_eq!(
        &texts(&log)[2..],
        [
            "Upgrading 3 mock package(s)...",
            ">>> mock upgrade a",
            "upgrading a",
            "Successfully upgraded a",
            ">>> mock upgrade b",
            "upgrading b",
            "b: mock code 3",
            ">>> mock upgrade c",
            "upgrading c",
            "Successfully upgraded c",
            "All upgrades complete.",
        ]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn superseded_batch_lets_running_upgrade_finish() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let marker = dir.path().join("finished");
    let mut app = app_with(MockManager {
        script: format!(
            "echo start; sleep 1; echo still-running; echo more; echo \"$1\" >> '{}'",
            marker.display()
        ),
        ..MockManager::with_packages(&["a"])
    });
    let mut log = Vec::new();

    app.refresh(KIND);
    app.run_until_idle(|_, entries| log.extend(entries)).await;
    assert!(app.select(KIND, "a"));
    app.upgrade_selected(KIND);
    tokio::time::sleep(Duration::from_millis(300)).await;
    app.upgrade_selected(KIND);
    app.run_until_idle(|_, entries| log.extend(entries)).await;

    let mut finished = 0;
    for _ in 0..50 {
        finished = std::fs::read_to_string(&marker).map_or(0, |text| text.lines().count());
        if finished == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert_eq!(finished, 2, "both upgrade runs should reach the end");
    assert!(ids(&app).is_empty());
    let completions = texts(&log)
        .into_iter()
        .filter(|text| *text == "All upgrades complete.")
        .count();
    assert_eq!(completions, 1);
}
