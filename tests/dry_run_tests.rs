//! Dry-run behavior of the production runner and steps.
//!
//! Lives in its own test binary because the dry-run flag is process-global;
//! tests serialize on a lock so the flag never changes under a running test.

use siteup::config::ProvisionConfig;
use siteup::runner::{disable_dry_run, enable_dry_run, is_dry_run, CommandRunner, SystemRunner};
use siteup::steps::{run_step, Step};
use std::fs;
use std::sync::Mutex;

static DRY_RUN_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn dry_run_skips_execution_but_reports_success() {
    let _guard = DRY_RUN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    enable_dry_run();
    assert!(is_dry_run());

    let runner = SystemRunner::new();
    // Would fail if actually spawned.
    let output = runner
        .run("this_binary_definitely_does_not_exist_12345", &["--flag"])
        .unwrap();

    assert!(output.success);
    assert!(output.dry_run);
    assert_eq!(output.exit_code, Some(0));

    disable_dry_run();
    assert!(!is_dry_run());
}

#[test]
fn dry_run_virtualenv_does_not_touch_the_filesystem() {
    let _guard = DRY_RUN_LOCK.lock().unwrap_or_else(|e| e.into_inner());

    // A base directory that cannot be created: its parent is a regular file.
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let mut config = ProvisionConfig::default();
    config.project_name = "shopapp".to_string();
    config.service_name = "shopapp".to_string();
    config.base_dir = blocker.join("srv");
    config.staging_dir = dir.path().to_path_buf();
    config.log_file = dir.path().join("siteup.log");

    enable_dry_run();
    let result = run_step(Step::Virtualenv, &config, &SystemRunner::new());
    disable_dry_run();

    result.unwrap();
    assert!(!config.base_dir.exists());
    assert!(!config.project_dir().exists());
}
