// tests/config_loading.rs

mod common;
use crate::common::{init_tracing, TestResult};

use std::fs;
use std::time::Duration;

use tempfile::TempDir;

use flw::cli::LogLevel;
use flw::config::{load_and_validate, load_from_path, load_or_default, ConfigFile};
use flw::logging::resolve_level;
use flw::{FailurePolicy, Flw, FlwError};
use flw_test_utils::builders::{fail_with, noop, ConcurrencyProbe, ConfigFileBuilder};
use flw_test_utils::recording_runner::RecordingRunner;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("Flw.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn full_config_is_loaded_and_validated() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[flow]
failure_policy = "collect_all"

[each]
limit = 8

[log]
level = "debug"
"#,
    );

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.failure_policy, FailurePolicy::CollectAll);
    assert_eq!(cfg.each_limit, 8);
    assert_eq!(cfg.log_level, Some(LogLevel::Debug));
    Ok(())
}

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "");

    let cfg = load_and_validate(&path)?;

    assert_eq!(cfg.failure_policy, FailurePolicy::FirstError);
    assert_eq!(cfg.each_limit, 3);
    assert_eq!(cfg.log_level, None);
    Ok(())
}

#[test]
fn raw_load_skips_validation() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[each]\nlimit = 0\n");

    let raw = load_from_path(&path)?;
    assert_eq!(raw.each.limit, 0);

    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, FlwError::ConfigError(_)), "got {err:?}");
    Ok(())
}

#[test]
fn zero_each_limit_is_rejected() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[each]\nlimit = 0\n");

    match load_and_validate(&path) {
        Err(FlwError::ConfigError(msg)) => assert!(msg.contains("[each].limit")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
    Ok(())
}

#[test]
fn unknown_failure_policy_is_rejected() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[flow]\nfailure_policy = \"whatever\"\n");

    match load_and_validate(&path) {
        Err(FlwError::ConfigError(msg)) => assert!(msg.contains("failure_policy")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
    Ok(())
}

#[test]
fn unknown_log_level_is_rejected() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[log]\nlevel = \"loud\"\n");

    match load_and_validate(&path) {
        Err(FlwError::ConfigError(msg)) => assert!(msg.contains("[log].level")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    let dir = TempDir::new()?;
    let path = write_config(&dir, "[each\nlimit = ");

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, FlwError::TomlError(_)), "got {err:?}");
    Ok(())
}

#[test]
fn missing_explicit_file_is_an_io_error() -> TestResult {
    let dir = TempDir::new()?;
    let missing = dir.path().join("nope.toml");

    let err = load_or_default(Some(missing.as_path())).unwrap_err();
    assert!(matches!(err, FlwError::IoError(_)), "got {err:?}");
    Ok(())
}

#[test]
fn builder_produces_validated_config() {
    let cfg = ConfigFileBuilder::new()
        .failure_policy("all")
        .each_limit(5)
        .log_level("warning")
        .build();

    assert_eq!(cfg.failure_policy, FailurePolicy::CollectAll);
    assert_eq!(cfg.each_limit, 5);
    assert_eq!(cfg.log_level, Some(LogLevel::Warn));
}

#[test]
fn log_level_priority_is_cli_then_env_then_config() {
    use tracing::Level;

    assert_eq!(
        resolve_level(Some(LogLevel::Trace), Some("error"), Some(LogLevel::Warn)),
        Level::TRACE
    );
    assert_eq!(
        resolve_level(None, Some("error"), Some(LogLevel::Warn)),
        Level::ERROR
    );
    assert_eq!(
        resolve_level(None, Some("not-a-level"), Some(LogLevel::Warn)),
        Level::WARN
    );
    assert_eq!(resolve_level(None, None, None), Level::INFO);
}

#[tokio::test]
async fn facade_applies_configured_each_limit() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let path = write_config(&dir, "[each]\nlimit = 2\n");
    let flw = Flw::from_config_path(&path)?;
    assert_eq!(flw.each_limit(), 2);

    let probe = ConcurrencyProbe::new();
    let tracked = probe.clone();
    let results = flw
        .each(0..8u32, move |i| {
            let probe = tracked.clone();
            async move {
                probe.enter();
                tokio::time::sleep(Duration::from_millis(3)).await;
                probe.exit();
                Ok(i)
            }
        })
        .await?;

    assert_eq!(results, (0..8).collect::<Vec<_>>());
    assert_eq!(probe.max(), 2);
    Ok(())
}

#[tokio::test]
async fn facade_applies_configured_policy_and_runner() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new().failure_policy("collect_all").build();
    let runner = RecordingRunner::new();
    let flw = Flw::new(&cfg).with_runner(runner.shared());

    let result = flw
        .parallel([fail_with("one"), noop(), fail_with("two")])
        .run()
        .await;

    match result {
        Err(FlwError::Multiple { errors, total }) => {
            assert_eq!(total, 3);
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected Multiple, got {other:?}"),
    }
    assert_eq!(runner.dispatched(), 3);

    let output = flw.series([noop(), noop()]).run().await?;
    assert!(output.context().is_some());
    assert_eq!(runner.dispatched(), 5);
    Ok(())
}
