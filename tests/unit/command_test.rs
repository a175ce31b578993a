//! Tests for command gating and output shaping.

use std::time::Duration;
use tempfile::TempDir;
use ward::error::WardError;
use ward::tools::CommandGate;
use ward::types::config::WorkspaceConfig;

fn gate(temp_dir: &TempDir) -> CommandGate {
    CommandGate::new(&WorkspaceConfig::new(temp_dir.path()).unwrap())
}

#[test]
fn test_custom_allow_list_replaces_default() {
    let temp_dir = TempDir::new().unwrap();
    let config = WorkspaceConfig::new(temp_dir.path())
        .unwrap()
        .with_allowed_commands(["echo"]);
    let gate = CommandGate::new(&config);

    assert!(gate.prepare("echo hi").is_ok());
    let err = gate.prepare("ls").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Command 'ls' is not allowed. Valid options: echo."
    );
}

#[test]
fn test_program_path_is_not_the_program_name() {
    let temp_dir = TempDir::new().unwrap();
    let err = gate(&temp_dir).prepare("/bin/ls").unwrap_err();
    assert!(matches!(err, WardError::CommandNotAllowed { .. }));
}

#[tokio::test]
async fn test_working_dir_is_root() {
    let temp_dir = TempDir::new().unwrap();
    assert_eq!(
        gate(&temp_dir).working_dir(),
        temp_dir.path().canonicalize().unwrap()
    );
}

#[tokio::test]
async fn test_stdout_and_stderr_sections() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("here.txt"), "present\n").unwrap();

    let result = gate(&temp_dir)
        .run("cat here.txt gone.txt", Duration::from_secs(5), 4000)
        .await
        .unwrap();
    assert!(result.output.starts_with("present\n[stderr]\n"));
    assert!(!result.success());
}

#[tokio::test]
async fn test_overflowing_pipe_is_drained() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("big.txt"), "y".repeat(1_000_000)).unwrap();

    let result = gate(&temp_dir)
        .run("cat big.txt", Duration::from_secs(10), 10)
        .await
        .unwrap();
    assert_eq!(result.output, "yyyyyyy...");
    assert!(result.truncated);
    assert_eq!(result.exit_code, Some(0));
}

#[tokio::test]
async fn test_zero_budget_output() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("f.txt"), "abc\n").unwrap();

    let result = gate(&temp_dir)
        .run("cat f.txt", Duration::from_secs(5), 0)
        .await
        .unwrap();
    assert_eq!(result.output, "");
    assert_eq!(result.render(), "\n(exit code 0)");
}

/// Pids whose command line has `needle` as one of its arguments.
#[cfg(target_os = "linux")]
fn pids_with_argument(needle: &str) -> Vec<u32> {
    let Ok(entries) = std::fs::read_dir("/proc") else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let pid: u32 = entry.file_name().to_str()?.parse().ok()?;
            let raw = std::fs::read(entry.path().join("cmdline")).ok()?;
            raw.split(|b| *b == 0)
                .any(|arg| arg == needle.as_bytes())
                .then_some(pid)
        })
        .collect()
}

/// A timed-out child is killed and reaped: its `/proc` entry, which a
/// zombie would keep, is gone once the error is returned.
#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_timeout_kills_and_reaps_child() {
    let temp_dir = TempDir::new().unwrap();
    let config = WorkspaceConfig::new(temp_dir.path())
        .unwrap()
        .with_allowed_commands(["sleep"]);
    let gate = CommandGate::new(&config);

    // Fractional seconds make the argument unique to this test.
    let marker = "41.375";
    let run = tokio::spawn(async move {
        gate.run(&format!("sleep {marker}"), Duration::from_millis(1500), 100)
            .await
    });

    let mut pids = Vec::new();
    for _ in 0..50 {
        pids = pids_with_argument(marker);
        if !pids.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(!pids.is_empty(), "sleep {marker} never started");

    let err = run.await.unwrap().unwrap_err();
    assert_eq!(err.to_string(), "Command timed out after 1.500s.");
    assert!(err.is_retryable());

    for pid in pids {
        assert!(
            !std::path::Path::new(&format!("/proc/{pid}")).exists(),
            "process {pid} outlived the timeout"
        );
    }
    assert!(pids_with_argument(marker).is_empty());
}
