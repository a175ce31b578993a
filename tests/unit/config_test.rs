//! Tests for configuration loading.

use std::time::Duration;
use tempfile::TempDir;
use ward::types::config::ConfigFile;

#[test]
fn test_load_full_file() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");
    std::fs::create_dir(&workspace).unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "workspace_root = {:?}\nallowed_commands = [\"ls\", \"echo\"]\n\
             check_path_arguments = true\ntimeout_seconds = 9\nmax_output_chars = 120\n",
            workspace.display().to_string()
        ),
    )
    .unwrap();

    let config = ConfigFile::load(&path)
        .unwrap()
        .into_workspace_config(None, temp_dir.path())
        .unwrap();
    assert_eq!(config.root(), workspace.canonicalize().unwrap());
    assert!(config.is_allowed("echo"));
    assert!(!config.is_allowed("cat"));
    assert!(config.check_path_arguments());
    assert_eq!(config.default_timeout(), Duration::from_secs(9));
    assert_eq!(config.default_max_output_chars(), 120);
}
