// tests/config_test.rs
use serial_test::serial;
use sqlbundle::config::{load_config, parse_config, Config, CONFIG_FILE_NAME};
use sqlbundle::resolver::HistoryMode;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_default_values() {
    let config = Config::default();
    assert_eq!(config.code_pattern, "*.sql");
    assert_eq!(config.releases_relpath, "releases");
    assert_eq!(config.release_type, "gplan-cas");
    assert_eq!(config.tag_template, "{timestamp}");
    assert_eq!(config.history, HistoryMode::Linear);
    assert!(config.databases.is_empty());
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
code_pattern = "*/tdi/sql/*.sql"
release_type = "tdi"
tag_template = "v2.4-{timestamp}"
history = "first-parent"

[databases."svr09/tdi"]
bundle = "v2.3-20260101-093000-1a2b3c4d-5e6f7a8b"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let repo_dir = TempDir::new().unwrap();
    let config = load_config(Some(temp_file.path().to_str().unwrap()), repo_dir.path()).unwrap();

    assert_eq!(config.code_pattern, "*/tdi/sql/*.sql");
    assert_eq!(config.release_type, "tdi");
    assert_eq!(config.tag_template, "v2.4-{timestamp}");
    assert_eq!(config.history, HistoryMode::FirstParent);
    assert_eq!(config.releases_relpath, "releases");
    assert_eq!(
        config.databases.get("svr09/tdi").map(|r| r.bundle.as_str()),
        Some("v2.3-20260101-093000-1a2b3c4d-5e6f7a8b")
    );
}

#[test]
fn test_repository_config_is_found() {
    let repo_dir = TempDir::new().unwrap();
    fs::write(
        repo_dir.path().join(CONFIG_FILE_NAME),
        "releases_relpath = \"deploy/releases\"\n",
    )
    .unwrap();

    let config = load_config(None, repo_dir.path()).unwrap();
    assert_eq!(config.releases_relpath, "deploy/releases");
    assert_eq!(config.code_pattern, "*.sql");
}

#[test]
fn test_explicit_path_wins_over_repository_config() {
    let repo_dir = TempDir::new().unwrap();
    fs::write(
        repo_dir.path().join(CONFIG_FILE_NAME),
        "release_type = \"from-repo\"\n",
    )
    .unwrap();

    let mut explicit = NamedTempFile::new().unwrap();
    explicit
        .write_all(b"release_type = \"from-flag\"\n")
        .unwrap();
    explicit.flush().unwrap();

    let config = load_config(Some(explicit.path().to_str().unwrap()), repo_dir.path()).unwrap();
    assert_eq!(config.release_type, "from-flag");
}

#[test]
fn test_missing_explicit_path_is_an_error() {
    let repo_dir = TempDir::new().unwrap();
    let err = load_config(Some("/nonexistent/sqlbundle.toml"), repo_dir.path()).unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("/nonexistent/sqlbundle.toml"));
}

#[test]
fn test_invalid_toml_names_the_file() {
    let repo_dir = TempDir::new().unwrap();
    let path = repo_dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "code_pattern = [unclosed").unwrap();

    let err = load_config(None, repo_dir.path()).unwrap_err();
    assert!(err.to_string().contains(CONFIG_FILE_NAME));
}

#[test]
fn test_partial_config_keeps_defaults() {
    let config = parse_config("code_pattern = \"db/*.sql\"").unwrap();
    assert_eq!(config.code_pattern, "db/*.sql");
    assert_eq!(config.release_type, "gplan-cas");
    assert_eq!(config.tag_template, "{timestamp}");
}

#[cfg(target_os = "linux")]
#[test]
#[serial]
fn test_user_config_directory_fallback() {
    let repo_dir = TempDir::new().unwrap();
    let config_home = TempDir::new().unwrap();
    fs::write(
        config_home.path().join(format!(".{}", CONFIG_FILE_NAME)),
        "release_type = \"from-user\"\n",
    )
    .unwrap();

    let previous = std::env::var_os("XDG_CONFIG_HOME");
    std::env::set_var("XDG_CONFIG_HOME", config_home.path());
    let result = load_config(None, repo_dir.path());
    match previous {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(result.unwrap().release_type, "from-user");
}
