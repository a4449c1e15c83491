use release_sync::load_config::{input_env_key, load_config, INPUT_NAMES};
use release_sync_core::config::LookupStrategy;
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn clear_input_env() {
    for name in INPUT_NAMES {
        env::remove_var(input_env_key(name));
    }
    env::remove_var("GITHUB_SHA");
}

fn inputs_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).unwrap();
    file
}

/// A YAML input map alone produces a complete request.
#[tokio::test]
#[serial]
async fn test_load_config_from_inputs_file() {
    clear_input_env();
    let file = inputs_file(
        r#"
tag_name: refs/tags/v0.4.0
release_name: refs/tags/v0.4.0
body: "First line\nSecond line"
draft: true
prerelease: false
commitish: 3f2a9c1
asset_dir_path: ./dist
lookup: tag
"#,
    );

    let config = load_config(Some(file.path()), None).expect("Config should load");

    assert_eq!(config.request.tag, "v0.4.0");
    assert_eq!(config.request.release_name.as_deref(), Some("v0.4.0"));
    assert_eq!(config.request.body.as_deref(), Some("First line\nSecond line"));
    assert!(config.request.draft);
    assert!(!config.request.prerelease);
    assert_eq!(config.request.target_commitish, "3f2a9c1");
    assert_eq!(config.request.asset_dir, Some(PathBuf::from("./dist")));
    assert_eq!(config.strategy, LookupStrategy::ByTag);
}

/// INPUT_* variables override the file; GITHUB_SHA fills in the commitish.
#[tokio::test]
#[serial]
async fn test_env_inputs_override_file_and_sha_is_default_commitish() {
    clear_input_env();
    let file = inputs_file("tag_name: v0.1.0\nasset_dir_path: ./dist\ndraft: true\n");

    env::set_var("INPUT_TAG_NAME", "refs/tags/v0.2.0");
    env::set_var("INPUT_DRAFT", "false");
    // Empty values mean "not supplied" and must not clobber the file.
    env::set_var("INPUT_ASSET_DIR_PATH", "");
    env::set_var("GITHUB_SHA", "feedface");

    let config = load_config(Some(file.path()), None).expect("Config should load");
    clear_input_env();

    assert_eq!(config.request.tag, "v0.2.0");
    assert!(!config.request.draft);
    assert_eq!(config.request.asset_dir, Some(PathBuf::from("./dist")));
    assert_eq!(config.request.target_commitish, "feedface");
    assert_eq!(config.strategy, LookupStrategy::ByDraft);
}

/// Inputs can come entirely from the environment; the command-line lookup wins.
#[tokio::test]
#[serial]
async fn test_env_only_inputs_with_lookup_override() {
    clear_input_env();
    env::set_var("INPUT_TAG_NAME", "v3.0.0");
    env::set_var("INPUT_ASSET_DIR_PATH", "artifacts");
    env::set_var("INPUT_LOOKUP", "draft");
    env::set_var("GITHUB_SHA", "abc123");

    let config = load_config(None, Some(LookupStrategy::ByTag)).expect("Config should load");
    clear_input_env();

    assert_eq!(config.request.tag, "v3.0.0");
    assert_eq!(config.strategy, LookupStrategy::ByTag);
}

#[tokio::test]
#[serial]
async fn test_missing_inputs_file_fails() {
    clear_input_env();
    let err = load_config(Some(std::path::Path::new("/nonexistent/inputs.yaml")), None)
        .expect_err("Missing file should fail");
    assert!(err.to_string().contains("Failed to read inputs file"));
}

#[tokio::test]
#[serial]
async fn test_non_scalar_input_fails() {
    clear_input_env();
    let file = inputs_file("tag_name: [v1, v2]\nasset_dir_path: ./dist\n");
    let err = load_config(Some(file.path()), None).expect_err("List input should fail");
    assert!(err.to_string().contains("tag_name"));
}

#[tokio::test]
#[serial]
async fn test_invalid_lookup_input_fails() {
    clear_input_env();
    let file = inputs_file("tag_name: v1\nasset_dir_path: ./dist\ncommitish: main\nlookup: newest\n");
    let err = load_config(Some(file.path()), None).expect_err("Unknown lookup should fail");
    assert!(err.to_string().contains("lookup"));
}
