use std::error::Error;
use std::path::PathBuf;

use hashwatch::config::{ConfigFile, load_and_validate, load_from_path, load_or_default};
use hashwatch_test_utils::init_tracing;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("Hashwatch.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn full_config_parses_with_all_sections() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[watch]
dir = "/srv/builds"

[store]
path = "/var/lib/hashwatch/hashwatch.db"

[remote]
project = "acme/firmware"
api_url = "https://releases.example.com"
token = "sekrit"
interval_secs = 600
"#,
    );

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.watch.dir, PathBuf::from("/srv/builds"));
    assert_eq!(cfg.store.path, PathBuf::from("/var/lib/hashwatch/hashwatch.db"));

    let remote = cfg.remote.expect("remote section should be present");
    assert_eq!(remote.project, "acme/firmware");
    assert_eq!(remote.api_url, "https://releases.example.com");
    assert_eq!(remote.interval_secs, 600);
    assert_eq!(remote.interval().as_secs(), 600);

    Ok(())
}

#[test]
fn missing_sections_fall_back_to_defaults() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let path = write_config(&dir, "");

    let cfg = load_and_validate(&path)?;
    assert_eq!(cfg.watch.dir, PathBuf::from("."));
    assert_eq!(cfg.store.path, PathBuf::from("hashwatch.db"));
    assert!(cfg.remote.is_none());

    Ok(())
}

#[test]
fn remote_defaults_fill_in_api_url_and_interval() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[remote]
project = "acme/firmware"
"#,
    );

    let cfg = load_and_validate(&path)?;
    let remote = cfg.remote.expect("remote section should be present");
    assert_eq!(remote.api_url, "https://api.github.com");
    assert_eq!(remote.interval_secs, 3600);
    assert!(remote.token.is_none());

    Ok(())
}

#[test]
fn project_must_look_like_owner_name() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    for bad in ["firmware", "/firmware", "acme/", ""] {
        let path = write_config(
            &dir,
            &format!("[remote]\nproject = \"{bad}\"\n"),
        );
        let err = load_and_validate(&path).unwrap_err();
        assert!(
            err.to_string().contains("[remote].project"),
            "unexpected error for project '{bad}': {err}"
        );
    }
}

#[test]
fn zero_interval_is_rejected() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[remote]
project = "acme/firmware"
interval_secs = 0
"#,
    );

    let err = load_and_validate(&path).unwrap_err();
    assert!(err.to_string().contains("interval_secs"));
}

#[test]
fn api_url_must_be_http() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[remote]
project = "acme/firmware"
api_url = "ftp://releases.example.com"
"#,
    );

    let err = load_and_validate(&path).unwrap_err();
    assert!(err.to_string().contains("api_url"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[watch\ndir = ");

    assert!(load_from_path(&path).is_err());
}

#[test]
fn explicit_config_path_must_exist() {
    init_tracing();

    let missing = PathBuf::from("/definitely/not/here/Hashwatch.toml");
    assert!(load_or_default(Some(&missing)).is_err());
}

#[test]
fn config_token_wins_over_the_environment() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[remote]
project = "acme/firmware"
token = "from-config"
"#,
    );

    let cfg = load_and_validate(&path)?;
    let remote = cfg.remote.expect("remote section should be present");
    assert_eq!(remote.bearer_token().as_deref(), Some("from-config"));

    Ok(())
}

#[test]
fn token_falls_back_to_the_environment() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let path = write_config(
        &dir,
        r#"
[remote]
project = "acme/firmware"
"#,
    );

    let cfg = load_and_validate(&path)?;
    let remote = cfg.remote.expect("remote section should be present");

    // Scoped to this test; nothing else reads HASHWATCH_TOKEN.
    unsafe { std::env::set_var("HASHWATCH_TOKEN", "from-env") };
    let token = remote.bearer_token();
    unsafe { std::env::remove_var("HASHWATCH_TOKEN") };

    assert_eq!(token.as_deref(), Some("from-env"));
    Ok(())
}

#[test]
fn shipped_sample_config_is_valid() -> TestResult {
    init_tracing();

    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let sample = manifest_dir.join("demos/Hashwatch.toml");

    let cfg = load_and_validate(&sample)?;
    assert!(cfg.remote.is_some());

    Ok(())
}

#[test]
fn builtin_defaults_apply_without_any_file() -> TestResult {
    init_tracing();

    // Equivalent to starting in a directory with no Hashwatch.toml.
    let cfg = ConfigFile::default();
    assert_eq!(cfg.watch.dir, PathBuf::from("."));
    assert_eq!(cfg.store.path, PathBuf::from("hashwatch.db"));
    assert!(cfg.remote.is_none());

    Ok(())
}
