use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

fn temp_settings_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("projector-config-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(SETTINGS_FILE);
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn missing_file_gives_defaults() {
    let settings = load_settings_with(Path::new("/nonexistent/projector.toml"), no_env);
    assert_eq!(settings, ClientSettings::default());
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        "file",
        r#"
service_url = "https://projector.example.org"
trial_run = true
bearer_token = "from-file"
output_dir = "/tmp/reports"
"#,
    );
    let settings = load_settings_with(&path, no_env);
    assert_eq!(settings.service_url, "https://projector.example.org");
    assert!(settings.trial_run);
    assert_eq!(settings.bearer_token.as_deref(), Some("from-file"));
    assert_eq!(settings.output_dir, PathBuf::from("/tmp/reports"));
}

#[test]
fn environment_wins_over_file() {
    let path = temp_settings_file(
        "env",
        "service_url = \"https://file.example.org\"\ntrial_run = \"yes\"\n",
    );
    let env = |key: &str| match key {
        "PROJECTOR_SERVICE_URL" => Some("https://legacy.example.org".to_string()),
        "APP__SERVICE_URL" => Some("https://env.example.org".to_string()),
        "APP__TRIAL_RUN" => Some("false".to_string()),
        "APP__BEARER_TOKEN" => Some("  ".to_string()),
        _ => None,
    };
    let settings = load_settings_with(&path, env);
    assert_eq!(settings.service_url, "https://env.example.org");
    assert!(!settings.trial_run);
    assert_eq!(settings.bearer_token, None);
}

#[test]
fn unparsable_flag_is_ignored() {
    let env = |key: &str| (key == "APP__TRIAL_RUN").then(|| "maybe".to_string());
    let settings = load_settings_with(Path::new("/nonexistent/projector.toml"), env);
    assert!(!settings.trial_run);
}

#[test]
fn service_url_is_normalized() {
    assert_eq!(
        normalize_service_url("  https://projector.example.org/// ").expect("url"),
        "https://projector.example.org"
    );
    assert_eq!(
        normalize_service_url("http://127.0.0.1:8080").expect("url"),
        "http://127.0.0.1:8080"
    );
}

#[test]
fn unsupported_service_urls_are_rejected() {
    assert!(normalize_service_url("").is_err());
    assert!(normalize_service_url("not a url").is_err());
    assert!(normalize_service_url("ftp://projector.example.org").is_err());
}
