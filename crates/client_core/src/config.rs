use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "projector.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub service_url: String,
    pub trial_run: bool,
    pub bearer_token: Option<String>,
    pub output_dir: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            service_url: "http://127.0.0.1:8080".into(),
            trial_run: false,
            bearer_token: None,
            output_dir: PathBuf::from("./output"),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> ClientSettings {
    load_settings_with(path, |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file at `path`, then `env`. Later sources win.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            if let Some(v) = file_cfg.get("service_url").and_then(toml::Value::as_str) {
                settings.service_url = v.to_string();
            }
            match file_cfg.get("trial_run") {
                Some(toml::Value::Boolean(v)) => settings.trial_run = *v,
                Some(toml::Value::String(v)) => {
                    if let Some(parsed) = parse_flag(v) {
                        settings.trial_run = parsed;
                    }
                }
                _ => {}
            }
            if let Some(v) = file_cfg.get("bearer_token").and_then(toml::Value::as_str) {
                settings.bearer_token = Some(v.to_string());
            }
            if let Some(v) = file_cfg.get("output_dir").and_then(toml::Value::as_str) {
                settings.output_dir = PathBuf::from(v);
            }
        }
    }

    if let Some(v) = env("PROJECTOR_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = env("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Some(v) = env("APP__TRIAL_RUN") {
        if let Some(parsed) = parse_flag(&v) {
            settings.trial_run = parsed;
        }
    }

    if let Some(v) = env("APP__BEARER_TOKEN") {
        settings.bearer_token = (!v.trim().is_empty()).then_some(v);
    }

    if let Some(v) = env("APP__OUTPUT_DIR") {
        settings.output_dir = PathBuf::from(v);
    }

    settings
}

/// Trims the URL and drops trailing slashes. Only http and https are accepted.
pub fn normalize_service_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        bail!("service url is empty");
    }
    let parsed = Url::parse(trimmed).with_context(|| format!("invalid service url '{trimmed}'"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => bail!("unsupported service url scheme '{other}'"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
