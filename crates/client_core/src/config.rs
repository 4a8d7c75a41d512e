use std::{fs, path::PathBuf, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "blog.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub session_file: PathBuf,
    pub refresh_after_toggle: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".into(),
            request_timeout: Duration::from_secs(10),
            session_file: PathBuf::from("./data/session.json"),
            refresh_after_toggle: true,
        }
    }
}

impl ClientSettings {
    pub fn api_url(&self) -> anyhow::Result<Url> {
        Url::parse(&self.api_base_url)
            .with_context(|| format!("invalid api_base_url '{}'", self.api_base_url))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_ms: Option<u64>,
    session_file: Option<PathBuf>,
    refresh_after_toggle: Option<bool>,
}

/// Defaults, then `blog.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(file.as_deref(), |key| std::env::var(key).ok())
}

pub(crate) fn resolve_settings(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_base_url {
                    settings.api_base_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_ms {
                    settings.request_timeout = Duration::from_millis(v);
                }
                if let Some(v) = file_cfg.session_file {
                    settings.session_file = v;
                }
                if let Some(v) = file_cfg.refresh_after_toggle {
                    settings.refresh_after_toggle = v;
                }
            }
            Err(err) => tracing::warn!("config: ignoring malformed {SETTINGS_FILE}: {err}"),
        }
    }

    if let Some(v) = env("BLOG_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout = Duration::from_millis(parsed);
        }
    }

    if let Some(v) = env("APP__SESSION_FILE") {
        settings.session_file = PathBuf::from(v);
    }

    if let Some(v) = env("APP__REFRESH_AFTER_TOGGLE") {
        match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => settings.refresh_after_toggle = true,
            "0" | "false" | "no" => settings.refresh_after_toggle = false,
            _ => {}
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
