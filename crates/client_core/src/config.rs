use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use tracing::warn;

use crate::{
    credentials::{
        CookieJarCredentials, CredentialProvider, StaticCredentials, DEFAULT_TOKEN_COOKIE,
    },
    page::{PageOptions, SUCCESS_BANNER_DURATION},
};

pub const DEFAULT_API_BASE_URL: &str = "https://backend-si-mbkm.vercel.app/api";
pub const SETTINGS_FILE: &str = "mbkm.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub cookie_jar: Option<PathBuf>,
    pub token_cookie: String,
    pub success_banner_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            cookie_jar: default_cookie_jar(),
            token_cookie: DEFAULT_TOKEN_COOKIE.into(),
            success_banner_ms: SUCCESS_BANNER_DURATION.as_millis() as u64,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    cookie_jar: Option<PathBuf>,
    token_cookie: Option<String>,
    success_banner_ms: Option<u64>,
}

impl Settings {
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            success_banner: Duration::from_millis(self.success_banner_ms),
        }
    }

    /// Credential source backed by the configured cookie jar. Without a jar no token is ever found.
    pub fn credentials(&self) -> Arc<dyn CredentialProvider> {
        match &self.cookie_jar {
            Some(path) => Arc::new(CookieJarCredentials::new(path, &self.token_cookie)),
            None => Arc::new(StaticCredentials::none()),
        }
    }
}

fn default_cookie_jar() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mbkm").join("cookies.txt"))
}

/// Defaults, then `mbkm.toml` in the working directory, then environment overrides.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if Path::new(SETTINGS_FILE).exists() {
        match load_settings_file(Path::new(SETTINGS_FILE)) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => warn!("ignoring {SETTINGS_FILE}: {err:#}"),
        }
    }

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    apply_file_settings(&mut settings, load_settings_file(path)?);
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn load_settings_file(path: &Path) -> anyhow::Result<FileSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str::<FileSettings>(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

fn apply_file_settings(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.cookie_jar {
        settings.cookie_jar = Some(v);
    }
    if let Some(v) = file_cfg.token_cookie {
        settings.token_cookie = v;
    }
    if let Some(v) = file_cfg.success_banner_ms {
        settings.success_banner_ms = v;
    }
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let read = |names: &[&str]| {
        names
            .iter()
            .filter_map(|name| lookup(name))
            .filter(|value| !value.trim().is_empty())
            .last()
    };

    if let Some(v) = read(&["MBKM_API_BASE_URL", "APP__API_BASE_URL"]) {
        settings.api_base_url = v;
    }
    if let Some(v) = read(&["MBKM_COOKIE_JAR", "APP__COOKIE_JAR"]) {
        settings.cookie_jar = Some(PathBuf::from(v));
    }
    if let Some(v) = read(&["MBKM_TOKEN_COOKIE", "APP__TOKEN_COOKIE"]) {
        settings.token_cookie = v;
    }
    if let Some(v) = read(&["APP__SUCCESS_BANNER_MS"]) {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.success_banner_ms = parsed,
            Err(err) => warn!("ignoring APP__SUCCESS_BANNER_MS={v}: {err}"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
