use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use chrono::Locale;
use client_core::DEFAULT_API_URL;

pub const CONFIG_FILE_NAME: &str = "tracker.toml";
const LOG_FILE_NAME: &str = "tracker.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    /// `None` means the per-user default location.
    pub store_path: Option<PathBuf>,
    pub locale: String,
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            store_path: None,
            locale: "pl_PL".into(),
            log_filter: "info".into(),
            log_file: None,
        }
    }
}

impl Settings {
    pub fn locale(&self) -> anyhow::Result<Locale> {
        parse_locale(&self.locale)
    }
}

/// Accepts `pl_PL` as well as `pl-PL`.
pub fn parse_locale(raw: &str) -> anyhow::Result<Locale> {
    let normalized = raw.trim().replace('-', "_");
    Locale::try_from(normalized.as_str()).map_err(|_| anyhow!("unknown locale '{raw}'"))
}

/// Reads `tracker.toml` from `config_dir` (if present) and the process
/// environment.
pub fn load_settings(config_dir: Option<&Path>) -> Settings {
    let file_contents = config_dir
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .and_then(|path| fs::read_to_string(path).ok());

    resolve_settings(file_contents.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then file values, then environment. Unparseable files are
/// ignored.
pub fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<HashMap<String, String>>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("api_url") {
                    settings.api_url = v.clone();
                }
                if let Some(v) = file_cfg.get("store_path") {
                    settings.store_path = Some(PathBuf::from(v));
                }
                if let Some(v) = file_cfg.get("locale") {
                    settings.locale = v.clone();
                }
                if let Some(v) = file_cfg.get("log") {
                    settings.log_filter = v.clone();
                }
                if let Some(v) = file_cfg.get("log_file") {
                    settings.log_file = Some(PathBuf::from(v));
                }
            }
            Err(err) => tracing::warn!("ignoring unreadable {CONFIG_FILE_NAME}: {err}"),
        }
    }

    if let Some(v) = env("TRACKER_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("TRACKER_STORE_PATH") {
        settings.store_path = Some(PathBuf::from(v));
    }

    if let Some(v) = env("TRACKER_LOCALE") {
        settings.locale = v;
    }

    if let Some(v) = env("TRACKER_LOG") {
        settings.log_filter = v;
    }

    settings
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub store_path: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    /// Per-user directories are only looked up for paths not given
    /// explicitly.
    pub fn resolve(settings: &Settings) -> anyhow::Result<Self> {
        let store_path = match &settings.store_path {
            Some(path) => path.clone(),
            None => storage::default_store_path().context("resolving the store location")?,
        };
        let log_file = match &settings.log_file {
            Some(path) => path.clone(),
            None => dirs::data_local_dir()
                .ok_or_else(|| anyhow!("unable to resolve local app data dir"))?
                .join(storage::APP_DIR_NAME)
                .join(LOG_FILE_NAME),
        };

        Ok(Self {
            store_path,
            log_file,
        })
    }
}
