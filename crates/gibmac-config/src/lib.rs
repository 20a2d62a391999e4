//! Shared configuration for gibmac.
//!
//! TOML file + `GIBMAC_` environment overrides, layered over built-in
//! defaults with figment, and translation to the core's path and source
//! types. The CLI adds flag overrides on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gibmac_core::{DEFAULT_OUTPUT_DIR, ResourceKind, ResourcePaths, ResourceSources};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Where boards.json, recovery_urls.txt and macrecovery.py are kept.
    /// Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Folder the recovery image is downloaded into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Interpreter used to run macrecovery.py.
    #[serde(default = "default_python")]
    pub python: String,

    /// HTTP timeout in seconds for resource updates.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Pause after an update before returning to the menu.
    #[serde(default = "default_auto_return")]
    pub auto_return_secs: u64,

    /// Upstream resource locations.
    #[serde(default)]
    pub sources: Sources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            output_dir: default_output_dir(),
            python: default_python(),
            timeout: default_timeout(),
            auto_return_secs: default_auto_return(),
            sources: Sources::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Sources {
    #[serde(default = "default_boards_url")]
    pub boards_url: String,

    #[serde(default = "default_macrecovery_url")]
    pub macrecovery_url: String,

    #[serde(default = "default_recovery_urls_url")]
    pub recovery_urls_url: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            boards_url: default_boards_url(),
            macrecovery_url: default_macrecovery_url(),
            recovery_urls_url: default_recovery_urls_url(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}
fn default_python() -> String {
    if cfg!(windows) { "python" } else { "python3" }.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_auto_return() -> u64 {
    5
}
fn default_boards_url() -> String {
    ResourceKind::Boards.default_url()
}
fn default_macrecovery_url() -> String {
    ResourceKind::Macrecovery.default_url()
}
fn default_recovery_urls_url() -> String {
    ResourceKind::RecoveryUrls.default_url()
}

impl Config {
    /// The configured data directory, or the platform default.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    pub fn resource_paths(&self) -> ResourcePaths {
        ResourcePaths::new(self.data_dir())
    }

    /// Parse the configured source URLs.
    pub fn resource_sources(&self) -> Result<ResourceSources, ConfigError> {
        Ok(ResourceSources {
            boards: parse_url("sources.boards_url", &self.sources.boards_url)?,
            macrecovery: parse_url("sources.macrecovery_url", &self.sources.macrecovery_url)?,
            recovery_urls: parse_url(
                "sources.recovery_urls_url",
                &self.sources.recovery_urls_url,
            )?,
        })
    }
}

fn parse_url(field: &str, raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "gibmac", "gibmac")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory for the downloaded resources.
pub fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("gibmac");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment. A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("GIBMAC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("com.apple.recovery.boot"));
        assert_eq!(cfg.timeout, 30);
        assert_eq!(cfg.sources, Sources::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/srv/gibmac"
python = "/usr/bin/python3.12"

[sources]
boards_url = "http://mirror.local/boards.json"
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.data_dir(), PathBuf::from("/srv/gibmac"));
        assert_eq!(cfg.python, "/usr/bin/python3.12");
        assert_eq!(cfg.sources.boards_url, "http://mirror.local/boards.json");
        assert_eq!(cfg.sources.recovery_urls_url, default_recovery_urls_url());
        assert_eq!(
            cfg.resource_paths().path_for(ResourceKind::Boards),
            PathBuf::from("/srv/gibmac/boards.json")
        );
    }

    #[test]
    fn bad_source_url_is_rejected() {
        let cfg = Config {
            sources: Sources {
                macrecovery_url: "not a url".into(),
                ..Sources::default()
            },
            ..Config::default()
        };
        let err = cfg.resource_sources().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation { ref field, .. } if field == "sources.macrecovery_url")
        );
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            data_dir: Some(dir.path().join("data")),
            auto_return_secs: 0,
            ..Config::default()
        };
        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }
}
