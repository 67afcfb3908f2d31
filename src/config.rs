//! Configuration loading with env-var fallbacks.
//!
//! Reads `config/default.toml` relative to the current working directory.
//! A missing file is not an error — the API URL can come entirely from the
//! `IMGPICK_API_URL` env var. A file that exists but cannot be parsed is a
//! hard error.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;
use crate::logger;

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API template string — base URL, optionally with `{q}`/`{text}` tokens.
    pub api_url: String,
    /// TLS certificate verification. Defaults to on; opting out is explicit.
    pub verify_tls: bool,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Where the console sink persists image blobs (already expanded, no `~`).
    pub image_dir: PathBuf,
    pub log_level: String,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    plugin: RawPlugin,
}

#[derive(Deserialize)]
struct RawPlugin {
    #[serde(default)]
    api_url: Option<String>,
    /// Legacy alias for `api_url` — older configs used the shorter key.
    #[serde(default)]
    api: Option<String>,
    #[serde(default = "default_true")]
    verify_tls: bool,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
    #[serde(default = "default_image_dir")]
    image_dir: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawPlugin {
    fn default() -> Self {
        Self {
            api_url: None,
            api: None,
            verify_tls: true,
            timeout_seconds: default_timeout_seconds(),
            image_dir: default_image_dir(),
            log_level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    25
}

fn default_image_dir() -> String {
    "~/.imgpick/images".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load config from `config/default.toml`, then apply env-var fallbacks.
pub fn load() -> Result<Config, AppError> {
    let api_fallback = env::var("IMGPICK_API_URL").ok();
    let log_level_override = env::var("IMGPICK_LOG_LEVEL").ok();
    load_from(
        Path::new("config/default.toml"),
        api_fallback.as_deref(),
        log_level_override.as_deref(),
    )
}

/// Internal loader — accepts an explicit path and optional env values.
/// Tests pass these directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    api_fallback: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let parsed: RawConfig = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str(&raw)
            .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => RawConfig::default(),
        Err(e) => {
            return Err(AppError::Config(format!(
                "cannot read {}: {e}",
                path.display()
            )));
        }
    };

    let p = parsed.plugin;

    // Config wins over env: the file is the deliberate setting, the env var
    // covers unconfigured deployments.
    let api_url = p
        .api_url
        .or(p.api)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| api_fallback.map(str::to_string))
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            AppError::Config(
                "api_url is not set — set plugin.api_url in config/default.toml \
                 or the IMGPICK_API_URL env var"
                    .into(),
            )
        })?;

    let log_level = log_level_override.unwrap_or(&p.log_level).to_string();
    logger::parse_level(&log_level).map_err(|e| AppError::Config(e.to_string()))?;

    if p.timeout_seconds == 0 {
        return Err(AppError::Config("timeout_seconds must be positive".into()));
    }

    Ok(Config {
        api_url,
        verify_tls: p.verify_tls,
        timeout_seconds: p.timeout_seconds,
        image_dir: expand_home(&p.image_dir),
        log_level,
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL_TOML: &str = r#"
[plugin]
api_url = "https://img.example/api"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_basic_config() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.api_url, "https://img.example/api");
        assert!(cfg.verify_tls);
        assert_eq!(cfg.timeout_seconds, 25);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn legacy_api_key_accepted() {
        let f = write_toml("[plugin]\napi = \"https://img.example/v2\"\n");
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.api_url, "https://img.example/v2");
    }

    #[test]
    fn api_url_wins_over_legacy_alias() {
        let f = write_toml(
            "[plugin]\napi_url = \"https://new.example\"\napi = \"https://old.example\"\n",
        );
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.api_url, "https://new.example");
    }

    #[test]
    fn env_fallback_when_config_silent() {
        let f = write_toml("[plugin]\nverify_tls = false\n");
        let cfg = load_from(f.path(), Some("https://env.example"), None).unwrap();
        assert_eq!(cfg.api_url, "https://env.example");
        assert!(!cfg.verify_tls);
    }

    #[test]
    fn config_wins_over_env() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), Some("https://env.example"), None).unwrap();
        assert_eq!(cfg.api_url, "https://img.example/api");
    }

    #[test]
    fn missing_api_url_errors() {
        let f = write_toml("[plugin]\ntimeout_seconds = 5\n");
        let result = load_from(f.path(), None, None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("api_url is not set"));
    }

    #[test]
    fn empty_api_url_errors() {
        let f = write_toml("[plugin]\napi_url = \"  \"\n");
        assert!(load_from(f.path(), None, None).is_err());
    }

    #[test]
    fn missing_file_uses_env_fallback() {
        let cfg = load_from(
            Path::new("/nonexistent/imgpick.toml"),
            Some("https://env.example"),
            None,
        )
        .unwrap();
        assert_eq!(cfg.api_url, "https://env.example");
    }

    #[test]
    fn missing_file_without_env_errors() {
        assert!(load_from(Path::new("/nonexistent/imgpick.toml"), None, None).is_err());
    }

    #[test]
    fn malformed_toml_errors() {
        let f = write_toml("[plugin\napi_url = oops");
        let result = load_from(f.path(), None, None);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse error"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let f = write_toml("[plugin]\napi_url = \"https://x\"\ntimeout_seconds = 0\n");
        assert!(load_from(f.path(), None, None).is_err());
    }

    #[test]
    fn invalid_log_level_rejected() {
        let f = write_toml("[plugin]\napi_url = \"https://x\"\nlog_level = \"loud\"\n");
        assert!(load_from(f.path(), None, None).is_err());
    }

    #[test]
    fn env_log_level_override() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, Some("debug")).unwrap();
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.imgpick/images");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with(".imgpick/images"));
    }

    #[test]
    fn absolute_path_unchanged() {
        assert_eq!(expand_home("/absolute/path"), PathBuf::from("/absolute/path"));
    }
}
