//! Settings loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `PREPCONF_LOG_LEVEL` and `PREPCONF_MODE` env overrides.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    boot::{BootParams, DeploymentMode, Mode},
    cipher::{PubKey, SecKey},
    error::AppError,
    prepare::Config,
};

/// Fully-resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_level: String,
    pub paths: Config,
    pub boot: BootParams,
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize)]
struct RawSettings {
    #[serde(default)]
    prepconf: RawPrepconf,
    boot: RawBoot,
}

/// Absent paths fall back to [`Config::default`].
#[derive(Deserialize)]
struct RawPrepconf {
    #[serde(default = "default_log_level")]
    log_level: String,
    visor_conf: Option<String>,
    hypervisor_conf: Option<String>,
    tls_cert: Option<String>,
    tls_key: Option<String>,
}

impl Default for RawPrepconf {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            visor_conf: None,
            hypervisor_conf: None,
            tls_cert: None,
            tls_key: None,
        }
    }
}

#[derive(Deserialize)]
struct RawBoot {
    /// `"hypervisor"` or `"visor"`.
    mode: String,
    /// Hex seed; empty or absent means "generate".
    #[serde(default)]
    local_sk: String,
    #[serde(default)]
    hypervisor_pks: Vec<String>,
    #[serde(default)]
    skysocks_passcode: String,
}

fn default_log_level() -> String { "info".to_string() }

fn resolve_path(raw: Option<&str>, fallback: PathBuf) -> PathBuf {
    raw.map(expand_home).unwrap_or(fallback)
}

/// Load settings from `config/default.toml`, then apply env-var overrides.
pub fn load() -> Result<Settings, AppError> {
    let log_level_override = env::var("PREPCONF_LOG_LEVEL").ok();
    let mode_override = env::var("PREPCONF_MODE").ok();
    load_from(
        Path::new("config/default.toml"),
        log_level_override.as_deref(),
        mode_override.as_deref(),
    )
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    log_level_override: Option<&str>,
    mode_override: Option<&str>,
) -> Result<Settings, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawSettings = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    let p = parsed.prepconf;
    let b = parsed.boot;
    let defaults = Config::default();

    let mode: DeploymentMode = mode_override.unwrap_or(&b.mode).parse()?;
    let local_sk = SecKey::from_hex(b.local_sk.trim())?;
    let hypervisor_pks = b
        .hypervisor_pks
        .iter()
        .map(|s| PubKey::from_hex(s.trim()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Settings {
        log_level: log_level_override.unwrap_or(&p.log_level).to_string(),
        paths: Config {
            visor_conf: resolve_path(p.visor_conf.as_deref(), defaults.visor_conf),
            hypervisor_conf: resolve_path(p.hypervisor_conf.as_deref(), defaults.hypervisor_conf),
            tls_cert: resolve_path(p.tls_cert.as_deref(), defaults.tls_cert),
            tls_key: resolve_path(p.tls_key.as_deref(), defaults.tls_key),
        },
        boot: BootParams {
            mode: Mode::from(mode),
            local_sk,
            hypervisor_pks,
            skysocks_passcode: b.skysocks_passcode,
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
