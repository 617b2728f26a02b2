//! Configuration profiles for synodsm.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! device-token persistence for two-step accounts, and translation to the
//! gateway's `ConnectionConfig` / `Credentials`.

mod logging;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use synodsm_api::{ConnectionConfig, Credentials, TlsMode};

pub use logging::{init_tracing, init_tracing_with, verbosity_filter};

/// Keyring service every secret is stored under.
const KEYRING_SERVICE: &str = "synodsm";

/// Environment variable checked for the password after `password_env`.
pub const PASSWORD_ENV: &str = "SYNODSM_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}'")]
    UnknownProfile { profile: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(String),

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

impl From<keyring::Error> for ConfigError {
    fn from(err: keyring::Error) -> Self {
        Self::Keyring(err.to_string())
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named NAS profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|profile| (name, profile))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_https")]
    pub https: bool,

    /// NAS certificates are usually self-signed.
    #[serde(default)]
    pub verify_ssl: bool,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_legacy_storage_compat")]
    pub legacy_storage_compat: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            https: default_https(),
            verify_ssl: false,
            log_level: default_log_level(),
            legacy_storage_compat: default_legacy_storage_compat(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
fn default_https() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".into()
}
fn default_legacy_storage_compat() -> bool {
    true
}

/// A named NAS profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Hostname or IP address.
    pub host: String,

    /// Defaults to 5001 with HTTPS, 5000 without.
    pub port: Option<u16>,

    /// Override the HTTPS default.
    pub https: Option<bool>,

    /// Override certificate verification.
    pub verify_ssl: Option<bool>,

    /// Extra CA certificate (PEM) to trust; implies verification.
    pub ca_cert: Option<PathBuf>,

    /// Override timeout.
    pub timeout: Option<u64>,

    pub username: Option<String>,

    /// Password (plaintext, prefer keyring).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Device token from an earlier two-step login (plaintext, prefer keyring).
    pub device_token: Option<String>,

    /// Name the NAS lists this client under in its trusted devices.
    pub device_name: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "synodsm", "synodsm").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("synodsm");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from `path`, with `SYNODSM_`-prefixed environment overrides
/// (`SYNODSM_DEFAULTS__TIMEOUT=30`). A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SYNODSM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

fn keyring_entry(profile_name: &str, item: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/{item}"),
    )?)
}

fn keyring_secret(profile_name: &str, item: &str) -> Option<SecretString> {
    keyring_entry(profile_name, item)
        .ok()
        .and_then(|entry| entry.get_password().ok())
        .map(SecretString::from)
}

/// Resolve the password from the credential chain.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(pw) = profile
        .password_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(pw));
    }

    // 2. Global env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Some(pw) = keyring_secret(profile_name, "password") {
        return Ok(pw);
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve a stored device token: keyring first, then the profile field.
pub fn resolve_device_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    keyring_secret(profile_name, "device-token").or_else(|| {
        profile
            .device_token
            .as_ref()
            .map(|token| SecretString::from(token.clone()))
    })
}

/// Persist the device token granted by a two-step login.
pub fn store_device_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "device-token")?.set_password(token)?;
    debug!(profile = profile_name, "device token stored in keyring");
    Ok(())
}

/// Store the profile password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "password")?.set_password(password)?;
    Ok(())
}

// ── Profile → gateway config ────────────────────────────────────────

/// Build a `ConnectionConfig` from a profile and global defaults.
pub fn profile_connection(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ConnectionConfig, ConfigError> {
    let host = profile.host.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: format!("profiles.{profile_name}.host"),
            reason: "must not be empty".into(),
        });
    }

    let https = profile.https.unwrap_or(defaults.https);
    let port = profile.port.unwrap_or(if https { 5001 } else { 5000 });
    let verify_ssl = profile.verify_ssl.unwrap_or(defaults.verify_ssl);

    let mut config = ConnectionConfig::new(host, port, https, verify_ssl)
        .with_timeout(Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)));
    if let Some(ca_path) = profile.ca_cert.as_ref().filter(|_| https) {
        config.tls = TlsMode::CustomCa(ca_path.clone());
    }
    if let Some(ref name) = profile.device_name {
        config = config.with_device_name(name.clone());
    }
    config.legacy_storage_compat = defaults.legacy_storage_compat;
    Ok(config)
}

/// Build the gateway's connection config and credentials from a profile.
pub fn profile_to_connection(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<(ConnectionConfig, Credentials), ConfigError> {
    let config = profile_connection(profile, profile_name, defaults)?;

    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("SYNODSM_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = resolve_password(profile, profile_name)?;

    let mut credentials = Credentials::new(username, password);
    if let Some(token) = resolve_device_token(profile, profile_name) {
        credentials = credentials.with_device_token(token);
    }
    Ok((config, credentials))
}
