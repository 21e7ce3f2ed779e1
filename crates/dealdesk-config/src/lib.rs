//! Profile-based configuration shared by every dealdesk binary.
//!
//! A TOML file holds named backoffice profiles plus workspace-wide
//! defaults. Credentials resolve through environment variables, the OS
//! keyring, and plaintext file entries, in that order, and the result
//! translates into a `dealdesk_core::SessionConfig`. The CLI layers its
//! flag overrides on top of what this crate loads.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use dealdesk_core::{Credentials, SessionConfig, TlsVerification};

/// Keyring service name; accounts are `<profile>/refresh-token` and
/// `<profile>/password`.
const KEYRING_SERVICE: &str = "dealdesk";

// ── Errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{name}' in the config file")]
    NoSuchProfile { name: String },

    #[error("no usable credentials for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring operation failed: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("could not render the config as TOML: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("could not load the config file: {0}")]
    Figment(Box<figment::Error>),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── File format ─────────────────────────────────────────────────────

/// Root of the on-disk TOML file.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when no `--profile` override is given.
    pub default_profile: Option<String>,

    /// Workspace-wide fallbacks, overridable per profile.
    #[serde(default)]
    pub defaults: Defaults,

    /// One entry per environment (prod, staging, local).
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_profile: Some(String::from("default")),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile to use: an explicit `--profile` override, else the
    /// file's `default_profile`, else the literal name "default".
    pub fn select_profile<'a>(
        &'a self,
        requested: Option<&'a str>,
    ) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::NoSuchProfile { name: name.into() })?;
        Ok((name, profile))
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Page size for list endpoints.
    #[serde(default = "default_take")]
    pub default_take: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            output: default_output(),
            color: default_color(),
            timeout_secs: default_timeout_secs(),
            default_take: default_take(),
        }
    }
}

fn default_output() -> String {
    String::from("table")
}
fn default_color() -> String {
    String::from("auto")
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_take() -> usize {
    10
}

/// A named backoffice profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Marketplace API base URL.
    pub api_url: String,

    /// Identity provider base URL.
    pub identity_url: String,

    /// Admin account email (required for password sign-in).
    pub email: Option<String>,

    /// Password (plaintext — prefer keyring or `DEALDESK_PASSWORD`).
    pub password: Option<String>,

    /// Refresh token (plaintext — prefer keyring; `dealdesk login`
    /// stores one there for you).
    pub refresh_token: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification (staging environments only).
    pub insecure: Option<bool>,

    /// Override the request timeout.
    pub timeout_secs: Option<u64>,

    /// Override the page size.
    pub default_take: Option<usize>,
}

// ── Locations ───────────────────────────────────────────────────────

/// Where the config file lives, following platform conventions.
pub fn config_path() -> PathBuf {
    match ProjectDirs::from("app", "dealdesk", "dealdesk") {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => dirs_fallback().join("config.toml"),
    }
}

/// Directory for TUI log files (state dir where the platform has one,
/// local data dir otherwise).
pub fn log_dir() -> PathBuf {
    match ProjectDirs::from("app", "dealdesk", "dealdesk") {
        Some(dirs) => match dirs.state_dir() {
            Some(state) => PathBuf::from(state),
            None => dirs.data_local_dir().join("logs"),
        },
        None => dirs_fallback(),
    }
}

fn dirs_fallback() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    [home.as_str(), ".config", "dealdesk"].iter().collect()
}

// ── Loading and saving ──────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Layering: built-in defaults, then the TOML file, then `DEALDESK_*`
/// environment variables (`__` separates nesting, e.g.
/// `DEALDESK_DEFAULTS__OUTPUT=json`).
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from an explicit path (used by `--config` and tests).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DEALDESK_").split("__"));
    Ok(figment.extract()?)
}

/// Best-effort load, for startup paths that may run unconfigured.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Write the TOML rendering of `cfg` to the default location.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Persist a refresh token for `profile` in the OS keyring
/// (`dealdesk login` calls this after a successful sign-in).
pub fn store_refresh_token(profile: &str, token: &SecretString) -> Result<(), ConfigError> {
    use secrecy::ExposeSecret;
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile}/refresh-token"))?;
    entry.set_password(token.expose_secret())?;
    Ok(())
}

/// Remove the stored refresh token for `profile`, if any.
pub fn clear_refresh_token(profile: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile}/refresh-token"))?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve credentials for a profile.
///
/// A refresh token beats a password at every tier (no interactive email
/// needed), and the tiers are: environment (`DEALDESK_REFRESH_TOKEN`,
/// `DEALDESK_PASSWORD`), then the OS keyring, then plaintext values in
/// the config file.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    // Tier 1: environment.
    if let Ok(token) = std::env::var("DEALDESK_REFRESH_TOKEN") {
        return Ok(Credentials::RefreshToken(SecretString::from(token)));
    }
    if let (Ok(password), Some(email)) = (std::env::var("DEALDESK_PASSWORD"), &profile.email) {
        return Ok(Credentials::Password {
            email: email.clone(),
            password: SecretString::from(password),
        });
    }

    // Tier 2: OS keyring.
    let stored_token =
        keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/refresh-token"))
            .and_then(|entry| entry.get_password());
    if let Ok(token) = stored_token {
        return Ok(Credentials::RefreshToken(SecretString::from(token)));
    }
    if let Some(email) = &profile.email {
        let stored_password =
            keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
                .and_then(|entry| entry.get_password());
        if let Ok(password) = stored_password {
            return Ok(Credentials::Password {
                email: email.clone(),
                password: SecretString::from(password),
            });
        }
    }

    // Tier 3: plaintext entries in the file itself.
    if let Some(token) = &profile.refresh_token {
        return Ok(Credentials::RefreshToken(SecretString::from(token.clone())));
    }
    if let (Some(email), Some(password)) = (&profile.email, &profile.password) {
        return Ok(Credentials::Password {
            email: email.clone(),
            password: SecretString::from(password.clone()),
        });
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

// ── Session config ──────────────────────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("not a valid URL: {raw}"),
    })
}

/// Translate a profile into a ready `SessionConfig` without consulting
/// CLI flags. This is the TUI's path; the CLI wraps it with overrides.
pub fn profile_to_session_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<SessionConfig, ConfigError> {
    let api_url = parse_url("api_url", &profile.api_url)?;
    let identity_url = parse_url("identity_url", &profile.identity_url)?;
    let credentials = resolve_credentials(profile, profile_name)?;

    // `insecure = true` wins over a configured CA bundle.
    let tls = match (&profile.ca_cert, profile.insecure.unwrap_or(false)) {
        (_, true) => TlsVerification::DangerAcceptInvalid,
        (Some(ca_path), false) => TlsVerification::CustomCa(ca_path.clone()),
        (None, false) => TlsVerification::SystemDefaults,
    };

    let mut config = SessionConfig::new(api_url, identity_url, credentials);
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout_secs.unwrap_or(defaults.timeout_secs));
    config.default_take = profile.default_take.unwrap_or(defaults.default_take);
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn staging_profile() -> Profile {
        Profile {
            api_url: "https://api.staging.test".into(),
            identity_url: "https://identity.staging.test".into(),
            email: Some("admin@staging.test".into()),
            refresh_token: Some("rt-plain".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.default_profile.as_deref(), Some("default"));
        assert_eq!(parsed.defaults.output, "table");
        assert_eq!(parsed.defaults.default_take, 10);
    }

    #[test]
    fn file_and_env_layer_over_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "dealdesk.toml",
                r#"
                default_profile = "staging"

                [profiles.staging]
                api_url = "https://api.staging.test"
                identity_url = "https://identity.staging.test"
                "#,
            )?;
            jail.set_env("DEALDESK_DEFAULTS__OUTPUT", "json");

            let config = load_config_from(std::path::Path::new("dealdesk.toml"))
                .map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.default_profile.as_deref(), Some("staging"));
            assert_eq!(config.defaults.output, "json");
            assert_eq!(config.defaults.timeout_secs, 30);
            assert!(config.profiles.contains_key("staging"));
            Ok(())
        });
    }

    #[test]
    fn select_profile_honors_override_then_default() {
        let mut config = Config {
            default_profile: Some("staging".into()),
            ..Config::default()
        };
        config.profiles.insert("staging".into(), staging_profile());
        config.profiles.insert("prod".into(), staging_profile());

        let (name, _) = config.select_profile(None).unwrap();
        assert_eq!(name, "staging");
        let (name, _) = config.select_profile(Some("prod")).unwrap();
        assert_eq!(name, "prod");
        assert!(matches!(
            config.select_profile(Some("missing")),
            Err(ConfigError::NoSuchProfile { .. })
        ));
    }

    #[test]
    fn plaintext_refresh_token_resolves_when_nothing_else_is_set() {
        let creds = resolve_credentials(&staging_profile(), "staging").unwrap();
        assert!(matches!(creds, Credentials::RefreshToken(_)));
    }

    #[test]
    fn password_needs_an_email_to_count() {
        let profile = Profile {
            api_url: "https://api.test".into(),
            identity_url: "https://identity.test".into(),
            password: Some("hunter2".into()),
            ..Profile::default()
        };
        assert!(matches!(
            resolve_credentials(&profile, "default"),
            Err(ConfigError::NoCredentials { .. })
        ));
    }

    #[test]
    fn session_config_applies_profile_overrides() {
        let mut profile = staging_profile();
        profile.insecure = Some(true);
        profile.timeout_secs = Some(5);
        profile.default_take = Some(25);

        let config = profile_to_session_config(&profile, "staging", &Defaults::default()).unwrap();
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.default_take, 25);
    }

    #[test]
    fn bad_api_url_is_a_validation_error() {
        let mut profile = staging_profile();
        profile.api_url = "not a url".into();
        assert!(matches!(
            profile_to_session_config(&profile, "staging", &Defaults::default()),
            Err(ConfigError::Validation { .. })
        ));
    }
}
