//! CLI configuration — thin wrapper around `dealdesk_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--api-url, --token, etc.).

use std::time::Duration;

use dealdesk_core::{Credentials, SessionConfig, TlsVerification};
use secrecy::SecretString;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use dealdesk_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `SessionConfig` from the config file, active profile, and CLI
/// flag overrides. Flags beat profile values; a `--token` flag beats the
/// whole credential chain.
///
/// Works without a config file when `--api-url`, `--identity-url`, and a
/// credential source are all supplied on the command line.
pub fn resolve_session_config(global: &GlobalOpts) -> Result<SessionConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);

    let credentials = if let Some(token) = &global.token {
        Credentials::StaticToken(SecretString::from(token.clone()))
    } else {
        let profile = profile.ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;
        dealdesk_config::resolve_credentials(profile, &profile_name)?
    };

    session_config_with(global, &cfg, &profile_name, credentials)
}

/// The flag-aware half of session resolution, with the credentials
/// already decided. `login` calls this directly with the password the
/// user just typed.
pub fn session_config_with(
    global: &GlobalOpts,
    cfg: &Config,
    profile_name: &str,
    credentials: Credentials,
) -> Result<SessionConfig, CliError> {
    let profile = cfg.profiles.get(profile_name);

    let api_url = resolve_url(
        "api-url",
        global.api_url.as_deref(),
        profile.map(|p| p.api_url.as_str()),
        profile_name,
    )?;
    let identity_url = resolve_url(
        "identity-url",
        global.identity_url.as_deref(),
        profile.map(|p| p.identity_url.as_str()),
        profile_name,
    )?;

    let tls = if global.insecure || profile.and_then(|p| p.insecure).unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = profile.and_then(|p| p.ca_cert.as_ref()) {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout_secs = global
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout_secs))
        .unwrap_or(cfg.defaults.timeout_secs);

    let mut config = SessionConfig::new(api_url, identity_url, credentials);
    config.tls = tls;
    config.timeout = Duration::from_secs(timeout_secs);
    config.default_take = profile
        .and_then(|p| p.default_take)
        .unwrap_or(cfg.defaults.default_take);
    Ok(config)
}

/// One URL from flag-else-profile, with a pointed error when neither side
/// has it.
fn resolve_url(
    flag: &str,
    from_flag: Option<&str>,
    from_profile: Option<&str>,
    profile_name: &str,
) -> Result<url::Url, CliError> {
    let raw = from_flag
        .or(from_profile.filter(|s| !s.is_empty()))
        .ok_or_else(|| CliError::Validation {
            field: flag.into(),
            reason: format!(
                "not set; pass --{flag} or configure [profiles.{profile_name}]"
            ),
        })?;
    raw.parse().map_err(|_| CliError::Validation {
        field: flag.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::Cli;

    fn global_from(args: &[&str]) -> GlobalOpts {
        // `whoami` is just a parseable anchor; only the globals matter here.
        let mut full = vec!["dealdesk"];
        full.extend_from_slice(args);
        full.push("whoami");
        Cli::try_parse_from(full).expect("args should parse").global
    }

    #[test]
    fn flags_alone_build_a_session_with_a_static_token() {
        let global = global_from(&[
            "--profile",
            "nonexistent-profile-for-tests",
            "--api-url",
            "https://api.example.test",
            "--identity-url",
            "https://id.example.test",
            "--token",
            "tok-123",
            "--insecure",
            "--timeout",
            "5",
        ]);
        let config = resolve_session_config(&global).expect("flags are sufficient");
        assert_eq!(config.api_url.as_str(), "https://api.example.test/");
        assert!(matches!(config.credentials, Credentials::StaticToken(_)));
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_api_url_points_at_the_flag() {
        let global = global_from(&[
            "--profile",
            "nonexistent-profile-for-tests",
            "--token",
            "tok-123",
        ]);
        let err = resolve_session_config(&global).expect_err("no URL anywhere");
        assert!(err.to_string().contains("api-url"));
    }

    #[test]
    fn bad_url_flag_is_a_validation_error() {
        let global = global_from(&[
            "--api-url",
            "not a url",
            "--identity-url",
            "https://id.example.test",
            "--token",
            "tok-123",
        ]);
        let err = resolve_session_config(&global).expect_err("URL should not parse");
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
