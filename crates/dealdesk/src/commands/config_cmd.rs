//! Config file inspection and editing.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redacted(config::load_config_or_default());
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).expect("config serialization should not fail"),
                |c| c.default_profile.clone().unwrap_or_else(|| "default".into()),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::SetDefault { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound { name });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!(
                    "{} Default profile set to '{name}'",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }
    }
}

/// Masks stored secrets so `config show` never echoes them.
fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("*****".into());
        }
        if profile.refresh_token.is_some() {
            profile.refresh_token = Some("*****".into());
        }
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;

    fn profile_with_secrets() -> Profile {
        Profile {
            api_url: "https://api.example.test".into(),
            identity_url: "https://id.example.test".into(),
            email: Some("admin@example.test".into()),
            password: Some("hunter2".into()),
            refresh_token: Some("rt-123".into()),
            ca_cert: None,
            insecure: None,
            timeout_secs: None,
            default_take: None,
        }
    }

    #[test]
    fn show_masks_passwords_and_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert("staging".into(), profile_with_secrets());

        let masked = redacted(cfg);
        let profile = &masked.profiles["staging"];
        assert_eq!(profile.password.as_deref(), Some("*****"));
        assert_eq!(profile.refresh_token.as_deref(), Some("*****"));
        // Non-secret fields pass through untouched.
        assert_eq!(profile.email.as_deref(), Some("admin@example.test"));
    }

    #[test]
    fn absent_secrets_stay_absent() {
        let mut cfg = Config::default();
        let mut profile = profile_with_secrets();
        profile.password = None;
        profile.refresh_token = None;
        cfg.profiles.insert("ci".into(), profile);

        let masked = redacted(cfg);
        assert_eq!(masked.profiles["ci"].password, None);
        assert_eq!(masked.profiles["ci"].refresh_token, None);
    }
}
