//! Session command handlers: login, whoami, logout, profile updates.

use dealdesk_core::{AdminProfile, Backoffice, Command as CoreCommand, Credentials, ProfilePatch};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::cli::{GlobalOpts, LoginArgs, ProfileArgs, ProfileCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Login ───────────────────────────────────────────────────────────

/// Sign in with email/password and store the refresh token in the
/// system keyring under the active profile.
pub async fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);

    let email = match args.email.or_else(|| profile.and_then(|p| p.email.clone())) {
        Some(email) => email,
        None => dialoguer::Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
    };
    let password = SecretString::from(rpassword::prompt_password("Password: ")?);

    let credentials = Credentials::Password {
        email: email.clone(),
        password,
    };
    let session = config::session_config_with(global, &cfg, &profile_name, credentials)?;
    let token = dealdesk_core::obtain_refresh_token(&session).await?;

    if args.no_store {
        // Explicitly requested; the caller wants to manage the token
        // themselves (CI, another keyring, ...).
        println!("{}", token.expose_secret());
        return Ok(());
    }

    dealdesk_config::store_refresh_token(&profile_name, &token)
        .map_err(CliError::from)?;
    if !global.quiet {
        eprintln!(
            "{} Signed in as {email}; refresh token stored in the system keyring \
             (profile '{profile_name}')",
            output::check_mark(&global.color)
        );
    }
    Ok(())
}

// ── Logout ──────────────────────────────────────────────────────────

/// Drop the stored refresh token for the active profile.
pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    dealdesk_config::clear_refresh_token(&profile_name).map_err(CliError::from)?;
    if !global.quiet {
        eprintln!(
            "{} Refresh token for profile '{profile_name}' cleared",
            output::check_mark(&global.color)
        );
    }
    Ok(())
}

// ── Whoami ──────────────────────────────────────────────────────────

/// The admin profile as loaded during connect, flattened for output.
#[derive(Serialize)]
struct WhoamiView {
    id: String,
    name: String,
    email: String,
    role: Option<String>,
}

impl From<&AdminProfile> for WhoamiView {
    fn from(profile: &AdminProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            role: profile.role.clone(),
        }
    }
}

fn whoami_detail(view: &WhoamiView) -> String {
    [
        format!("ID:     {}", view.id),
        format!("Name:   {}", view.name),
        format!("Email:  {}", view.email),
        format!("Role:   {}", view.role.as_deref().unwrap_or("-")),
    ]
    .join("\n")
}

pub fn whoami(backoffice: &Backoffice, global: &GlobalOpts) -> Result<(), CliError> {
    // connect() verifies the session by fetching the profile, so an
    // empty cell here means the session layer has a bug, not the user.
    let profile = backoffice
        .profile()
        .ok_or_else(|| CliError::ApiError {
            message: "session established but no admin profile loaded".into(),
            status: None,
        })?;

    let view = WhoamiView::from(profile.as_ref());
    let out = output::render_single(&global.output, &view, whoami_detail, |v| v.email.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Profile update ──────────────────────────────────────────────────

pub async fn handle_profile(
    backoffice: &Backoffice,
    args: ProfileArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProfileCommand::Update { name, photo_url } => {
            let patch = ProfilePatch { name, photo_url };
            if patch.is_empty() {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: "nothing to update; pass --name or --photo-url".into(),
                });
            }
            backoffice
                .execute(CoreCommand::UpdateProfile(patch))
                .await?;
            if !global.quiet {
                eprintln!("{} Profile updated", output::check_mark(&global.color));
            }
            Ok(())
        }
    }
}
