//! `dealdesk-tui` — Terminal workspace for the Dealdesk marketplace
//! backoffice.
//!
//! Built on [ratatui](https://ratatui.rs) with live data from
//! `dealdesk-core`'s [`Backoffice`](dealdesk_core::Backoffice). Screens
//! are navigable via number keys (1-9): Dashboard, Products, Categories,
//! Coupons, Orders, Vendors, Influencers, Plans, and Gallery.
//!
//! Logs are written to a file under the platform state directory to
//! avoid corrupting the terminal UI. A background session bridge task
//! forwards cache updates and connection changes into the action loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use dealdesk_core::Backoffice;

use crate::app::App;

/// Terminal workspace for managing the Dealdesk marketplace.
#[derive(Parser, Debug)]
#[command(name = "dealdesk-tui", version, about)]
struct Cli {
    /// Config profile to connect with (defaults to the file's default_profile)
    #[arg(short, long, env = "DEALDESK_PROFILE")]
    profile: Option<String>,

    /// Log file path (defaults to the platform state directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Route tracing to a file. Writing to stdout or stderr would scribble
/// over the alternate screen, so the terminal never sees log output.
/// The returned guard flushes buffered lines when dropped.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let fallback = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "dealdesk_tui={fallback},dealdesk_core={fallback},dealdesk_api={fallback}"
        ))
    });

    let path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| dealdesk_config::log_dir().join("dealdesk-tui.log"));
    let dir = path.parent().unwrap_or(std::path::Path::new("."));
    let name = path
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("dealdesk-tui.log"));
    let _ = std::fs::create_dir_all(dir);

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);
    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    guard
}

/// Build a [`Backoffice`] from the config file, if a usable profile exists.
/// Returns `None` when there is no profile yet — the app then opens on the
/// settings screen instead.
fn build_backoffice(cli: &Cli) -> Option<Backoffice> {
    let cfg = dealdesk_config::load_config_or_default();
    let (name, profile) = match cfg.select_profile(cli.profile.as_deref()) {
        Ok(found) => found,
        Err(e) => {
            info!(error = %e, "no usable profile, opening settings");
            return None;
        }
    };
    match dealdesk_config::profile_to_session_config(profile, name, &cfg.defaults) {
        Ok(session) => Some(Backoffice::new(session)),
        Err(e) => {
            info!(profile = name, error = %e, "profile incomplete, opening settings");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the alternate screen so a panic during startup
    // still restores the terminal.
    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    info!(
        profile = cli.profile.as_deref().unwrap_or("(default)"),
        "starting dealdesk-tui"
    );

    let mut app = App::new(build_backoffice(&cli));
    app.run().await?;

    Ok(())
}
