mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dealdesk_core::Backoffice;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let Err(err) = run(cli).await else {
        return;
    };
    let code = err.exit_code();
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(code);
}

fn init_tracing(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // These run before any session exists.
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Login(args) => commands::session::login(args, &cli.global).await,
        Command::Logout => commands::session::logout(&cli.global),
        Command::Completions(args) => {
            use clap::CommandFactory;

            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "dealdesk",
                &mut std::io::stdout(),
            );
            Ok(())
        }

        // Everything else talks to the backoffice.
        cmd => {
            let session_config = config::resolve_session_config(&cli.global)?;
            let backoffice = Backoffice::new(session_config);
            backoffice.connect().await?;

            tracing::debug!(command = ?cmd, "dispatching");
            let outcome = commands::dispatch(cmd, &backoffice, &cli.global).await;
            backoffice.disconnect().await;
            outcome
        }
    }
}
