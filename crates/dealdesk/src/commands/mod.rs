//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod categories;
pub mod config_cmd;
pub mod coupons;
pub mod deals;
pub mod gallery;
pub mod influencers;
pub mod orders;
pub mod plans;
pub mod products;
pub mod session;
pub mod util;
pub mod vendors;

use dealdesk_core::Backoffice;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    backoffice: &Backoffice,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Whoami => session::whoami(backoffice, global),
        Command::Profile(args) => session::handle_profile(backoffice, args, global).await,
        Command::Categories(args) => categories::handle(backoffice, args, global).await,
        Command::Products(args) => products::handle(backoffice, args, global).await,
        Command::Vendors(args) => vendors::handle(backoffice, args, global).await,
        Command::Influencers(args) => influencers::handle(backoffice, args, global).await,
        Command::Coupons(args) => coupons::handle(backoffice, args, global).await,
        Command::Deals(args) => deals::handle(backoffice, args, global).await,
        Command::Orders(args) => orders::handle(backoffice, args, global).await,
        Command::Plans(args) => plans::handle(backoffice, args, global).await,
        Command::Gallery(args) => gallery::handle(backoffice, args, global).await,
        // Login, logout, config, and completions are handled before dispatch
        Command::Login(_) | Command::Logout | Command::Config(_) | Command::Completions(_) => {
            unreachable!()
        }
    }
}
