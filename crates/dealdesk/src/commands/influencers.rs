//! Influencer command handlers.

use dealdesk_core::{Backoffice, Command as CoreCommand, EntityId, Influencer};
use tabled::Tabled;

use crate::cli::{GlobalOpts, InfluencersArgs, InfluencersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InfluencerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Standing")]
    standing: String,
    #[tabled(rename = "Wallet")]
    wallet: String,
}

impl From<&Influencer> for InfluencerRow {
    fn from(i: &Influencer) -> Self {
        Self {
            id: i.id.to_string(),
            name: i.name.clone(),
            email: i.email.clone(),
            standing: i.standing().into(),
            wallet: i
                .wallet_balance
                .map_or_else(String::new, |b| format!("{b:.2}")),
        }
    }
}

fn detail(i: &Influencer) -> String {
    [
        format!("ID:       {}", i.id),
        format!("Name:     {}", i.name),
        format!("Email:    {}", i.email),
        format!("Standing: {}", i.standing()),
        format!(
            "Wallet:   {}",
            i.wallet_balance
                .map_or_else(|| "-".into(), |b| format!("{b:.2}"))
        ),
        format!("Photo:    {}", i.photo_url.as_deref().unwrap_or("-")),
        format!(
            "Since:    {}",
            i.created_at.map_or_else(|| "-".into(), |t| t.to_rfc3339())
        ),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backoffice: &Backoffice,
    args: InfluencersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        InfluencersCommand::List { search, list } => {
            let influencers =
                util::fetch_paged(&list, backoffice.default_take(), |take, skip| {
                    let search = search.clone();
                    async move {
                        backoffice
                            .fetch_influencers(search.as_deref(), take, skip)
                            .await
                    }
                })
                .await?;
            let out = output::render_list(
                &global.output,
                &influencers,
                |i| InfluencerRow::from(i),
                |i| i.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InfluencersCommand::Show { influencer } => {
            let found = backoffice
                .fetch_influencer(&EntityId::from(influencer))
                .await?;
            let out = output::render_single(&global.output, &found, detail, |i| i.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        InfluencersCommand::Approve { influencer } => {
            backoffice
                .execute(CoreCommand::ApproveInfluencer {
                    id: EntityId::from(influencer.as_str()),
                })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Influencer {influencer} approved",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        InfluencersCommand::Block { influencer } => {
            if !util::confirm(
                &format!("Block influencer {influencer}?"),
                global.yes,
            )? {
                return Ok(());
            }
            backoffice
                .execute(CoreCommand::BlockInfluencer {
                    id: EntityId::from(influencer.as_str()),
                })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Influencer {influencer} blocked",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        InfluencersCommand::Credit { influencer, amount } => {
            if amount <= 0.0 {
                return Err(CliError::Validation {
                    field: "amount".into(),
                    reason: "must be greater than zero".into(),
                });
            }
            if !util::confirm(
                &format!("Credit {amount:.2} to influencer {influencer}'s wallet?"),
                global.yes,
            )? {
                return Ok(());
            }
            backoffice
                .execute(CoreCommand::CreditWallet {
                    user_id: EntityId::from(influencer.as_str()),
                    amount,
                })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Wallet credited {amount:.2}",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }
    }
}
