//! Deal command handlers.

use chrono::{DateTime, Utc};
use dealdesk_core::{
    Backoffice, Command as CoreCommand, Deal, DealAnalytics, DealPatch, DealStatus, EntityId,
};
use tabled::Tabled;

use crate::cli::{DealsArgs, DealsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DealRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Redemptions")]
    redemptions: i64,
    #[tabled(rename = "Expires")]
    expires: String,
}

impl From<&Deal> for DealRow {
    fn from(d: &Deal) -> Self {
        Self {
            id: d.id.to_string(),
            title: d.title.clone(),
            status: d.status.to_string(),
            vendor: d.vendor_name.clone().unwrap_or_default(),
            redemptions: d.redemption_count,
            expires: d
                .expires_at
                .map_or_else(String::new, |t| t.format("%Y-%m-%d").to_string()),
        }
    }
}

fn detail(d: &Deal) -> String {
    [
        format!("ID:          {}", d.id),
        format!("Title:       {}", d.title),
        format!("Status:      {}", d.status),
        format!("Vendor:      {}", d.vendor_name.as_deref().unwrap_or("-")),
        format!("Redemptions: {}", d.redemption_count),
        format!(
            "Expires:     {}",
            d.expires_at.map_or_else(|| "-".into(), |t| t.to_rfc3339())
        ),
        format!("Image:       {}", d.image_url.as_deref().unwrap_or("-")),
        format!("Description: {}", d.description),
    ]
    .join("\n")
}

fn analytics_detail(a: &DealAnalytics) -> String {
    let mut lines = vec![
        format!("Deal:              {}", a.deal_title),
        format!("Total redemptions: {}", a.total_redemptions),
        format!("Total approvals:   {}", a.total_approvals),
    ];
    if !a.status_breakdown.is_empty() {
        lines.push("Status breakdown:".into());
        for stat in &a.status_breakdown {
            lines.push(format!("  {:<12} {}", stat.status.to_string(), stat.count));
        }
    }
    if !a.top_users.is_empty() {
        lines.push("Top users:".into());
        for user in &a.top_users {
            lines.push(format!("  {:<24} {}", user.name, user.redeemed_count));
        }
    }
    lines.join("\n")
}

fn parse_status(value: &str) -> Result<DealStatus, CliError> {
    match value.parse() {
        Ok(DealStatus::Unknown(other)) => Err(CliError::Validation {
            field: "status".into(),
            reason: format!("unknown status '{other}' (expected active, inactive, or expired)"),
        }),
        Ok(status) => Ok(status),
        Err(_) => Err(CliError::Validation {
            field: "status".into(),
            reason: format!("unknown status '{value}'"),
        }),
    }
}

fn parse_expiry(value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CliError::Validation {
            field: "expires".into(),
            reason: format!("not an RFC 3339 timestamp: {e}"),
        })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backoffice: &Backoffice,
    args: DealsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DealsCommand::Show { deal } => {
            let found = backoffice.fetch_deal(&EntityId::from(deal)).await?;
            let out = output::render_single(&global.output, &found, detail, |d| d.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DealsCommand::Update {
            deal,
            title,
            description,
            status,
            expires,
        } => {
            let update = DealPatch {
                title,
                description,
                status: status.map(|s| parse_status(&s)).transpose()?,
                expires_at: expires.map(|e| parse_expiry(&e)).transpose()?,
            };
            if update.is_empty() {
                return Err(CliError::Validation {
                    field: "deal".into(),
                    reason: "nothing to update; pass at least one field flag".into(),
                });
            }
            backoffice
                .execute(CoreCommand::UpdateDeal {
                    id: EntityId::from(deal),
                    update,
                })
                .await?;
            if !global.quiet {
                eprintln!("{} Deal updated", output::check_mark(&global.color));
            }
            Ok(())
        }

        DealsCommand::Delete { deal } => {
            if !util::confirm(&format!("Delete deal {deal}?"), global.yes)? {
                return Ok(());
            }
            backoffice
                .execute(CoreCommand::DeleteDeal {
                    id: EntityId::from(deal),
                })
                .await?;
            if !global.quiet {
                eprintln!("{} Deal deleted", output::check_mark(&global.color));
            }
            Ok(())
        }

        DealsCommand::ByVendor { vendor } => {
            let deals = backoffice
                .fetch_vendor_deals(&EntityId::from(vendor))
                .await?;
            let out =
                output::render_list(&global.output, &deals, |d| DealRow::from(d), |d| d.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DealsCommand::Top { take } => {
            let deals = backoffice.fetch_top_deals(take, 0).await?;
            let out =
                output::render_list(&global.output, &deals, |d| DealRow::from(d), |d| d.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DealsCommand::Analytics { deal } => {
            let analytics = backoffice.deal_analytics(&EntityId::from(deal)).await?;
            let out = output::render_single(&global.output, &analytics, analytics_detail, |a| {
                a.deal_title.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
