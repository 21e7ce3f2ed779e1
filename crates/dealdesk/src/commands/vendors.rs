//! Vendor command handlers.

use dealdesk_core::{Backoffice, Command as CoreCommand, EntityId, Vendor, VendorAnalytics};
use tabled::Tabled;

use crate::cli::{GlobalOpts, VendorsArgs, VendorsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VendorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Standing")]
    standing: String,
    #[tabled(rename = "Since")]
    since: String,
}

impl From<&Vendor> for VendorRow {
    fn from(v: &Vendor) -> Self {
        Self {
            id: v.id.to_string(),
            name: v.name.clone(),
            email: v.email.clone(),
            standing: v.standing().into(),
            since: v
                .created_at
                .map_or_else(String::new, |t| t.format("%Y-%m-%d").to_string()),
        }
    }
}

fn detail(v: &Vendor) -> String {
    [
        format!("ID:          {}", v.id),
        format!("Name:        {}", v.name),
        format!("Email:       {}", v.email),
        format!("Standing:    {}", v.standing()),
        format!("Logo:        {}", v.logo_url.as_deref().unwrap_or("-")),
        format!(
            "Since:       {}",
            v.created_at.map_or_else(|| "-".into(), |t| t.to_rfc3339())
        ),
        format!("Description: {}", v.description),
    ]
    .join("\n")
}

fn analytics_detail(a: &VendorAnalytics) -> String {
    let mut lines = vec![
        format!("Total deals:       {}", a.total_deals),
        format!("Total redemptions: {}", a.total_redemptions),
        format!("Redemption rate:   {:.1}%", a.redemption_rate * 100.0),
    ];
    if !a.approval_stats.is_empty() {
        lines.push("Status breakdown:".into());
        for stat in &a.approval_stats {
            lines.push(format!("  {:<12} {}", stat.status.to_string(), stat.count));
        }
    }
    if !a.top_users.is_empty() {
        lines.push("Top users:".into());
        for user in &a.top_users {
            lines.push(format!("  {:<24} {}", user.name, user.redeemed_count));
        }
    }
    if !a.deals_nearing_expiration.is_empty() {
        lines.push("Nearing expiration:".into());
        for deal in &a.deals_nearing_expiration {
            let expires = deal
                .expires_at
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d").to_string());
            lines.push(format!("  {:<24} {expires}", deal.title));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backoffice: &Backoffice,
    args: VendorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VendorsCommand::List { search, list } => {
            let vendors = util::fetch_paged(&list, backoffice.default_take(), |take, skip| {
                let search = search.clone();
                async move {
                    backoffice
                        .fetch_vendors(search.as_deref(), take, skip)
                        .await
                }
            })
            .await?;
            let out = output::render_list(
                &global.output,
                &vendors,
                |v| VendorRow::from(v),
                |v| v.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VendorsCommand::Show { vendor } => {
            let found = backoffice.fetch_vendor(&EntityId::from(vendor)).await?;
            let out = output::render_single(&global.output, &found, detail, |v| v.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VendorsCommand::Approve { vendor } => {
            backoffice
                .execute(CoreCommand::ApproveVendor {
                    id: EntityId::from(vendor.as_str()),
                })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Vendor {vendor} approved",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        VendorsCommand::Block { vendor } => {
            if !util::confirm(
                &format!("Block vendor {vendor}?"),
                global.yes,
            )? {
                return Ok(());
            }
            backoffice
                .execute(CoreCommand::BlockVendor {
                    id: EntityId::from(vendor.as_str()),
                })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Vendor {vendor} blocked",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        VendorsCommand::Analytics { vendor } => {
            let analytics = backoffice
                .vendor_analytics(&EntityId::from(vendor.as_str()))
                .await?;
            let out = output::render_single(&global.output, &analytics, analytics_detail, |_| {
                vendor.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
