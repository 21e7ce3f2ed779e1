//! Coupon redemption command handlers.
//!
//! `coupons` is the review queue for influencer redemptions: pending
//! claims get approved, approved claims get marked used once the post
//! goes up.

use dealdesk_core::{
    Backoffice, Command as CoreCommand, EntityId, Redemption, RedemptionScope, ReviewDecision,
};
use tabled::Tabled;

use crate::cli::{CouponsArgs, CouponsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RedemptionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Influencer")]
    influencer: String,
    #[tabled(rename = "Deal")]
    deal: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Redemption> for RedemptionRow {
    fn from(r: &Redemption) -> Self {
        Self {
            id: r.id.to_string(),
            status: r.status.to_string(),
            influencer: r.influencer_name.clone().unwrap_or_default(),
            deal: r.deal_title.clone().unwrap_or_default(),
            code: r.coupon_code.clone().unwrap_or_default(),
            created: r
                .created_at
                .map_or_else(String::new, |t| t.format("%Y-%m-%d").to_string()),
        }
    }
}

fn detail(r: &Redemption) -> String {
    let mut lines = vec![
        format!("ID:         {}", r.id),
        format!("Status:     {}", r.status),
        format!(
            "Influencer: {}",
            r.influencer_name.as_deref().unwrap_or("-")
        ),
        format!("Deal:       {}", r.deal_title.as_deref().unwrap_or("-")),
        format!("Code:       {}", r.coupon_code.as_deref().unwrap_or("-")),
        format!(
            "Engagement: {} views / {} likes / {} comments",
            r.total_views, r.total_likes, r.total_comments
        ),
        format!(
            "Created:    {}",
            r.created_at.map_or_else(|| "-".into(), |t| t.to_rfc3339())
        ),
    ];
    if let Some(proof) = &r.proof_image_url {
        lines.push(format!("Proof:      {proof}"));
    }
    if let Some(link) = &r.social_media_link {
        lines.push(format!("Post:       {link}"));
    }
    if let Some(notes) = &r.notes {
        lines.push(format!("Notes:      {notes}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backoffice: &Backoffice,
    args: CouponsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CouponsCommand::List {
            pending: _,
            used,
            list,
        } => {
            // Pending approval is the default queue; --used flips scope.
            let scope = if used {
                RedemptionScope::Used
            } else {
                RedemptionScope::PendingApproval
            };
            let redemptions =
                util::fetch_paged(&list, backoffice.default_take(), |take, skip| async move {
                    backoffice.fetch_redemptions(scope, take, skip).await
                })
                .await?;
            let out = output::render_list(
                &global.output,
                &redemptions,
                |r| RedemptionRow::from(r),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CouponsCommand::Show { coupon } => {
            let found = backoffice
                .fetch_redemption(&EntityId::from(coupon))
                .await?;
            let out = output::render_single(&global.output, &found, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CouponsCommand::Approve { coupon } => {
            backoffice
                .execute(CoreCommand::ReviewRedemption {
                    id: EntityId::from(coupon.as_str()),
                    decision: ReviewDecision::Approve,
                })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Redemption {coupon} approved",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        CouponsCommand::MarkUsed { coupon } => {
            backoffice
                .execute(CoreCommand::ReviewRedemption {
                    id: EntityId::from(coupon.as_str()),
                    decision: ReviewDecision::MarkUsed,
                })
                .await?;
            if !global.quiet {
                eprintln!(
                    "{} Redemption {coupon} marked used",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }
    }
}
