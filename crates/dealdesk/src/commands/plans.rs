//! Subscription plan command handlers.

use dealdesk_core::{
    Backoffice, BillingInterval, Command as CoreCommand, CommandResult, EntityId, Plan, PlanDraft,
};
use tabled::Tabled;

use crate::cli::{GlobalOpts, PlansArgs, PlansCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Active")]
    active: String,
    #[tabled(rename = "Trial")]
    trial: String,
    #[tabled(rename = "Max deals")]
    max_deals: String,
}

impl From<&Plan> for PlanRow {
    fn from(p: &Plan) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            price: p.price_label(),
            active: if p.is_active { "yes" } else { "no" }.into(),
            trial: p
                .trial_days
                .map_or_else(|| "-".into(), |d| format!("{d} days")),
            max_deals: p.max_deals.map_or_else(|| "-".into(), |m| m.to_string()),
        }
    }
}

fn parse_interval(value: &str) -> Result<BillingInterval, CliError> {
    match value.parse() {
        Ok(BillingInterval::Unknown(other)) => Err(CliError::Validation {
            field: "interval".into(),
            reason: format!("unknown interval '{other}' (expected month or year)"),
        }),
        Ok(interval) => Ok(interval),
        Err(_) => Err(CliError::Validation {
            field: "interval".into(),
            reason: format!("unknown interval '{value}'"),
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backoffice: &Backoffice,
    args: PlansArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PlansCommand::List => {
            let plans = backoffice.plans_snapshot();
            let out = output::render_list(
                &global.output,
                &plans,
                |p| PlanRow::from(p.as_ref()),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PlansCommand::Create {
            name,
            amount,
            interval,
            description,
            trial_days,
            max_deals,
            inactive,
        } => {
            let draft = PlanDraft {
                name: name.clone(),
                amount,
                interval: parse_interval(&interval)?,
                description,
                is_active: !inactive,
                trial_days,
                max_deals,
            };
            let result = backoffice.execute(CoreCommand::CreatePlan(draft)).await?;
            if !global.quiet {
                let id = match &result {
                    CommandResult::Plan(plan) => plan.id.to_string(),
                    _ => String::new(),
                };
                eprintln!(
                    "{} Plan '{name}' created ({id})",
                    output::check_mark(&global.color)
                );
            }
            Ok(())
        }

        PlansCommand::Update {
            plan,
            name,
            amount,
            interval,
            description,
            trial_days,
            max_deals,
            inactive,
        } => {
            let draft = PlanDraft {
                name,
                amount,
                interval: parse_interval(&interval)?,
                description,
                is_active: !inactive,
                trial_days,
                max_deals,
            };
            backoffice
                .execute(CoreCommand::UpdatePlan {
                    id: EntityId::from(plan),
                    draft,
                })
                .await?;
            if !global.quiet {
                eprintln!("{} Plan updated", output::check_mark(&global.color));
            }
            Ok(())
        }

        PlansCommand::Delete { plan } => {
            if !util::confirm(&format!("Delete plan {plan}?"), global.yes)? {
                return Ok(());
            }
            backoffice
                .execute(CoreCommand::DeletePlan {
                    id: EntityId::from(plan),
                })
                .await?;
            if !global.quiet {
                eprintln!("{} Plan deleted", output::check_mark(&global.color));
            }
            Ok(())
        }
    }
}
