//! Order command handlers.

use dealdesk_core::{
    Backoffice, Command as CoreCommand, EntityId, Order, OrderPatch, OrderStatus,
};
use tabled::Tabled;

use crate::cli::{GlobalOpts, OrdersArgs, OrdersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Items")]
    items: i64,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Order> for OrderRow {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id.to_string(),
            status: o.status.to_string(),
            total: format!("{:.2}", o.total),
            customer: o.customer_name.clone().unwrap_or_default(),
            items: o.item_count(),
            created: o
                .created_at
                .map_or_else(String::new, |t| t.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

fn detail(o: &Order) -> String {
    let mut lines = vec![
        format!("ID:       {}", o.id),
        format!("Status:   {}", o.status),
        format!("Total:    {:.2}", o.total),
        format!("Customer: {}", o.customer_name.as_deref().unwrap_or("-")),
        format!(
            "Tracking: {}",
            o.tracking_number.as_deref().unwrap_or("-")
        ),
        format!(
            "Created:  {}",
            o.created_at.map_or_else(|| "-".into(), |t| t.to_rfc3339())
        ),
    ];
    if let Some(notes) = o.notes.as_deref() {
        lines.push(format!("Notes:    {notes}"));
    }
    if !o.items.is_empty() {
        lines.push(format!("Items ({}):", o.items.len()));
        for item in &o.items {
            let variant = item
                .variant_name
                .as_deref()
                .map_or_else(String::new, |v| format!(" ({v})"));
            lines.push(format!(
                "  {}{} x{} @ {:.2}",
                item.product_title, variant, item.quantity, item.unit_price
            ));
        }
    }
    lines.join("\n")
}

fn parse_status(value: &str) -> Result<OrderStatus, CliError> {
    match value.parse() {
        Ok(OrderStatus::Unknown(other)) => Err(CliError::Validation {
            field: "status".into(),
            reason: format!(
                "unknown status '{other}' (expected pending, processing, shipped, delivered, or cancelled)"
            ),
        }),
        Ok(status) => Ok(status),
        Err(_) => Err(CliError::Validation {
            field: "status".into(),
            reason: format!("unknown status '{value}'"),
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backoffice: &Backoffice,
    args: OrdersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        OrdersCommand::List(list) => {
            let orders = util::fetch_paged(&list, backoffice.default_take(), |take, skip| async move {
                backoffice.fetch_orders(take, skip).await
            })
            .await?;
            let out =
                output::render_list(&global.output, &orders, |o| OrderRow::from(o), |o| o.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::Show { order } => {
            let found = backoffice.fetch_order(&EntityId::from(order)).await?;
            let out = output::render_single(&global.output, &found, detail, |o| o.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::SetStatus {
            order,
            status,
            tracking,
            notes,
        } => {
            let update = OrderPatch {
                status: Some(parse_status(&status)?),
                tracking_number: tracking,
                notes,
            };
            backoffice
                .execute(CoreCommand::UpdateOrder {
                    id: EntityId::from(order),
                    update,
                })
                .await?;
            if !global.quiet {
                eprintln!("{} Order updated", output::check_mark(&global.color));
            }
            Ok(())
        }

        OrdersCommand::ByUser { user } => {
            let orders = backoffice.fetch_user_orders(&EntityId::from(user)).await?;
            let out =
                output::render_list(&global.output, &orders, |o| OrderRow::from(o), |o| o.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
