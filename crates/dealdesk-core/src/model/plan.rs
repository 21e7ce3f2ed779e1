// ── Subscription plan domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;

/// Billing cadence for a subscription plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum BillingInterval {
    #[default]
    #[strum(serialize = "month")]
    Month,
    #[strum(serialize = "year")]
    Year,
    #[strum(default)]
    Unknown(String),
}

/// A vendor subscription tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub amount: f64,
    pub interval: BillingInterval,
    pub is_active: bool,
    pub trial_days: Option<i64>,
    pub max_deals: Option<i64>,
}

impl Plan {
    /// Human-oriented price label, e.g. `"$29.99/month"`.
    pub fn price_label(&self) -> String {
        format!("${:.2}/{}", self.amount, self.interval)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn interval_parses_wire_strings() {
        assert_eq!("month".parse::<BillingInterval>().unwrap(), BillingInterval::Month);
        assert_eq!("YEAR".parse::<BillingInterval>().unwrap(), BillingInterval::Year);
        assert_eq!(
            "weekly".parse::<BillingInterval>().unwrap(),
            BillingInterval::Unknown("weekly".into())
        );
    }

    #[test]
    fn price_label_formats_amount_and_interval() {
        let plan = Plan {
            id: EntityId::from("plan-1"),
            name: "Pro".into(),
            description: None,
            amount: 29.99,
            interval: BillingInterval::Month,
            is_active: true,
            trial_days: Some(14),
            max_deals: None,
        };
        assert_eq!(plan.price_label(), "$29.99/month");
    }
}
