// ── Order domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;

/// Fulfilment state of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum OrderStatus {
    #[default]
    #[strum(serialize = "PENDING")]
    Pending,
    #[strum(serialize = "PROCESSING")]
    Processing,
    #[strum(serialize = "SHIPPED")]
    Shipped,
    #[strum(serialize = "DELIVERED")]
    Delivered,
    #[strum(serialize = "CANCELLED")]
    Cancelled,
    #[strum(default)]
    Unknown(String),
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

/// A customer purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: EntityId,
    pub status: OrderStatus,
    pub total: f64,
    pub customer_id: Option<EntityId>,
    pub customer_name: Option<String>,
    pub items: Vec<OrderItem>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total quantity across all line items.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// One line of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Option<EntityId>,
    pub product_title: String,
    pub variant_name: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
}
