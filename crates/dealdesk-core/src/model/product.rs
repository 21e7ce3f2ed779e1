// ── Product domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;
use crate::reorder::Orderable;

/// Listing state of a product. The backend speaks uppercase strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum ProductState {
    #[default]
    #[strum(serialize = "ACTIVE")]
    Active,
    #[strum(serialize = "INACTIVE")]
    Inactive,
    #[strum(serialize = "DRAFT")]
    Draft,
    #[strum(default)]
    Unknown(String),
}

impl ProductState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A sellable catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub state: ProductState,
    /// 0-based display position within the current listing.
    pub position: u32,
    pub category_id: Option<EntityId>,
    pub category_name: Option<String>,
    pub vendor_id: Option<EntityId>,
    pub vendor_name: Option<String>,
    pub images: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Orderable for Product {
    fn id(&self) -> &EntityId {
        &self.id
    }

    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

/// A size/color/... option under a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub id: EntityId,
    pub name: String,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

/// Server-side filters for the product listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Free-text search over title/description.
    pub query: Option<String>,
    pub category_id: Option<EntityId>,
    /// `None` lets the backend apply its default (active only).
    pub state: Option<ProductState>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.category_id.is_none() && self.state.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn product_state_parses_wire_strings() {
        assert_eq!("ACTIVE".parse::<ProductState>().unwrap(), ProductState::Active);
        assert_eq!("inactive".parse::<ProductState>().unwrap(), ProductState::Inactive);
        assert_eq!(
            "ARCHIVED".parse::<ProductState>().unwrap(),
            ProductState::Unknown("ARCHIVED".into())
        );
    }

    #[test]
    fn product_state_displays_wire_form() {
        assert_eq!(ProductState::Active.to_string(), "ACTIVE");
    }
}
