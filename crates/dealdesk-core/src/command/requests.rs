// ── Typed request structs for Command payloads ──
//
// Forms and CLI flags collect into these instead of loose key/value
// bags. Each one converts into the matching wire payload right before
// the request goes out.

use chrono::{DateTime, Utc};
use dealdesk_api::models::{
    CategoryUpload, DealUpdate, OrderUpdate, PlanPayload, ProductCreate, ProductUpdate,
    ProfileUpdate, RedemptionReview,
};
use serde::{Deserialize, Serialize};

use crate::model::{
    BillingInterval, DealStatus, EntityId, MediaUpload, OrderStatus, Plan, ProductState,
};

// ── Categories ─────────────────────────────────────────────────────

/// Fields for creating or fully updating a category. The optional image
/// travels as a multipart part, so it stays out of the serde surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Position among siblings; pass the sibling count to append.
    #[serde(default)]
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    #[serde(skip)]
    pub image: Option<MediaUpload>,
}

impl CategoryDraft {
    pub(crate) fn into_upload(self) -> CategoryUpload {
        CategoryUpload {
            name: self.name,
            description: self.description,
            index: self.position,
            parent_id: self.parent_id.map(|id| id.to_string()),
            image: self.image,
        }
    }
}

// ── Products ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub state: ProductState,
    pub category_id: EntityId,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductDraft {
    pub(crate) fn into_create(self) -> ProductCreate {
        ProductCreate {
            title: self.title,
            description: self.description,
            price: self.price,
            state: self.state.to_string(),
            category_id: self.category_id.to_string(),
            images: self.images,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ProductState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.state.is_none()
            && self.category_id.is_none()
    }

    pub(crate) fn into_update(self) -> ProductUpdate {
        ProductUpdate {
            title: self.title,
            description: self.description,
            price: self.price,
            state: self.state.map(|s| s.to_string()),
            category_id: self.category_id.map(|id| id.to_string()),
        }
    }
}

// ── Deals & redemptions ────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DealStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl DealPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.expires_at.is_none()
    }

    pub(crate) fn into_update(self) -> DealUpdate {
        DealUpdate {
            title: self.title,
            description: self.description,
            status: self.status.map(|s| s.to_string()),
            expires_at: self.expires_at,
        }
    }
}

/// The two review outcomes for a pending redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewDecision {
    Approve,
    MarkUsed,
}

impl ReviewDecision {
    pub(crate) fn into_review(self) -> RedemptionReview {
        match self {
            Self::Approve => RedemptionReview::approved(),
            Self::MarkUsed => RedemptionReview::used(),
        }
    }
}

// ── Orders ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.tracking_number.is_none() && self.notes.is_none()
    }

    pub(crate) fn into_update(self) -> OrderUpdate {
        OrderUpdate {
            status: self.status.map(|s| s.to_string()),
            tracking_number: self.tracking_number,
            notes: self.notes,
        }
    }
}

// ── Plans ──────────────────────────────────────────────────────────

/// Full field set for a plan; the backend treats updates as complete
/// replacements, so create and update share this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDraft {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub interval: BillingInterval,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_days: Option<i64>,
    /// `None` means no cap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_deals: Option<i64>,
}

fn default_active() -> bool {
    true
}

impl PlanDraft {
    pub(crate) fn into_payload(self) -> PlanPayload {
        PlanPayload {
            name: self.name,
            amount: self.amount,
            interval: self.interval.to_string(),
            description: self.description,
            is_active: self.is_active,
            trial_days: self.trial_days,
            max_deals: self.max_deals.unwrap_or(0),
        }
    }

    /// The entity this draft describes, once the server has accepted it.
    pub(crate) fn into_plan(self, id: EntityId) -> Plan {
        let description = (!self.description.is_empty()).then_some(self.description);
        Plan {
            id,
            name: self.name,
            description,
            amount: self.amount,
            interval: self.interval,
            is_active: self.is_active,
            trial_days: self.trial_days,
            max_deals: self.max_deals,
        }
    }
}

// ── Profile ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.photo_url.is_none()
    }

    pub(crate) fn into_update(self) -> ProfileUpdate {
        ProfileUpdate {
            name: self.name,
            photo_url: self.photo_url,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn product_patch_serializes_only_set_fields() {
        let patch = ProductPatch {
            price: Some(19.99),
            ..ProductPatch::default()
        };
        let update = patch.into_update();
        let body = serde_json::to_string(&update).unwrap();
        assert_eq!(body, r#"{"price":19.99}"#);
    }

    #[test]
    fn plan_draft_uses_zero_for_uncapped() {
        let draft = PlanDraft {
            name: "Basic".into(),
            amount: 9.99,
            interval: BillingInterval::Month,
            description: String::new(),
            is_active: true,
            trial_days: None,
            max_deals: None,
        };
        let payload = draft.into_payload();
        assert_eq!(payload.max_deals, 0);
        assert_eq!(payload.interval, "month");
    }

    #[test]
    fn review_decisions_map_to_wire_statuses() {
        assert_eq!(ReviewDecision::Approve.into_review().status, "approved");
        assert_eq!(ReviewDecision::MarkUsed.into_review().status, "used");
    }
}
