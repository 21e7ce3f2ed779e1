// ── Deal and redemption domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;

/// Publication state of a deal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum DealStatus {
    #[default]
    #[strum(serialize = "ACTIVE")]
    Active,
    #[strum(serialize = "INACTIVE")]
    Inactive,
    #[strum(serialize = "EXPIRED")]
    Expired,
    #[strum(default)]
    Unknown(String),
}

/// A coupon/deal published by a vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub status: DealStatus,
    pub image_url: Option<String>,
    pub vendor_id: Option<EntityId>,
    pub vendor_name: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub redemption_count: i64,
}

impl Deal {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, DealStatus::Expired)
            || self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Review state of one redemption. Lowercase on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
#[non_exhaustive]
pub enum RedemptionStatus {
    #[default]
    #[strum(to_string = "pending", serialize = "pending_approval")]
    Pending,
    #[strum(serialize = "approved")]
    Approved,
    #[strum(serialize = "used")]
    Used,
    #[strum(serialize = "rejected")]
    Rejected,
    #[strum(default)]
    Unknown(String),
}

impl RedemptionStatus {
    /// Whether the admin review flow still has a step to take.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

/// One influencer's claim on a deal, moving through the review flow
/// (pending → approved → used).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Redemption {
    pub id: EntityId,
    pub status: RedemptionStatus,
    pub coupon_code: Option<String>,
    pub proof_image_url: Option<String>,
    pub social_media_link: Option<String>,
    pub notes: Option<String>,
    pub total_views: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub influencer_id: Option<EntityId>,
    pub influencer_name: Option<String>,
    pub deal_id: Option<EntityId>,
    pub deal_title: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn redemption_status_wire_round_trip() {
        assert_eq!(
            "approved".parse::<RedemptionStatus>().unwrap(),
            RedemptionStatus::Approved
        );
        assert_eq!(RedemptionStatus::Used.to_string(), "used");
    }

    #[test]
    fn expiry_considers_both_status_and_timestamp() {
        let now = Utc::now();
        let deal = Deal {
            id: "d1".into(),
            title: "T".into(),
            description: String::new(),
            status: DealStatus::Active,
            image_url: None,
            vendor_id: None,
            vendor_name: None,
            expires_at: Some(now - chrono::Duration::hours(1)),
            redemption_count: 0,
        };
        assert!(deal.is_expired(now));
    }
}
