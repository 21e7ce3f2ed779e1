// ── Dashboard analytics domain types ──
//
// The backend reports counts bucketed by redemption status under awkward
// wire keys; the API crate absorbs those, this module exposes the cleaned
// shapes the dashboard renders.

use serde::{Deserialize, Serialize};

use super::deal::{Deal, RedemptionStatus};
use super::entity_id::EntityId;

/// Per-vendor dashboard figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorAnalytics {
    pub total_deals: i64,
    pub total_redemptions: i64,
    /// Fraction of issued coupons that were redeemed, 0.0..=1.0.
    pub redemption_rate: f64,
    pub approval_stats: Vec<ApprovalStat>,
    pub redemptions_over_time: Vec<TimePoint>,
    pub top_users: Vec<TopUser>,
    pub deals_nearing_expiration: Vec<Deal>,
}

/// Per-deal drill-down figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealAnalytics {
    pub deal_title: String,
    pub total_redemptions: i64,
    pub total_approvals: i64,
    pub status_breakdown: Vec<ApprovalStat>,
    pub daily_metrics: Vec<TimePoint>,
    pub top_users: Vec<TopUser>,
}

/// Redemption count for one status bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalStat {
    pub status: RedemptionStatus,
    pub count: i64,
}

/// One sample of a daily time series. The date stays a label; the backend
/// emits whatever granularity it aggregated by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: String,
    pub count: i64,
}

/// A user ranked by redemption count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUser {
    pub id: Option<EntityId>,
    pub name: String,
    pub redeemed_count: i64,
}

impl VendorAnalytics {
    /// Count for one status bucket, zero when the backend omitted it.
    pub fn count_for(&self, status: &RedemptionStatus) -> i64 {
        self.approval_stats
            .iter()
            .find(|s| s.status == *status)
            .map_or(0, |s| s.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_for_missing_bucket_is_zero() {
        let analytics = VendorAnalytics {
            approval_stats: vec![ApprovalStat { status: RedemptionStatus::Approved, count: 7 }],
            ..VendorAnalytics::default()
        };
        assert_eq!(analytics.count_for(&RedemptionStatus::Approved), 7);
        assert_eq!(analytics.count_for(&RedemptionStatus::Rejected), 0);
    }
}
