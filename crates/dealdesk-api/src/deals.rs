//! Deal and redemption endpoints.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{DealDto, DealUpdate, RedemptionDto, RedemptionReview};

/// Which redemption queue to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionScope {
    /// Redemptions waiting for admin approval.
    PendingApproval,
    /// Redemptions already marked used.
    Used,
}

impl RedemptionScope {
    fn path(self) -> &'static str {
        match self {
            Self::PendingApproval => "admin/pending-approval-coupons",
            Self::Used => "admin/all-used-coupons",
        }
    }
}

impl ApiClient {
    // ── Deals ────────────────────────────────────────────────────────

    pub async fn get_deal(&self, id: &str) -> Result<DealDto> {
        self.get(&format!("deals/{id}"))
            .await
            .map_err(|e| e.or_not_found("deal", id))
    }

    pub async fn update_deal(&self, id: &str, body: &DealUpdate) -> Result<()> {
        self.patch_no_response(&format!("deals/{id}"), body).await
    }

    pub async fn delete_deal(&self, id: &str) -> Result<()> {
        self.delete(&format!("deals/{id}")).await
    }

    /// All deals belonging to one vendor.
    pub async fn vendor_deals(&self, shop_id: &str) -> Result<Vec<DealDto>> {
        self.get(&format!("deals/shop/{shop_id}")).await
    }

    /// The curated top-deals slice; source for the process-wide cache.
    pub async fn top_deals(&self, take: usize, skip: usize) -> Result<Vec<DealDto>> {
        self.get_with_params(
            "deals/top-deals",
            &[("take", take.to_string()), ("skip", skip.to_string())],
        )
        .await
    }

    // ── Redemptions ──────────────────────────────────────────────────

    pub async fn list_redemptions(
        &self,
        scope: RedemptionScope,
        take: usize,
        skip: usize,
    ) -> Result<Vec<RedemptionDto>> {
        self.get_with_params(
            scope.path(),
            &[("take", take.to_string()), ("skip", skip.to_string())],
        )
        .await
    }

    pub async fn get_redemption(&self, id: &str) -> Result<RedemptionDto> {
        self.get(&format!("deals-redeem/{id}"))
            .await
            .map_err(|e| e.or_not_found("redemption", id))
    }

    /// Move a redemption through the review flow: `approved` marks it
    /// redeemable, `used` closes it out.
    pub async fn review_redemption(&self, id: &str, review: &RedemptionReview) -> Result<()> {
        self.patch_no_response(&format!("deals-redeem/approve/{id}"), review)
            .await
    }
}
