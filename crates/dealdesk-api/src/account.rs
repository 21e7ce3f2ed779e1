//! Signed-in profile and analytics endpoints.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{AdminProfileDto, DealAnalyticsDto, ProfileUpdate, VendorAnalyticsDto};

impl ApiClient {
    /// Profile of the account the bearer token belongs to.
    pub async fn me(&self) -> Result<AdminProfileDto> {
        self.get("user").await
    }

    pub async fn update_profile(&self, body: &ProfileUpdate) -> Result<()> {
        self.patch_no_response("user", body).await
    }

    /// Aggregate redemption and revenue counters for one vendor.
    pub async fn vendor_analytics(&self, vendor_id: &str) -> Result<VendorAnalyticsDto> {
        self.get(&format!("analytics/{vendor_id}"))
            .await
            .map_err(|e| e.or_not_found("vendor", vendor_id))
    }

    /// Per-deal breakdown of the same counters.
    pub async fn deal_analytics(&self, deal_id: &str) -> Result<DealAnalyticsDto> {
        self.get(&format!("analytics/deal/{deal_id}"))
            .await
            .map_err(|e| e.or_not_found("deal", deal_id))
    }
}
