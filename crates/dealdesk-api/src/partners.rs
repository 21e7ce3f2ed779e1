//! Partner endpoints: vendors (shops) and influencers (users), plus wallet
//! credits.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{InfluencerDto, VendorDto, WalletCredit};

/// Build the shared `take`/`skip`/`search` parameter list.
fn page_params(take: usize, skip: usize, search: Option<&str>) -> Vec<(&'static str, String)> {
    let mut params = vec![("take", take.to_string()), ("skip", skip.to_string())];
    if let Some(search) = search {
        if !search.is_empty() {
            params.push(("search", search.to_owned()));
        }
    }
    params
}

impl ApiClient {
    // ── Vendors ──────────────────────────────────────────────────────

    pub async fn list_vendors(
        &self,
        take: usize,
        skip: usize,
        search: Option<&str>,
    ) -> Result<Vec<VendorDto>> {
        self.get_with_params("admin/shops", &page_params(take, skip, search))
            .await
    }

    pub async fn get_vendor(&self, id: &str) -> Result<VendorDto> {
        self.get(&format!("shop/{id}"))
            .await
            .map_err(|e| e.or_not_found("vendor", id))
    }

    pub async fn approve_vendor(&self, id: &str) -> Result<()> {
        self.post_empty(&format!("admin/shops/{id}/approve")).await
    }

    pub async fn block_vendor(&self, id: &str) -> Result<()> {
        self.post_empty(&format!("admin/shops/{id}/block")).await
    }

    // ── Influencers ──────────────────────────────────────────────────

    pub async fn list_influencers(
        &self,
        take: usize,
        skip: usize,
        search: Option<&str>,
    ) -> Result<Vec<InfluencerDto>> {
        self.get_with_params("user/users", &page_params(take, skip, search))
            .await
    }

    pub async fn get_influencer(&self, id: &str) -> Result<InfluencerDto> {
        self.get(&format!("user/{id}"))
            .await
            .map_err(|e| e.or_not_found("influencer", id))
    }

    pub async fn approve_influencer(&self, id: &str) -> Result<()> {
        self.post_empty(&format!("user/users/{id}/approve")).await
    }

    pub async fn block_influencer(&self, id: &str) -> Result<()> {
        self.post_empty(&format!("user/users/{id}/block")).await
    }

    /// Credit an influencer's wallet.
    pub async fn credit_wallet(&self, user_id: &str, amount: f64) -> Result<()> {
        self.post_no_response(&format!("wallet/{user_id}/credit"), &WalletCredit { amount })
            .await
    }
}
