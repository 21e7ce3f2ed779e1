//! Wire types for the marketplace admin API.
//!
//! These mirror the backend's JSON shapes as-is, camelCase keys included.
//! Anything the backend is known to omit or null carries a default so a
//! sparse row never fails the whole page. Domain-level cleanup (typed ids,
//! status enums, date handling) happens in `dealdesk-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ── Categories ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display position within the sibling scope. The backend also accepts
    /// this as a decimal string on reorder patches.
    #[serde(default, deserialize_with = "int_from_string_or_number")]
    pub index: i64,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Body for the per-item reorder persist. The backend expects the index as
/// a string here, not a number.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryIndexPatch {
    pub index: String,
}

impl CategoryIndexPatch {
    pub fn new(index: u32) -> Self {
        Self {
            index: index.to_string(),
        }
    }
}

// ── Products ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub category: Option<CategoryRefDto>,
    #[serde(default)]
    pub shop: Option<VendorRefDto>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRefDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRefDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub stock: Option<i64>,
}

/// Query parameters for the product list.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category_id: Option<String>,
    pub state: Option<String>,
    pub take: usize,
    pub skip: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub state: String,
    pub category_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

/// One entry of the bulk product reorder body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOrderEntry {
    pub id: String,
    pub order_index: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductReorderBody {
    pub products: Vec<ProductOrderEntry>,
}

// ── Vendors & influencers ────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub approved: bool,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub wallet: Option<WalletDto>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDto {
    #[serde(default)]
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WalletCredit {
    pub amount: f64,
}

// ── Deals & redemptions ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealDto {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub shop: Option<VendorRefDto>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub redemptions_count: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionDto {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub used: bool,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub social_media_link: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
    #[serde(default)]
    pub total_views: i64,
    #[serde(default)]
    pub total_likes: i64,
    #[serde(default)]
    pub total_comments: i64,
    #[serde(default)]
    pub user: Option<InfluencerDto>,
    #[serde(default)]
    pub deal: Option<DealDto>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for `PATCH deals-redeem/approve/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct RedemptionReview {
    pub status: String,
}

impl RedemptionReview {
    pub fn approved() -> Self {
        Self {
            status: "approved".into(),
        }
    }

    pub fn used() -> Self {
        Self {
            status: "used".into(),
        }
    }
}

// ── Orders ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub user: Option<InfluencerDto>,
    #[serde(default)]
    pub items: Vec<OrderItemDto>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    #[serde(default)]
    pub product: Option<ProductRefDto>,
    #[serde(default)]
    pub variant: Option<VariantRefDto>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRefDto {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRefDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ── Subscription plans ───────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub trial_days: Option<i64>,
    #[serde(default)]
    pub max_deals: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPayload {
    pub name: String,
    pub amount: f64,
    pub interval: String,
    pub description: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_days: Option<i64>,
    pub max_deals: i64,
}

// ── Gallery ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemDto {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// An upload payload: either a gallery image or a category image.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: bytes::Bytes,
}

/// Multipart fields for category create/update.
#[derive(Debug, Clone)]
pub struct CategoryUpload {
    pub name: String,
    pub description: String,
    pub index: u32,
    pub parent_id: Option<String>,
    pub image: Option<MediaPayload>,
}

// ── Profile & analytics ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorAnalyticsDto {
    #[serde(default)]
    pub total_deals: i64,
    #[serde(default)]
    pub total_redeemed_deals: i64,
    #[serde(default)]
    pub redemption_rate: f64,
    #[serde(default)]
    pub approval_stats: Vec<ApprovalStatDto>,
    #[serde(default)]
    pub time_series_data: Vec<TimePointDto>,
    #[serde(default)]
    pub top_users: Vec<TopUserDto>,
    #[serde(default)]
    pub deals_nearing_expiration: Vec<DealDto>,
}

/// Redemption counts bucketed by status. The backend emits the status key
/// as `redeemedDeal_status` and the count as a decimal string.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalStatDto {
    #[serde(rename = "redeemedDeal_status", alias = "status", default)]
    pub status: String,
    #[serde(default, deserialize_with = "int_from_string_or_number")]
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePointDto {
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "int_from_string_or_number")]
    pub count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUserDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "redeemedcount", default, deserialize_with = "int_from_string_or_number")]
    pub redeemed_count: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealAnalyticsDto {
    #[serde(default)]
    pub deal_title: String,
    #[serde(default)]
    pub total_redemptions: i64,
    #[serde(default)]
    pub total_approvals: i64,
    #[serde(default)]
    pub redemption_statuses: Vec<ApprovalStatDto>,
    #[serde(default)]
    pub daily_metrics: Vec<TimePointDto>,
    #[serde(default)]
    pub top_users: Vec<TopUserDto>,
}

// ── Shared helpers ───────────────────────────────────────────────────

/// Accept an integer either as a JSON number or as a decimal string.
fn int_from_string_or_number<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    match Raw::deserialize(de)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_index_accepts_string() {
        let dto: CategoryDto =
            serde_json::from_str(r#"{"id":"c1","name":"Food","index":"4"}"#).unwrap();
        assert_eq!(dto.index, 4);
    }

    #[test]
    fn approval_stat_wire_key() {
        let dto: ApprovalStatDto =
            serde_json::from_str(r#"{"redeemedDeal_status":"pending_approval","count":"12"}"#)
                .unwrap();
        assert_eq!(dto.status, "pending_approval");
        assert_eq!(dto.count, 12);
    }

    #[test]
    fn sparse_order_row_still_parses() {
        let dto: OrderDto = serde_json::from_str(r#"{"id":"o1"}"#).unwrap();
        assert_eq!(dto.total, 0.0);
        assert!(dto.items.is_empty());
    }

    #[test]
    fn category_index_patch_serializes_string() {
        let body = serde_json::to_string(&CategoryIndexPatch::new(3)).unwrap();
        assert_eq!(body, r#"{"index":"3"}"#);
    }
}
