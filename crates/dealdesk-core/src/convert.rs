// ── API-to-domain type conversions ──
//
// Bridges raw `dealdesk_api` response types into canonical
// `dealdesk_core::model` domain types. Each `From` impl normalizes field
// names, parses strings into strong types, and fills sensible defaults
// for missing optional data.

use dealdesk_api::models::{
    AdminProfileDto, ApprovalStatDto, CategoryDto, DealAnalyticsDto, DealDto, InfluencerDto,
    MediaItemDto, OrderDto, OrderItemDto, PlanDto, ProductDto, RedemptionDto, TimePointDto,
    TopUserDto, VariantDto, VendorAnalyticsDto, VendorDto,
};

use crate::model::{
    AdminProfile, ApprovalStat, Category, Deal, DealAnalytics, EntityId, Influencer, MediaItem,
    Order, OrderItem, Plan, Product, Redemption, RedemptionStatus, TimePoint, TopUser, Variant,
    Vendor, VendorAnalytics,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a wire status string into one of the status enums. Every status
/// enum carries an `Unknown` catch-all, so unrecognized values survive
/// round trips instead of failing the row.
fn parse_status<T: std::str::FromStr + Default>(raw: &str) -> T {
    raw.parse().unwrap_or_default()
}

/// Clamp a wire position (the backend stores them as plain integers and
/// has been seen to emit negatives after bad migrations) into `u32`.
fn clamp_position(index: i64) -> u32 {
    u32::try_from(index.clamp(0, i64::from(u32::MAX))).unwrap_or_default()
}

/// The display name for an embedded user reference: name, else email.
fn user_display_name(user: &InfluencerDto) -> String {
    if user.name.is_empty() {
        user.email.clone()
    } else {
        user.name.clone()
    }
}

// ── Catalog ────────────────────────────────────────────────────────

impl From<CategoryDto> for Category {
    fn from(dto: CategoryDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            description: dto.description,
            position: clamp_position(dto.index),
            parent_id: dto.parent_id.map(EntityId::from),
            image_url: dto.image,
        }
    }
}

impl From<ProductDto> for Product {
    fn from(dto: ProductDto) -> Self {
        let (category_id, category_name) = match dto.category {
            Some(c) => (Some(EntityId::from(c.id)), Some(c.name)),
            None => (None, None),
        };
        let (vendor_id, vendor_name) = match dto.shop {
            Some(v) => (Some(EntityId::from(v.id)), Some(v.name)),
            None => (None, None),
        };

        Self {
            id: EntityId::from(dto.id),
            title: dto.title,
            description: dto.description,
            price: dto.price,
            state: parse_status(&dto.state),
            position: clamp_position(dto.order_index),
            category_id,
            category_name,
            vendor_id,
            vendor_name,
            images: dto.images,
            created_at: dto.created_at,
        }
    }
}

impl From<VariantDto> for Variant {
    fn from(dto: VariantDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            sku: dto.sku,
            price: dto.price,
            stock: dto.stock,
        }
    }
}

// ── Partners ───────────────────────────────────────────────────────

impl From<VendorDto> for Vendor {
    fn from(dto: VendorDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            email: dto.email,
            description: dto.description,
            logo_url: dto.logo,
            approved: dto.approved,
            blocked: dto.blocked,
            created_at: dto.created_at,
        }
    }
}

impl From<InfluencerDto> for Influencer {
    fn from(dto: InfluencerDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            email: dto.email,
            photo_url: dto.photo_url,
            approved: dto.approved,
            blocked: dto.blocked,
            wallet_balance: dto.wallet.map(|w| w.balance),
            created_at: dto.created_at,
        }
    }
}

// ── Deals & redemptions ────────────────────────────────────────────

impl From<DealDto> for Deal {
    fn from(dto: DealDto) -> Self {
        let (vendor_id, vendor_name) = match dto.shop {
            Some(v) => (Some(EntityId::from(v.id)), Some(v.name)),
            None => (None, None),
        };

        Self {
            id: EntityId::from(dto.id),
            title: dto.title,
            description: dto.description,
            status: parse_status(&dto.status),
            image_url: dto.image,
            vendor_id,
            vendor_name,
            expires_at: dto.expires_at,
            redemption_count: dto.redemptions_count,
        }
    }
}

impl From<RedemptionDto> for Redemption {
    fn from(dto: RedemptionDto) -> Self {
        // Older rows carry a bare `used` flag alongside a stale status
        // string; the flag wins.
        let status = if dto.used {
            RedemptionStatus::Used
        } else {
            parse_status(&dto.status)
        };
        let (influencer_id, influencer_name) = match &dto.user {
            Some(u) => (
                Some(EntityId::from(u.id.clone())),
                Some(user_display_name(u)),
            ),
            None => (None, None),
        };
        let (deal_id, deal_title) = match dto.deal {
            Some(d) => (Some(EntityId::from(d.id)), Some(d.title)),
            None => (None, None),
        };

        Self {
            id: EntityId::from(dto.id),
            status,
            coupon_code: dto.coupon_code,
            proof_image_url: dto.image,
            social_media_link: dto.social_media_link,
            notes: dto.additional_info,
            total_views: dto.total_views,
            total_likes: dto.total_likes,
            total_comments: dto.total_comments,
            influencer_id,
            influencer_name,
            deal_id,
            deal_title,
            created_at: dto.created_at,
        }
    }
}

// ── Orders ─────────────────────────────────────────────────────────

impl From<OrderDto> for Order {
    fn from(dto: OrderDto) -> Self {
        let (customer_id, customer_name) = match &dto.user {
            Some(u) => (
                Some(EntityId::from(u.id.clone())),
                Some(user_display_name(u)),
            ),
            None => (None, None),
        };

        Self {
            id: EntityId::from(dto.id),
            status: parse_status(&dto.status),
            total: dto.total,
            customer_id,
            customer_name,
            items: dto.items.into_iter().map(Into::into).collect(),
            tracking_number: dto.tracking_number,
            notes: dto.notes,
            created_at: dto.created_at,
        }
    }
}

impl From<OrderItemDto> for OrderItem {
    fn from(dto: OrderItemDto) -> Self {
        let (product_id, product_title) = match dto.product {
            Some(p) => (Some(EntityId::from(p.id)), p.title),
            None => (None, "(removed product)".to_owned()),
        };

        Self {
            product_id,
            product_title,
            variant_name: dto.variant.map(|v| v.name),
            quantity: dto.quantity,
            unit_price: dto.price,
        }
    }
}

// ── Plans ──────────────────────────────────────────────────────────

impl From<PlanDto> for Plan {
    fn from(dto: PlanDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            description: (!dto.description.is_empty()).then_some(dto.description),
            amount: dto.amount,
            interval: parse_status(&dto.interval),
            is_active: dto.is_active,
            trial_days: dto.trial_days,
            // Zero means "no cap" on the wire.
            max_deals: (dto.max_deals > 0).then_some(dto.max_deals),
        }
    }
}

// ── Gallery ────────────────────────────────────────────────────────

impl From<MediaItemDto> for MediaItem {
    fn from(dto: MediaItemDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            url: dto.url,
            name: dto.name,
            size_bytes: dto.size,
            mime_type: dto.mime_type,
            created_at: dto.created_at,
        }
    }
}

// ── Profile & analytics ────────────────────────────────────────────

impl From<AdminProfileDto> for AdminProfile {
    fn from(dto: AdminProfileDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            email: dto.email,
            photo_url: dto.photo_url,
            role: dto.role,
        }
    }
}

impl From<ApprovalStatDto> for ApprovalStat {
    fn from(dto: ApprovalStatDto) -> Self {
        Self {
            status: parse_status(&dto.status),
            count: dto.count,
        }
    }
}

impl From<TimePointDto> for TimePoint {
    fn from(dto: TimePointDto) -> Self {
        Self {
            date: dto.date,
            count: dto.count,
        }
    }
}

impl From<TopUserDto> for TopUser {
    fn from(dto: TopUserDto) -> Self {
        Self {
            id: dto.id.map(EntityId::from),
            name: dto.name,
            redeemed_count: dto.redeemed_count,
        }
    }
}

impl From<VendorAnalyticsDto> for VendorAnalytics {
    fn from(dto: VendorAnalyticsDto) -> Self {
        Self {
            total_deals: dto.total_deals,
            total_redemptions: dto.total_redeemed_deals,
            redemption_rate: dto.redemption_rate,
            approval_stats: dto.approval_stats.into_iter().map(Into::into).collect(),
            redemptions_over_time: dto.time_series_data.into_iter().map(Into::into).collect(),
            top_users: dto.top_users.into_iter().map(Into::into).collect(),
            deals_nearing_expiration: dto
                .deals_nearing_expiration
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl From<DealAnalyticsDto> for DealAnalytics {
    fn from(dto: DealAnalyticsDto) -> Self {
        Self {
            deal_title: dto.deal_title,
            total_redemptions: dto.total_redemptions,
            total_approvals: dto.total_approvals,
            status_breakdown: dto.redemption_statuses.into_iter().map(Into::into).collect(),
            daily_metrics: dto.daily_metrics.into_iter().map(Into::into).collect(),
            top_users: dto.top_users.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ProductState;

    #[test]
    fn negative_wire_positions_clamp_to_zero() {
        let dto: CategoryDto =
            serde_json::from_str(r#"{"id":"c1","name":"Food","index":-3}"#).unwrap();
        let category = Category::from(dto);
        assert_eq!(category.position, 0);
    }

    #[test]
    fn unknown_product_state_is_preserved() {
        let dto: ProductDto =
            serde_json::from_str(r#"{"id":"p1","title":"Mug","state":"ARCHIVED"}"#).unwrap();
        let product = Product::from(dto);
        assert_eq!(product.state, ProductState::Unknown("ARCHIVED".into()));
    }

    #[test]
    fn used_flag_overrides_stale_status() {
        let dto: RedemptionDto =
            serde_json::from_str(r#"{"id":"r1","status":"approved","used":true}"#).unwrap();
        let redemption = Redemption::from(dto);
        assert_eq!(redemption.status, RedemptionStatus::Used);
    }

    #[test]
    fn analytics_bucket_key_parses_into_pending() {
        let dto: ApprovalStatDto =
            serde_json::from_str(r#"{"redeemedDeal_status":"pending_approval","count":"12"}"#)
                .unwrap();
        let stat = ApprovalStat::from(dto);
        assert_eq!(stat.status, RedemptionStatus::Pending);
        assert_eq!(stat.count, 12);
    }

    #[test]
    fn removed_products_keep_their_order_line() {
        let dto: OrderItemDto =
            serde_json::from_str(r#"{"quantity":2,"price":9.5}"#).unwrap();
        let item = OrderItem::from(dto);
        assert!(item.product_id.is_none());
        assert_eq!(item.product_title, "(removed product)");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn plan_zero_cap_means_unlimited() {
        let dto: PlanDto =
            serde_json::from_str(r#"{"id":"pl1","name":"Basic","interval":"month"}"#).unwrap();
        let plan = Plan::from(dto);
        assert_eq!(plan.max_deals, None);
    }
}
